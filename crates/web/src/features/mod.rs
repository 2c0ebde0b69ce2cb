pub mod catches;
pub mod leaderboard;
