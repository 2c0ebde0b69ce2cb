pub mod catches;
pub mod leaderboard;
pub mod source;
