pub mod catch;
pub mod leaderboard;
