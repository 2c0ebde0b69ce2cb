pub mod catch;
pub mod contest;
pub mod profile;
