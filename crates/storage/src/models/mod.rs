pub mod catch;
pub mod contest;
pub mod profile;

pub use catch::Catch;
pub use contest::Contest;
pub use profile::Profile;
