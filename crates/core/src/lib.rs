pub mod config;
pub mod error;
pub mod metadata;

pub const NAME: &str = "dermascan";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
