pub mod cli;

pub use dermascan_core::{NAME, VERSION};
