//! Scorer collaborators: image preprocessing, model weights, and the
//! candle-backed ViT classifiers the cascade calls into.

pub mod device;
pub mod download;
pub mod preprocess;
pub mod scorer;
pub mod vit;

pub use device::select_device;
pub use download::ModelDownloader;
pub use preprocess::ImageInput;
pub use scorer::{MockScorer, Scorer};
pub use vit::VitScorer;
