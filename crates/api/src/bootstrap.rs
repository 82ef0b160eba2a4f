//! Engine construction: download weights, pick a device, load both
//! scorers. Used by the HTTP server's startup task and by the CLI.

use candle_core::Device;
use dermascan_cascade::{CascadeEngine, GENERAL_LABELS, MALIGNANT_SUBTYPES};
use dermascan_core::config::DermascanConfig;
use dermascan_core::error::ScorerError;
use dermascan_model::{select_device, ModelDownloader, VitScorer};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Load both model weights and assemble a ready cascade engine.
///
/// Blocking: downloads weights on first run and memory-maps them. Call
/// from `spawn_blocking` in async contexts.
pub fn load_engine(config: &DermascanConfig) -> Result<(Arc<CascadeEngine>, Device), ScorerError> {
    let start = Instant::now();

    let downloader = match &config.cache_dir {
        Some(dir) => ModelDownloader::with_cache_dir(dir.clone())?,
        None => ModelDownloader::new()?,
    };

    let device = select_device(config.device)?;

    let general = VitScorer::from_source(
        &downloader,
        &config.general_model,
        GENERAL_LABELS.len(),
        "general",
        &device,
    )?;

    let subtype = VitScorer::from_source(
        &downloader,
        &config.subtype_model,
        MALIGNANT_SUBTYPES.len(),
        "subtype",
        &device,
    )?;

    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Both models loaded"
    );

    let engine = CascadeEngine::new(Arc::new(general), Arc::new(subtype));
    Ok((Arc::new(engine), device))
}
