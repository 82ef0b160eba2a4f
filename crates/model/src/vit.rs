//! Candle-backed ViT classifier used by both cascade stages.

use crate::download::ModelDownloader;
use crate::preprocess::ImageInput;
use crate::scorer::Scorer;
use async_trait::async_trait;
use candle_core::{DType, Device, D};
use candle_nn::ops::softmax;
use candle_nn::VarBuilder;
use candle_transformers::models::vit;
use dermascan_core::config::ModelSource;
use dermascan_core::error::ScorerError;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// A fine-tuned ViT-Base/16-224 with an n-way classification head.
///
/// Forward passes take `&self` and hold no mutable state, so the scorer
/// is safe for concurrent invocation without internal locking.
pub struct VitScorer {
    model: vit::Model,
    device: Device,
    name: String,
    num_labels: usize,
}

impl VitScorer {
    /// Load a scorer from a safetensors weights file.
    pub fn load(
        weights: &Path,
        num_labels: usize,
        name: impl Into<String>,
        device: &Device,
    ) -> Result<Self, ScorerError> {
        let name = name.into();
        debug!(scorer = %name, weights = %weights.display(), "Loading ViT weights");

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights.to_path_buf()], DType::F32, device)
        }
        .map_err(|e| ScorerError::WeightsUnavailable(format!("failed to map safetensors: {e}")))?;

        let config = vit::Config::vit_base_patch16_224();
        let model = vit::Model::new(&config, num_labels, vb).map_err(|e| {
            ScorerError::WeightsUnavailable(format!("failed to build ViT model: {e}"))
        })?;

        info!(scorer = %name, num_labels, "ViT scorer loaded");

        Ok(Self {
            model,
            device: device.clone(),
            name,
            num_labels,
        })
    }

    /// Download the weights for a model source and load them.
    pub fn from_source(
        downloader: &ModelDownloader,
        source: &ModelSource,
        num_labels: usize,
        name: impl Into<String>,
        device: &Device,
    ) -> Result<Self, ScorerError> {
        let weights = downloader.fetch(source)?;
        Self::load(&weights, num_labels, name, device)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn forward(&self, input: &ImageInput) -> Result<Vec<f32>, ScorerError> {
        let start = Instant::now();

        let batch = input
            .tensor()
            .unsqueeze(0)
            .map_err(|e| ScorerError::Inference(format!("failed to batch input: {e}")))?;

        let logits = self
            .model
            .forward(&batch)
            .map_err(|e| ScorerError::Inference(format!("forward pass failed: {e}")))?;

        let probs = softmax(&logits, D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| ScorerError::Inference(format!("failed to read probabilities: {e}")))?;

        debug!(
            scorer = %self.name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Inference complete"
        );

        Ok(probs)
    }
}

#[async_trait]
impl Scorer for VitScorer {
    async fn score(&self, input: &ImageInput) -> Result<Vec<f32>, ScorerError> {
        self.forward(input)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn num_labels(&self) -> usize {
        self.num_labels
    }
}

impl std::fmt::Debug for VitScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VitScorer")
            .field("name", &self.name)
            .field("num_labels", &self.num_labels)
            .field("device", &format!("{:?}", self.device))
            .finish()
    }
}
