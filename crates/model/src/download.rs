//! Model weight downloading from HuggingFace Hub.

use dermascan_core::config::ModelSource;
use dermascan_core::error::ScorerError;
use hf_hub::api::sync::{Api, ApiBuilder};
use hf_hub::{Cache, Repo, RepoType};
use std::path::PathBuf;
use tracing::{debug, info};

/// Downloads and caches model weight files from HuggingFace Hub.
pub struct ModelDownloader {
    api: Api,
    cache: Cache,
}

impl ModelDownloader {
    /// Create a downloader using the default HuggingFace cache location.
    pub fn new() -> Result<Self, ScorerError> {
        let api = Api::new().map_err(|e| {
            ScorerError::WeightsUnavailable(format!("failed to initialize HuggingFace API: {e}"))
        })?;
        Ok(Self {
            api,
            cache: Cache::default(),
        })
    }

    /// Create a downloader with a custom cache directory.
    pub fn with_cache_dir(cache_dir: PathBuf) -> Result<Self, ScorerError> {
        std::fs::create_dir_all(&cache_dir).map_err(|e| {
            ScorerError::WeightsUnavailable(format!("failed to create model cache dir: {e}"))
        })?;

        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir.clone())
            .build()
            .map_err(|e| {
                ScorerError::WeightsUnavailable(format!(
                    "failed to initialize HuggingFace API: {e}"
                ))
            })?;

        debug!(cache_dir = %cache_dir.display(), "Using custom model cache");

        Ok(Self {
            api,
            cache: Cache::new(cache_dir),
        })
    }

    /// Whether the weights for a model are already in the local cache.
    pub fn is_cached(&self, source: &ModelSource) -> bool {
        self.cached_path(source).is_some()
    }

    /// Local path to cached weights, if present. Never touches the network.
    pub fn cached_path(&self, source: &ModelSource) -> Option<PathBuf> {
        self.cache
            .repo(Repo::new(source.repo_id.clone(), RepoType::Model))
            .get(&source.weights_file)
    }

    /// Fetch the weights file, downloading it on a cache miss.
    pub fn fetch(&self, source: &ModelSource) -> Result<PathBuf, ScorerError> {
        if let Some(path) = self.cached_path(source) {
            debug!(
                repo = %source.repo_id,
                file = %source.weights_file,
                "Model weights already cached"
            );
            return Ok(path);
        }

        info!(
            repo = %source.repo_id,
            file = %source.weights_file,
            "Downloading model weights"
        );

        let repo = self
            .api
            .repo(Repo::new(source.repo_id.clone(), RepoType::Model));

        let path = repo.get(&source.weights_file).map_err(|e| {
            ScorerError::WeightsUnavailable(format!(
                "failed to download {}/{}: {e}",
                source.repo_id, source.weights_file
            ))
        })?;

        info!(path = %path.display(), "Model weights ready");
        Ok(path)
    }
}
