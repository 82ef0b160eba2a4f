use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_GENERAL_REPO: &str = "dermascan/vit-base-skin-general";
const DEFAULT_GENERAL_WEIGHTS: &str = "model1_general.safetensors";
const DEFAULT_SUBTYPE_REPO: &str = "dermascan/vit-base-skin-malignant";
const DEFAULT_SUBTYPE_WEIGHTS: &str = "model2_malignant.safetensors";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024; // 10MB

/// Preferred compute device for model inference. `Auto` picks the best
/// device the build supports, falling back to CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePreference {
    Auto,
    Cpu,
    Cuda,
    Metal,
}

impl DevicePreference {
    pub fn from_env() -> Self {
        let pref = env::var("DERMASCAN_DEVICE").ok();

        match pref.as_deref() {
            Some(p) if p.eq_ignore_ascii_case("cpu") => DevicePreference::Cpu,
            Some(p) if p.eq_ignore_ascii_case("cuda") => DevicePreference::Cuda,
            Some(p) if p.eq_ignore_ascii_case("metal") => DevicePreference::Metal,
            _ => DevicePreference::Auto,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// One model endpoint: a HuggingFace repo and the weights file inside it.
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub repo_id: String,
    pub weights_file: String,
}

#[derive(Debug, Clone)]
pub struct DermascanConfig {
    pub general_model: ModelSource,
    pub subtype_model: ModelSource,
    pub cache_dir: Option<PathBuf>,
    pub device: DevicePreference,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_image_bytes: usize,
}

impl Default for DermascanConfig {
    fn default() -> Self {
        let general_model = ModelSource {
            repo_id: env::var("DERMASCAN_GENERAL_MODEL_REPO")
                .unwrap_or_else(|_| DEFAULT_GENERAL_REPO.to_string()),
            weights_file: env::var("DERMASCAN_GENERAL_MODEL_FILE")
                .unwrap_or_else(|_| DEFAULT_GENERAL_WEIGHTS.to_string()),
        };

        let subtype_model = ModelSource {
            repo_id: env::var("DERMASCAN_SUBTYPE_MODEL_REPO")
                .unwrap_or_else(|_| DEFAULT_SUBTYPE_REPO.to_string()),
            weights_file: env::var("DERMASCAN_SUBTYPE_MODEL_FILE")
                .unwrap_or_else(|_| DEFAULT_SUBTYPE_WEIGHTS.to_string()),
        };

        let cache_dir = env::var("DERMASCAN_CACHE_DIR").ok().map(PathBuf::from);

        let host = env::var("DERMASCAN_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = env::var("DERMASCAN_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let log_level =
            env::var("DERMASCAN_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        let max_image_bytes = env::var("DERMASCAN_MAX_IMAGE_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_IMAGE_BYTES);

        Self {
            general_model,
            subtype_model,
            cache_dir,
            device: DevicePreference::from_env(),
            host,
            port,
            log_level,
            max_image_bytes,
        }
    }
}

impl DermascanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general_model.repo_id.is_empty() || self.general_model.weights_file.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "general model repo/file must not be empty".to_string(),
            ));
        }
        if self.subtype_model.repo_id.is_empty() || self.subtype_model.weights_file.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "subtype model repo/file must not be empty".to_string(),
            ));
        }
        if self.max_image_bytes == 0 {
            return Err(ConfigError::ValidationFailed(
                "max image size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "DERMASCAN_GENERAL_MODEL_REPO",
            "DERMASCAN_GENERAL_MODEL_FILE",
            "DERMASCAN_SUBTYPE_MODEL_REPO",
            "DERMASCAN_SUBTYPE_MODEL_FILE",
            "DERMASCAN_CACHE_DIR",
            "DERMASCAN_DEVICE",
            "DERMASCAN_HOST",
            "DERMASCAN_PORT",
            "DERMASCAN_LOG_LEVEL",
            "DERMASCAN_MAX_IMAGE_BYTES",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = DermascanConfig::default();
        assert_eq!(config.general_model.repo_id, DEFAULT_GENERAL_REPO);
        assert_eq!(config.subtype_model.weights_file, DEFAULT_SUBTYPE_WEIGHTS);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.device, DevicePreference::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("DERMASCAN_PORT", "9100");
        env::set_var("DERMASCAN_DEVICE", "CPU");
        env::set_var("DERMASCAN_GENERAL_MODEL_REPO", "acme/skin-general");
        let config = DermascanConfig::default();
        assert_eq!(config.port, 9100);
        assert_eq!(config.device, DevicePreference::Cpu);
        assert_eq!(config.general_model.repo_id, "acme/skin-general");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back() {
        clear_env();
        env::set_var("DERMASCAN_PORT", "not-a-port");
        let config = DermascanConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_validation_rejects_zero_image_limit() {
        clear_env();
        let mut config = DermascanConfig::default();
        config.max_image_bytes = 0;
        assert!(config.validate().is_err());
    }
}
