//! Compute device selection with CPU fallback.

use candle_core::Device;
use dermascan_core::config::DevicePreference;
use dermascan_core::error::ScorerError;
use tracing::info;

/// Resolve a device preference into a candle device.
///
/// `Auto` picks the best accelerator the build was compiled with and
/// falls back to CPU when creating it fails. Explicit preferences fail
/// hard if the build lacks the matching feature.
pub fn select_device(pref: DevicePreference) -> Result<Device, ScorerError> {
    match pref {
        DevicePreference::Cpu => Ok(Device::Cpu),
        DevicePreference::Cuda => {
            #[cfg(feature = "cuda")]
            {
                Device::new_cuda(0)
                    .map_err(|e| ScorerError::Device(format!("failed to create CUDA device: {e}")))
            }
            #[cfg(not(feature = "cuda"))]
            {
                Err(ScorerError::Device(
                    "CUDA requested but this build was not compiled with the cuda feature"
                        .to_string(),
                ))
            }
        }
        DevicePreference::Metal => {
            #[cfg(feature = "metal")]
            {
                Device::new_metal(0)
                    .map_err(|e| ScorerError::Device(format!("failed to create Metal device: {e}")))
            }
            #[cfg(not(feature = "metal"))]
            {
                Err(ScorerError::Device(
                    "Metal requested but this build was not compiled with the metal feature"
                        .to_string(),
                ))
            }
        }
        DevicePreference::Auto => Ok(auto_device()),
    }
}

fn auto_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Using CUDA device");
                return device;
            }
            Err(e) => tracing::warn!("CUDA unavailable ({e}), falling back to CPU"),
        }
    }
    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Using Metal device");
                return device;
            }
            Err(e) => tracing::warn!("Metal unavailable ({e}), falling back to CPU"),
        }
    }
    info!("Using CPU device");
    Device::Cpu
}
