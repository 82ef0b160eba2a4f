//! Image preprocessing shared by both cascade stages.
//!
//! One `ImageInput` is produced per request and passed by reference into
//! every scorer call, so both stages see exactly the same pixels.

use candle_core::{Device, Tensor};
use dermascan_core::error::ScorerError;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

/// Model input resolution (ViT-Base/16 at 224x224).
pub const IMG_SIZE: usize = 224;

// ViT image-processor defaults: scale to [0,1], then (x - 0.5) / 0.5.
const MEAN: f32 = 0.5;
const STD: f32 = 0.5;

/// A preprocessed image: a normalized CHW f32 tensor on the inference
/// device. Opaque to the cascade, which only threads it through to the
/// scorers.
#[derive(Debug, Clone)]
pub struct ImageInput {
    tensor: Tensor,
}

impl ImageInput {
    /// Decode raw image bytes (PNG, JPEG, ...) and preprocess them.
    pub fn from_bytes(bytes: &[u8], device: &Device) -> Result<Self, ScorerError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| ScorerError::Preprocess(format!("failed to decode image: {e}")))?;
        Self::from_image(&img, device)
    }

    /// Resize to the model resolution, scale to [0,1] and normalize.
    pub fn from_image(img: &DynamicImage, device: &Device) -> Result<Self, ScorerError> {
        let (width, height) = (img.width(), img.height());
        let resized = img
            .resize_exact(IMG_SIZE as u32, IMG_SIZE as u32, FilterType::Triangle)
            .to_rgb8();

        let pixels: Vec<f32> = resized
            .into_raw()
            .into_iter()
            .map(|v| (v as f32 / 255.0 - MEAN) / STD)
            .collect();

        // HWC -> CHW
        let tensor = Tensor::from_vec(pixels, (IMG_SIZE, IMG_SIZE, 3), device)
            .and_then(|t| t.permute((2, 0, 1)))
            .map_err(|e| ScorerError::Preprocess(format!("failed to build tensor: {e}")))?;

        debug!(
            original_width = width,
            original_height = height,
            "Image preprocessed to {}x{}",
            IMG_SIZE,
            IMG_SIZE
        );

        Ok(Self { tensor })
    }

    /// Wrap an already-built CHW tensor. Mainly useful in tests.
    pub fn from_tensor(tensor: Tensor) -> Self {
        Self { tensor }
    }

    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_preprocess_shape() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(64, 48));
        let input = ImageInput::from_image(&img, &Device::Cpu).unwrap();
        assert_eq!(input.tensor().dims(), &[3, IMG_SIZE, IMG_SIZE]);
    }

    #[test]
    fn test_black_image_normalizes_to_minus_one() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        let input = ImageInput::from_image(&img, &Device::Cpu).unwrap();
        let values = input.tensor().flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert!(values.iter().all(|v| (v + 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        let err = ImageInput::from_bytes(b"not an image", &Device::Cpu).unwrap_err();
        assert!(err.to_string().contains("image preprocessing failed"));
    }
}
