//! Decoding generated images into raw RGB rasters for embedding.

use crate::{Error, Result};
use image::RgbaImage;

/// An image decoded to 8-bit RGB with any alpha flattened onto white.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl DecodedImage {
    /// Decode `bytes`, reporting failures against `page` and `asset`.
    pub fn decode(bytes: &[u8], page: usize, asset: &'static str) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::Asset {
                page,
                asset,
                reason: "is empty".to_string(),
            });
        }

        let img = image::load_from_memory(bytes).map_err(|e| Error::Asset {
            page,
            asset,
            reason: format!("could not be decoded: {}", e),
        })?;

        if img.width() == 0 || img.height() == 0 {
            return Err(Error::Asset {
                page,
                asset,
                reason: format!("has zero size ({}x{})", img.width(), img.height()),
            });
        }

        tracing::debug!(
            "Decoded {} for page {} ({}x{})",
            asset,
            page,
            img.width(),
            img.height()
        );

        Ok(Self::from_rgba(&img.to_rgba8()))
    }

    fn from_rgba(img: &RgbaImage) -> Self {
        let mut rgb = Vec::with_capacity(img.width() as usize * img.height() as usize * 3);
        for pixel in img.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = u16::from(a);
            for channel in [r, g, b] {
                let blended = (u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255;
                rgb.push(blended as u8);
            }
        }
        Self {
            width: img.width(),
            height: img.height(),
            rgb,
        }
    }
}
