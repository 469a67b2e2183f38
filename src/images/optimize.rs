// src/images/optimize.rs

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use super::resize::{animation_frames, decode, image_error};
use crate::errors::Result;
use crate::pipeline::{Asset, Transform};

/// Re-encodes images with size-oriented encoder settings.
///
/// The output is never larger than the input: when re-encoding does not
/// help, the original bytes are kept. The format never changes. Pixels a
/// previous [`Resize`](super::Resize) left in [`Asset::decoded`] are encoded
/// directly, so a lossy format is only ever encoded once. Animated GIFs are
/// passed through as they are.
#[derive(Debug, Clone, Copy)]
pub struct Optimize {
    jpeg_quality: u8,
}

impl Optimize {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }

    fn encode(&self, img: &DynamicImage, format: ImageFormat) -> image::ImageResult<Vec<u8>> {
        let mut buf = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, self.jpeg_quality))?;
            }
            ImageFormat::Png => {
                img.write_with_encoder(PngEncoder::new_with_quality(
                    &mut buf,
                    CompressionType::Best,
                    PngFilter::Adaptive,
                ))?;
            }
            other => img.write_to(&mut Cursor::new(&mut buf), other)?,
        }
        Ok(buf)
    }
}

impl Transform for Optimize {
    fn name(&self) -> &'static str {
        "optimize"
    }

    fn apply(&self, mut asset: Asset) -> Result<Asset> {
        let decoded = match asset.decoded.take() {
            Some(decoded) => decoded,
            None => {
                if animation_frames(&asset)?.is_some() {
                    debug!(path = ?asset.source_path, "animated gif; keeping input");
                    return Ok(asset);
                }
                decode(&asset)?
            }
        };
        let format = decoded.format;
        let optimized = self
            .encode(&decoded.image, format)
            .map_err(|e| image_error(&asset, format!("cannot encode {format:?}: {e}")))?;

        let before = asset.contents.len();
        if !decoded.modified && optimized.len() >= before {
            debug!(path = ?asset.source_path, bytes = before, "already optimal; keeping input");
            return Ok(asset);
        }

        debug!(
            path = ?asset.source_path,
            before,
            after = optimized.len(),
            "optimized"
        );
        Ok(asset.with_contents(optimized))
    }
}
