// src/images/resize.rs

use std::io::Cursor;

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, Frame, ImageFormat};
use tracing::debug;

use crate::errors::{AssetpipeError, Result};
use crate::pipeline::asset::Decoded;
use crate::pipeline::{Asset, Transform};

/// Output size for an image of `width` x `height` bounded to `target` wide.
///
/// Narrower images keep their size unless `upscale` is set. The height
/// follows the aspect ratio, rounded, and never drops below one pixel.
pub fn target_dimensions(width: u32, height: u32, target: u32, upscale: bool) -> (u32, u32) {
    if width == 0 || width == target || (width < target && !upscale) {
        return (width, height);
    }
    let scaled = (height as f64 * target as f64 / width as f64).round() as u32;
    (target, scaled.max(1))
}

pub(crate) fn image_error(asset: &Asset, message: impl Into<String>) -> AssetpipeError {
    AssetpipeError::ImageError {
        path: asset.source_path.clone(),
        message: message.into(),
    }
}

/// Decode the asset, detecting the format from its content.
pub(crate) fn decode(asset: &Asset) -> Result<Decoded> {
    let format = image::guess_format(&asset.contents)
        .map_err(|e| image_error(asset, format!("unsupported image format: {e}")))?;
    let image = image::load_from_memory_with_format(&asset.contents, format)
        .map_err(|e| image_error(asset, format!("cannot decode {format:?}: {e}")))?;
    Ok(Decoded {
        image,
        format,
        modified: false,
    })
}

/// All frames of an animated GIF, or `None` for anything with one frame.
pub(crate) fn animation_frames(asset: &Asset) -> Result<Option<Vec<Frame>>> {
    if !matches!(image::guess_format(&asset.contents), Ok(ImageFormat::Gif)) {
        return Ok(None);
    }
    let frames = GifDecoder::new(Cursor::new(&asset.contents))
        .and_then(|decoder| decoder.into_frames().collect_frames())
        .map_err(|e| image_error(asset, format!("cannot decode Gif: {e}")))?;
    Ok((frames.len() > 1).then_some(frames))
}

/// Bounds images to a maximum width, keeping the aspect ratio and format.
///
/// Still images are not re-encoded here: the resized pixels travel in
/// [`Asset::decoded`] and [`Optimize`](super::Optimize) encodes them once.
/// Animated GIFs are resized frame by frame and encoded straight away.
#[derive(Debug, Clone, Copy)]
pub struct Resize {
    width: u32,
    upscale: bool,
}

impl Resize {
    pub fn new(width: u32, upscale: bool) -> Self {
        Self { width, upscale }
    }

    fn resize_animation(&self, asset: Asset, frames: Vec<Frame>) -> Result<Asset> {
        let (w, h) = frames[0].buffer().dimensions();
        let (new_w, new_h) = target_dimensions(w, h, self.width, self.upscale);
        if (new_w, new_h) == (w, h) {
            return Ok(asset);
        }

        debug!(path = ?asset.source_path, frames = frames.len(), to = ?(new_w, new_h), "resizing animation");
        let resized = frames.into_iter().map(|frame| {
            let delay = frame.delay();
            let buffer = imageops::resize(frame.buffer(), new_w, new_h, FilterType::Lanczos3);
            Frame::from_parts(buffer, 0, 0, delay)
        });

        let mut buf = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut buf);
            encoder
                .set_repeat(Repeat::Infinite)
                .and_then(|_| encoder.encode_frames(resized))
                .map_err(|e| image_error(&asset, format!("cannot encode Gif: {e}")))?;
        }
        Ok(asset.with_contents(buf))
    }
}

impl Transform for Resize {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn apply(&self, asset: Asset) -> Result<Asset> {
        if let Some(frames) = animation_frames(&asset)? {
            return self.resize_animation(asset, frames);
        }

        let decoded = decode(&asset)?;
        let (w, h) = (decoded.image.width(), decoded.image.height());
        let (new_w, new_h) = target_dimensions(w, h, self.width, self.upscale);
        if (new_w, new_h) == (w, h) {
            return Ok(asset.with_decoded(decoded));
        }

        debug!(path = ?asset.source_path, from = ?(w, h), to = ?(new_w, new_h), "resizing");
        let image = decoded.image.resize_exact(new_w, new_h, FilterType::Lanczos3);
        Ok(asset.with_decoded(Decoded {
            image,
            format: decoded.format,
            modified: true,
        }))
    }
}
