use std::io::Cursor;
use std::path::Path;

use image::codecs::gif::{GifDecoder, GifEncoder};
use image::{AnimationDecoder, Delay, DynamicImage, Frame, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

/// A gradient so encoders have something non-trivial to compress.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

pub fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    gradient(width, height)
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("encoding fixture image");
    buf
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encoded(width, height, ImageFormat::Jpeg)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encoded(width, height, ImageFormat::Png)
}

/// Write an image fixture to disk, creating parent directories.
pub fn write_image(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("creating fixture dir");
    }
    std::fs::write(path, bytes).expect("writing fixture image");
}

/// Dimensions of an encoded image file on disk.
pub fn dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).expect("reading image dimensions")
}

/// A GIF with `frames` solid-colour frames, 100ms apart.
pub fn animated_gif(width: u32, height: u32, frames: u8) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buf);
        let frames = (0..frames).map(|i| {
            let shade = i.wrapping_mul(50);
            let img = RgbaImage::from_pixel(width, height, Rgba([shade, 0, 255 - shade, 255]));
            Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(100, 1))
        });
        encoder.encode_frames(frames).expect("encoding fixture gif");
    }
    buf
}

/// Number of frames and the size of the first one in an encoded GIF.
pub fn gif_frames(bytes: &[u8]) -> (usize, (u32, u32)) {
    let frames = GifDecoder::new(Cursor::new(bytes))
        .expect("opening gif")
        .into_frames()
        .collect_frames()
        .expect("decoding gif frames");
    (frames.len(), frames[0].buffer().dimensions())
}
