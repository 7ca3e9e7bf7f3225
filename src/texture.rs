// texture.rs — 全景纹理加载 (文件 / 内存)，可在后台线程解码

use crate::error::ViewerError;
use image::io::Reader as ImageReader;
use image::{GenericImageView, RgbaImage};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

#[derive(Debug, Clone)]
pub enum TextureSource {
    Path(PathBuf),
    /// Encoded bytes (jpg/png/...), format sniffed from content.
    Encoded(Vec<u8>),
    Decoded(RgbaImage),
}

impl TextureSource {
    pub fn describe(&self) -> String {
        match self {
            TextureSource::Path(p) => p.display().to_string(),
            TextureSource::Encoded(_) | TextureSource::Decoded(_) => "in-memory image".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOptions {
    /// Flip rows so that v = 0 samples the bottom of the image.
    pub origin_bottom_left: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            origin_bottom_left: true,
        }
    }
}

pub fn load_texture(
    source: &TextureSource,
    options: &TextureOptions,
) -> Result<RgbaImage, ViewerError> {
    let origin = source.describe();
    let mut rgba = match source {
        TextureSource::Path(path) => {
            let file = File::open(path).map_err(|e| ViewerError::texture(&origin, e))?;
            decode(BufReader::new(file), &origin)?
        }
        TextureSource::Encoded(bytes) => decode(Cursor::new(bytes.as_slice()), &origin)?,
        TextureSource::Decoded(img) => img.clone(),
    };

    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(ViewerError::texture(origin, "image has no pixels"));
    }
    if options.origin_bottom_left {
        image::imageops::flip_vertical_in_place(&mut rgba);
    }
    Ok(rgba)
}

fn decode<R: BufRead + Seek>(reader: R, origin: &str) -> Result<RgbaImage, ViewerError> {
    let img = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|mut r| {
            r.no_limits();
            r.decode()
        })
        .map_err(|e| ViewerError::texture(origin, e))?;

    let (w, h) = img.dimensions();
    log::info!("decoded {origin}: {w}x{h}");
    Ok(img.to_rgba8())
}

/// Decode on a worker thread; the result arrives on the returned channel.
pub fn spawn_load(
    source: TextureSource,
    options: TextureOptions,
) -> Receiver<Result<RgbaImage, ViewerError>> {
    let (tx, rx) = channel();
    thread::spawn(move || {
        log::info!("loading {} in background", source.describe());
        if tx.send(load_texture(&source, &options)).is_err() {
            log::warn!("texture receiver dropped before load finished");
        }
    });
    rx
}

/// Shrink `img` so neither side exceeds `max_dimension`, keeping aspect ratio.
pub fn fit_to_limit(img: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (src_w, src_h) = img.dimensions();
    if src_w <= max_dimension && src_h <= max_dimension {
        return img;
    }

    let scale = (max_dimension as f32 / src_w.max(src_h) as f32).min(1.0);
    let new_w = ((src_w as f32 * scale) as u32).clamp(1, max_dimension);
    let new_h = ((src_h as f32 * scale) as u32).clamp(1, max_dimension);
    log::warn!(
        "image {src_w}x{src_h} exceeds GPU limit {max_dimension}, scaled to {new_w}x{new_h}"
    );
    image::DynamicImage::ImageRgba8(img)
        .resize_exact(new_w, new_h, image::imageops::FilterType::Lanczos3)
        .to_rgba8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgba};
    use std::time::Duration;

    fn two_row_image() -> RgbaImage {
        // 上红下蓝
        RgbaImage::from_fn(4, 2, |_, y| {
            if y == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn encoded_source_decodes_and_flips() {
        let source = TextureSource::Encoded(png_bytes(&two_row_image()));
        let flipped = load_texture(&source, &TextureOptions::default()).unwrap();
        assert_eq!(flipped.dimensions(), (4, 2));
        assert_eq!(*flipped.get_pixel(0, 0), Rgba([0, 0, 255, 255]));

        let options = TextureOptions {
            origin_bottom_left: false,
        };
        let upright = load_texture(&source, &options).unwrap();
        assert_eq!(*upright.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn missing_file_is_texture_unavailable() {
        let source = TextureSource::Path(PathBuf::from("/no/such/panorama.jpg"));
        let err = load_texture(&source, &TextureOptions::default()).unwrap_err();
        assert!(err.is_texture_unavailable());
        assert!(err.to_string().contains("/no/such/panorama.jpg"));
    }

    #[test]
    fn corrupt_bytes_are_texture_unavailable() {
        let source = TextureSource::Encoded(b"definitely not an image".to_vec());
        let err = load_texture(&source, &TextureOptions::default()).unwrap_err();
        assert!(err.is_texture_unavailable());
        assert!(err.to_string().contains("in-memory image"));
    }

    #[test]
    fn empty_decoded_image_is_rejected() {
        let source = TextureSource::Decoded(RgbaImage::new(0, 0));
        assert!(load_texture(&source, &TextureOptions::default()).is_err());
    }

    #[test]
    fn background_load_delivers_result() {
        let rx = spawn_load(
            TextureSource::Decoded(two_row_image()),
            TextureOptions::default(),
        );
        let img = rx.recv_timeout(Duration::from_secs(10)).unwrap().unwrap();
        assert_eq!(img.dimensions(), (4, 2));
    }

    #[test]
    fn fit_to_limit_preserves_aspect() {
        let img = RgbaImage::new(400, 200);
        let fitted = fit_to_limit(img, 100);
        assert_eq!(fitted.dimensions(), (100, 50));

        let small = RgbaImage::new(64, 32);
        assert_eq!(fit_to_limit(small, 100).dimensions(), (64, 32));
    }
}
