//! Image decoding for texture uploads
//!
//! Images are flipped vertically on load so the first row is the bottom one,
//! matching OpenGL's texture coordinate origin. Channel counts are kept as
//! decoded (1, 3 or 4); two-channel images are widened to RGBA.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

use crate::render::gpu::{PixelFormat, TextureImage};

/// Image decoding errors
#[derive(Error, Debug)]
pub enum ImageError {
    /// The file could not be opened or decoded
    #[error("failed to load image '{path}': {source}")]
    Decode {
        /// Image file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: image::ImageError,
    },

    /// In-memory bytes could not be decoded
    #[error("failed to decode image from memory: {0}")]
    Memory(#[from] image::ImageError),
}

/// Decoded pixels ready for GPU upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Tightly packed pixels, bottom row first
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Channel layout of `data`
    pub format: PixelFormat,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref).map_err(|source| ImageError::Decode {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let image = Self::from_dynamic(&img);

        log::info!(
            "Loaded image {}x{} ({:?}) from {:?}",
            image.width,
            image.height,
            image.format,
            path_ref
        );
        Ok(image)
    }

    /// Decode an image held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let img = image::load_from_memory(bytes)?;
        let image = Self::from_dynamic(&img);
        log::debug!("Loaded image {}x{} from memory", image.width, image.height);
        Ok(image)
    }

    fn from_dynamic(img: &DynamicImage) -> Self {
        let flipped = img.flipv();
        let (width, height) = (flipped.width(), flipped.height());
        let (data, format) = match flipped.color().channel_count() {
            1 => (flipped.to_luma8().into_raw(), PixelFormat::Red),
            3 => (flipped.to_rgb8().into_raw(), PixelFormat::Rgb),
            _ => (flipped.to_rgba8().into_raw(), PixelFormat::Rgba),
        };
        Self {
            data,
            width,
            height,
            format,
        }
    }

    /// Create a solid RGBA image
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            data,
            width,
            height,
            format: PixelFormat::Rgba,
        }
    }

    /// Borrow as an upload description
    pub fn as_texture_image(&self) -> TextureImage<'_> {
        TextureImage {
            width: self.width,
            height: self.height,
            format: self.format,
            pixels: &self.data,
        }
    }

    /// Size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.format, PixelFormat::Rgba);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_rows_are_flipped() {
        // Top row red, bottom row blue.
        let mut rgb = RgbImage::new(1, 2);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(0, 1, Rgb([0, 0, 255]));

        let img = ImageData::from_bytes(&encode_png(DynamicImage::ImageRgb8(rgb))).unwrap();
        assert_eq!(img.format, PixelFormat::Rgb);
        assert_eq!(&img.data[0..3], &[0, 0, 255]);
        assert_eq!(&img.data[3..6], &[255, 0, 0]);
    }

    #[test]
    fn test_single_channel_kept() {
        let gray = GrayImage::from_pixel(2, 2, Luma([7]));
        let img = ImageData::from_bytes(&encode_png(DynamicImage::ImageLuma8(gray))).unwrap();
        assert_eq!(img.format, PixelFormat::Red);
        assert_eq!(img.data, vec![7; 4]);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(matches!(
            ImageData::from_file("no/such/texture.png"),
            Err(ImageError::Decode { .. })
        ));
    }

    #[test]
    fn test_garbage_bytes_are_error() {
        assert!(ImageData::from_bytes(b"not an image").is_err());
    }
}
