//! 2D textures

use std::path::Path;

use thiserror::Error;

use crate::assets::image_loader::{ImageData, ImageError};
use crate::render::gpu::{
    GraphicsDevice, PixelFormat, TextureFilter, TextureId, TextureSampling, TextureWrap,
};

/// Texture loading errors
#[derive(Error, Debug)]
pub enum TextureError {
    /// The image could not be decoded
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Width or height is zero
    #[error("texture has zero size ({width}x{height})")]
    Empty {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
}

/// A 2D texture with mipmaps
#[derive(Debug)]
pub struct Texture2D {
    id: TextureId,
    width: u32,
    height: u32,
    format: PixelFormat,
}

/// Sampler state used for a given pixel format
///
/// RGBA images clamp (their borders are usually transparent), everything else
/// repeats.
pub const fn sampling_for(format: PixelFormat) -> TextureSampling {
    TextureSampling {
        wrap: match format {
            PixelFormat::Rgba => TextureWrap::ClampToEdge,
            PixelFormat::Red | PixelFormat::Rgb => TextureWrap::Repeat,
        },
        min_filter: TextureFilter::LinearMipmapLinear,
        mag_filter: TextureFilter::Linear,
    }
}

impl Texture2D {
    /// Decode an image file and upload it
    pub fn load(device: &mut dyn GraphicsDevice, path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let image = ImageData::from_file(path)?;
        Self::from_image(device, &image)
    }

    /// Upload decoded pixels
    pub fn from_image(device: &mut dyn GraphicsDevice, image: &ImageData) -> Result<Self, TextureError> {
        if image.width == 0 || image.height == 0 {
            return Err(TextureError::Empty {
                width: image.width,
                height: image.height,
            });
        }

        let id = device.create_texture();
        device.bind_texture(0, Some(id));
        device.upload_texture_2d(&image.as_texture_image());
        device.generate_mipmap();
        device.set_texture_sampling(sampling_for(image.format));

        Ok(Self {
            id,
            width: image.width,
            height: image.height,
            format: image.format,
        })
    }

    /// Load a texture, logging and skipping it on failure
    pub fn load_or_warn(device: &mut dyn GraphicsDevice, path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match Self::load(device, path) {
            Ok(texture) => Some(texture),
            Err(err) => {
                log::warn!("Failed to load texture {:?}: {}", path, err);
                None
            }
        }
    }

    /// Driver handle
    pub const fn id(&self) -> TextureId {
        self.id
    }

    /// Size in pixels
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Channel layout
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bind to texture unit `unit`
    pub fn bind(&self, device: &mut dyn GraphicsDevice, unit: u32) {
        device.bind_texture(unit, Some(self.id));
    }

    /// Release the GPU object
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        device.delete_texture(self.id);
    }
}
