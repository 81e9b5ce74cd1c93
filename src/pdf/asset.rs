use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

use crate::error::RenderError;

/// Edge length of the built-in mark, in pixels.
const PLACEHOLDER_SIZE: u32 = 64;

/// Decoded logo, split into the RGB samples and alpha mask a PDF image needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoAsset {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Vec<u8>,
}

impl LogoAsset {
    /// Decode a PNG or JPEG logo from disk.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        if !path.is_file() {
            return Err(RenderError::AssetNotFound(path.to_path_buf()));
        }
        let image = image::open(path).map_err(|source| RenderError::AssetDecode {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), width = image.width(), height = image.height(), "logo loaded");
        Ok(Self::from_image(&image))
    }

    /// Plain square mark in the document's accent green, used when no logo is configured.
    pub fn placeholder() -> Self {
        let inset = PLACEHOLDER_SIZE / 4;
        let image = RgbaImage::from_fn(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, |x, y| {
            let inner = (inset..PLACEHOLDER_SIZE - inset).contains(&x)
                && (inset..PLACEHOLDER_SIZE - inset).contains(&y);
            if inner {
                Rgba([0xFF, 0xFF, 0xFF, 0xFF])
            } else {
                Rgba([0x4C, 0xAF, 0x50, 0xFF])
            }
        });
        Self::from_rgba(&image)
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        Self::from_rgba(&image.to_rgba8())
    }

    fn from_rgba(image: &RgbaImage) -> Self {
        let pixel_count = (image.width() * image.height()) as usize;
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in image.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }
        Self {
            width: image.width(),
            height: image.height(),
            rgb,
            alpha,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved 8-bit RGB samples, row-major.
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// 8-bit alpha samples, one per pixel.
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha.iter().all(|&a| a == 0xFF)
    }
}

/// Resolve the logo before rendering: the configured file, or the built-in mark.
pub fn load_asset(logo: Option<&Path>) -> Result<LogoAsset, RenderError> {
    match logo {
        Some(path) => LogoAsset::load(path),
        None => Ok(LogoAsset::placeholder()),
    }
}
