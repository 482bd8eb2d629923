//! Source image type and viewport scaling

use std::path::PathBuf;

use anyhow::Context;
use image::RgbaImage;
use image::imageops::FilterType;

use crate::domain::{SurfaceSize, Viewport, fit_scale, scaled_size};

/// Where the editor's source image comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Image file on disk
    Path(PathBuf),
    /// Encoded image bytes already in memory
    Bytes(Vec<u8>),
}

impl ImageSource {
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

/// Decode the source image into RGBA pixels
///
/// The format is guessed from the content, not the file extension.
pub fn decode_source(source: &ImageSource) -> anyhow::Result<RgbaImage> {
    let decoded = match source {
        ImageSource::Path(path) => image::ImageReader::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?
            .with_guessed_format()
            .context("Failed to detect image format")?
            .decode()
            .with_context(|| format!("Failed to decode {}", path.display()))?,
        ImageSource::Bytes(bytes) => {
            image::load_from_memory(bytes).context("Failed to decode image bytes")?
        }
    };
    let rgba = decoded.to_rgba8();
    log::debug!(
        "Source image decoded: {}x{} pixels",
        rgba.width(),
        rgba.height()
    );
    Ok(rgba)
}

/// The source image resized to fit the viewport
#[derive(Clone, Debug)]
pub struct ScaledImage {
    pub rgba: RgbaImage,
    /// Uniform factor applied to both axes
    pub scale: f32,
}

impl ScaledImage {
    /// Size of the drawing surface for this image
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.rgba.width(), self.rgba.height())
    }
}

/// Scale `source` uniformly so it fits inside `viewport`
///
/// Returns `None` when either the image or the viewport is empty.
pub fn scale_to_viewport(source: &RgbaImage, viewport: Viewport) -> Option<ScaledImage> {
    let scale = fit_scale(source.width(), source.height(), viewport)?;
    let size = scaled_size(source.width(), source.height(), scale);
    let rgba = if size.width == source.width() && size.height == source.height() {
        source.clone()
    } else {
        image::imageops::resize(source, size.width, size.height, FilterType::Triangle)
    };
    log::debug!(
        "Scaled {}x{} -> {}x{} (scale {:.3})",
        source.width(),
        source.height(),
        size.width,
        size.height,
        scale
    );
    Some(ScaledImage { rgba, scale })
}
