//! PNG export of the annotated composite

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;

/// Encode an RGBA image as 8-bit PNG
pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

pub fn save_rgba_to_buffer(img: &RgbaImage, buffer: &mut Vec<u8>) -> anyhow::Result<()> {
    Ok(write_png(buffer, img)?)
}

/// Write `img` to `path` as PNG
///
/// The file is written to a temporary sibling first and then moved into place,
/// so a failed export never leaves a truncated image behind.
pub fn save_rgba(img: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut file = tempfile::Builder::new()
        .prefix(".annotated-")
        .suffix(".png")
        .tempfile_in(dir)
        .context("Failed to create temporary export file")?;
    write_png(&mut file, img).context("Failed to encode PNG")?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Exported {}x{} image to {}", img.width(), img.height(), path.display());
    Ok(())
}

/// Directory exports land in when the host does not pick one
pub fn default_export_dir() -> Option<PathBuf> {
    dirs::download_dir()
        .or_else(dirs::picture_dir)
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
}

/// Full default export path for `file_name`
pub fn default_export_path(file_name: &str) -> PathBuf {
    default_export_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(file_name)
}
