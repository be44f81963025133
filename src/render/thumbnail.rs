use super::backend::RenderError;
use image::ImageFormat;
use image::imageops::FilterType;
use std::path::Path;

/// Fill-resize `png` to exactly `width × height` (center crop) and save as PNG.
pub fn create_thumbnail(
    png: &Path,
    thumbnail: &Path,
    width: u32,
    height: u32,
) -> Result<(), RenderError> {
    let img = image::open(png)
        .map_err(|e| RenderError::Failed(format!("Failed to read {}: {e}", png.display())))?;
    img.resize_to_fill(width, height, FilterType::Lanczos3)
        .save_with_format(thumbnail, ImageFormat::Png)
        .map_err(|e| {
            RenderError::Failed(format!("Failed to write {}: {e}", thumbnail.display()))
        })
}
