use std::path::Path;

use anyhow::{Context, Result};

use crate::geometry::Extent;

// ---------------------------------------------------------------------------
// Image loading
// ---------------------------------------------------------------------------

/// A decoded image, normalized to tightly-packed RGBA8.
#[derive(Debug)]
pub struct LoadedImage {
    pub extent: Extent,
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.extent.width as usize * 4
    }
}

/// Decode an image file. The container format is sniffed from the file
/// contents, not the extension.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let reader = image::ImageReader::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("probing format of {}", path.display()))?;

    let decoded = reader
        .decode()
        .with_context(|| format!("decoding {}", path.display()))?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(LoadedImage {
        extent: Extent::new(width, height),
        pixels: rgba.into_raw(),
    })
}
