//! Sample loading and PNG export

use std::path::Path;

use image::{ImageBuffer, RgbaImage};

use crate::io::error::{Result, WfcError};
use crate::spatial::pixels::{PixelGrid, PixelSource, Rgba};

impl PixelSource for RgbaImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.get_pixel_checked(x as u32, y as u32)
            .map_or([0, 0, 0, 0], |pixel| pixel.0)
    }
}

/// Load an image file as an RGBA sample
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_sample(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| WfcError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_rgba8())
}

/// Convert a rendered grid into an image buffer
pub fn pixel_grid_to_image(grid: &PixelGrid) -> RgbaImage {
    ImageBuffer::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        image::Rgba(grid.pixel(x as usize, y as usize))
    })
}

/// Create the parent directory of an output path when missing
///
/// # Errors
///
/// Returns an error if the directory cannot be created
pub fn ensure_parent_dir(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(parent).map_err(|e| WfcError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    Ok(())
}

/// Export a rendered grid as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The grid is empty
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_pixel_grid_as_png(grid: &PixelGrid, output_path: &Path) -> Result<()> {
    if grid.width() == 0 || grid.height() == 0 {
        return Err(WfcError::InvalidSourceData {
            reason: "Rendered grid has no pixels".to_string(),
        });
    }

    ensure_parent_dir(output_path)?;

    pixel_grid_to_image(grid)
        .save(output_path)
        .map_err(|e| WfcError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
