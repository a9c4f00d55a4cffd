//! Reading grids from raster images.

use std::path::Path;

use gridstar_core::Grid;
use image::{DynamicImage, Rgba};
use log::debug;

use crate::ImageGridError;

/// The only pixel value read as floor. Anything else, including
/// off-white and translucent white, is a wall.
pub const FLOOR_PIXEL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Build a grid with one cell per pixel.
pub fn grid_from_image(img: &DynamicImage) -> Result<Grid, ImageGridError> {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let (Ok(width), Ok(height)) = (i32::try_from(w), i32::try_from(h)) else {
        return Err(ImageGridError::TooLarge { width: w, height: h });
    };

    let floor = rgba.pixels().map(|&px| px == FLOOR_PIXEL).collect();
    Ok(Grid::new(width, height, floor)?)
}

/// Decode an encoded image (PNG) held in memory.
pub fn decode_grid(bytes: &[u8]) -> Result<Grid, ImageGridError> {
    let img = image::load_from_memory(bytes)?;
    grid_from_image(&img)
}

/// Load a grid from an image file.
pub fn load_grid(path: impl AsRef<Path>) -> Result<Grid, ImageGridError> {
    let path = path.as_ref();
    let img = image::open(path)?;
    let grid = grid_from_image(&img)?;
    debug!(
        "loaded {}x{} grid from {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(grid)
}
