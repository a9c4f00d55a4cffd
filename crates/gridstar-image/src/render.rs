//! Drawing a grid and its search state as an image.

use std::path::Path;

use gridstar_core::{Claim, Direction, Grid, Point};
use image::{Rgb, RgbImage};
use log::debug;

use crate::ImageGridError;

pub const FLOOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const WALL: Rgb<u8> = Rgb([0, 0, 0]);
/// Cells claimed by the search from the start.
pub const FORWARD: Rgb<u8> = Rgb([255, 0, 0]);
/// Cells claimed by the search from the end.
pub const BACKWARD: Rgb<u8> = Rgb([0, 0, 255]);
pub const ROUTE: Rgb<u8> = Rgb([0, 255, 0]);

/// Draw `grid` one pixel per cell, with `route` on top.
///
/// Only reads cell state, so it can be called on a grid that was searched
/// and not yet reset. Route points outside the grid are ignored.
pub fn render(grid: &Grid, route: Option<&[Point]>) -> RgbImage {
    let mut img = RgbImage::from_pixel(grid.width() as u32, grid.height() as u32, FLOOR);

    for cell in grid.cells() {
        let color = match (cell.is_traversable(), cell.state().claim()) {
            (false, _) => WALL,
            (true, Claim::Unclaimed) => FLOOR,
            (true, Claim::ClaimedBy(Direction::Forward)) => FORWARD,
            (true, Claim::ClaimedBy(Direction::Backward)) => BACKWARD,
        };
        let p = cell.pos();
        img.put_pixel(p.x as u32, p.y as u32, color);
    }

    for &p in route.unwrap_or_default() {
        if grid.contains(p) {
            img.put_pixel(p.x as u32, p.y as u32, ROUTE);
        }
    }
    img
}

/// [`render`] and write the result to `path`; the format follows the
/// file extension.
pub fn save_render(
    grid: &Grid,
    route: Option<&[Point]>,
    path: impl AsRef<Path>,
) -> Result<(), ImageGridError> {
    let path = path.as_ref();
    render(grid, route).save(path)?;
    debug!("rendered grid to {}", path.display());
    Ok(())
}
