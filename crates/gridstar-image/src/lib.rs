//! Raster image input and output for gridstar grids.
//!
//! One pixel is one cell. When loading, opaque white pixels are floor and
//! every other pixel is a wall. When rendering, walls are black, free floor
//! white, cells claimed by the forward search red, cells claimed by the
//! backward search blue, and an optional route green.

mod error;
mod load;
mod render;

pub use error::ImageGridError;
pub use load::{FLOOR_PIXEL, decode_grid, grid_from_image, load_grid};
pub use render::{BACKWARD, FLOOR, FORWARD, ROUTE, WALL, render, save_render};
