use gridstar_core::GridError;

/// Failure to turn an image into a [`Grid`](gridstar_core::Grid) or to
/// write a rendering out.
#[derive(Debug, thiserror::Error)]
pub enum ImageGridError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("image of {width}x{height} pixels is too large for a grid")]
    TooLarge { width: u32, height: u32 },
}
