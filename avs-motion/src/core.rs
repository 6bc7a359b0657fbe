//! The host core: the set of built-in filters a plugin can build clips with.

use anyhow::Error;

use crate::node::Node;

/// Name of the border-adding host function.
pub const ADD_BORDERS: &str = "AddBorders";
/// Name of the sub-pixel resize host function.
pub const RESIZE: &str = "Spline36Resize";
/// Name of the cropping host function.
pub const CROP: &str = "Crop";

/// Arguments of a resize call.
///
/// The source window `(src_left, src_top, src_width, src_height)` is mapped onto an output of
/// `width` × `height` pixels. Window coordinates may be fractional and may extend past the clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeArgs {
    pub width: usize,
    pub height: usize,
    pub src_left: f64,
    pub src_top: f64,
    pub src_width: f64,
    pub src_height: f64,
}

/// Pixel transforms provided by the host.
///
/// Every call returns a new lazily evaluated clip on top of `clip`; nothing is rendered until a
/// frame is requested from it.
pub trait Core: Send + Sync {
    /// Returns whether the host provides the named function.
    fn has_function(&self, name: &str) -> bool;

    /// Pads the clip with `color`.
    fn add_borders(
        &self,
        clip: &Node,
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
        color: i64,
    ) -> Result<Node, Error>;

    /// Resamples the clip with a sub-pixel accurate kernel.
    fn resize(&self, clip: &Node, args: ResizeArgs) -> Result<Node, Error>;

    /// Crops the clip.
    ///
    /// Positive `width` and `height` give the output size, zero or negative values are margins
    /// removed from the right and bottom edges.
    fn crop(&self, clip: &Node, left: usize, top: usize, width: i64, height: i64)
        -> Result<Node, Error>;
}
