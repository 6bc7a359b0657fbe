//! Video clip formats.

use crate::format::Format;

/// Represents video resolution.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

/// Represents video framerate.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Framerate {
    pub numerator: u64,
    pub denominator: u64,
}

/// Contains information about a video clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    /// Format of the clip.
    pub format: Format,

    /// Framerate of the clip.
    pub framerate: Framerate,

    /// Resolution of the clip.
    pub resolution: Resolution,

    /// Length of the clip.
    pub num_frames: usize,
}

impl VideoInfo {
    /// Returns a copy with a different resolution.
    #[inline]
    pub fn with_resolution(self, resolution: Resolution) -> Self {
        Self { resolution, ..self }
    }
}
