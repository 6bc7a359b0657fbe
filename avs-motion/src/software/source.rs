//! In-memory clips.

use std::sync::Arc;

use crate::format::Format;
use crate::frame::{Frame, FrameRef};
use crate::node::{FrameSource, GetFrameError};
use crate::video_info::{Framerate, Resolution, VideoInfo};

/// Framerate given to clips built without one.
pub const DEFAULT_FRAMERATE: Framerate = Framerate {
    numerator: 24,
    denominator: 1,
};

/// A clip repeating one frame.
pub struct BlankClip {
    info: VideoInfo,
    frame: FrameRef,
}

impl BlankClip {
    /// Creates a clip of `num_frames` constant frames, `color` holding one value per plane.
    pub fn new(format: Format, resolution: Resolution, num_frames: usize, color: &[f32]) -> Self {
        Self {
            info: VideoInfo {
                format,
                framerate: DEFAULT_FRAMERATE,
                resolution,
                num_frames,
            },
            frame: Arc::new(Frame::blank(format, resolution, color)),
        }
    }
}

impl FrameSource for BlankClip {
    #[inline]
    fn info(&self) -> VideoInfo {
        self.info
    }

    #[inline]
    fn get_frame(&self, _n: usize) -> Result<FrameRef, GetFrameError> {
        Ok(Arc::clone(&self.frame))
    }
}

/// A clip made of prerendered frames.
pub struct FrameList {
    info: VideoInfo,
    frames: Vec<FrameRef>,
}

impl FrameList {
    /// Creates a clip from frames sharing one format and resolution.
    ///
    /// Returns `None` if `frames` is empty or the frames don't match.
    pub fn new(frames: Vec<Frame>) -> Option<Self> {
        let first = frames.first()?;
        let format = first.format();
        let resolution = first.resolution(0);

        if frames
            .iter()
            .any(|frame| frame.format() != format || frame.resolution(0) != resolution)
        {
            return None;
        }

        Some(Self {
            info: VideoInfo {
                format,
                framerate: DEFAULT_FRAMERATE,
                resolution,
                num_frames: frames.len(),
            },
            frames: frames.into_iter().map(Arc::new).collect(),
        })
    }
}

impl FrameSource for FrameList {
    #[inline]
    fn info(&self) -> VideoInfo {
        self.info
    }

    #[inline]
    fn get_frame(&self, n: usize) -> Result<FrameRef, GetFrameError> {
        self.frames
            .get(n)
            .cloned()
            .ok_or(GetFrameError::OutOfRange {
                n,
                num_frames: self.frames.len(),
            })
    }
}
