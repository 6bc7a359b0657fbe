//! Clips, as handed out by the host's filter graph.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::frame::FrameRef;
use crate::video_info::VideoInfo;

/// An error that can occur when retrieving a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GetFrameError {
    #[error("Frame {n} is out of range, the clip has {num_frames} frames")]
    OutOfRange { n: usize, num_frames: usize },
    #[error("{0}")]
    Filter(String),
}

/// A lazily evaluated source of frames.
///
/// Implemented by the host for every clip in its graph. Frames are requested one at a time, in
/// any order.
pub trait FrameSource: Send + Sync {
    /// Returns the video info of the clip.
    fn info(&self) -> VideoInfo;

    /// Produces frame `n`.
    fn get_frame(&self, n: usize) -> Result<FrameRef, GetFrameError>;
}

/// A shared handle to a clip.
#[derive(Clone)]
pub struct Node {
    source: Arc<dyn FrameSource>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Node").field("info", &self.info()).finish()
    }
}

impl Node {
    /// Wraps a frame source in a `Node`.
    #[inline]
    pub fn new<S: FrameSource + 'static>(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Returns the video info associated with this `Node`.
    #[inline]
    pub fn info(&self) -> VideoInfo {
        self.source.info()
    }

    /// Retrieves a frame, checking `n` against the clip length first.
    #[inline]
    pub fn get_frame(&self, n: usize) -> Result<FrameRef, GetFrameError> {
        let num_frames = self.info().num_frames;
        if n >= num_frames {
            return Err(GetFrameError::OutOfRange { n, num_frames });
        }

        self.source.get_frame(n)
    }
}
