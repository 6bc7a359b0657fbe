//! Per-frame compensation offsets.

use crate::keyframe::MotionTrack;

/// Source window shift of one output frame, in pixels.
///
/// Used as the resizer's source origin, it moves the frame content along with the tracked point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
    /// Reserved. Depth is not compensated.
    pub dz: f32,
}

/// Returns the offset for output frame `requested_frame`, shifted by `frame_offset`.
///
/// The offset is the reference point (track frame 0) minus the tracked point, so a positive
/// displacement yields a negative offset. Returns `None` if the shifted frame lies outside the
/// track.
pub fn resolve(track: &MotionTrack, requested_frame: i64, frame_offset: i64) -> Option<Offset> {
    let frame = requested_frame.checked_sub(frame_offset)?;
    let frame = usize::try_from(frame).ok()?;

    let current = track.get(frame)?;
    let delta = track[0] - current;

    Some(Offset {
        dx: delta.x,
        dy: delta.y,
        dz: delta.z,
    })
}
