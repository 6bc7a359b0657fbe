//! After Effects keyframe data parsing.
//!
//! Motion trackers export tracked points as "Adobe After Effects 6.0 Keyframe Data", a
//! tab-separated text format made of named blocks:
//!
//! ```text
//! Adobe After Effects 6.0 Keyframe Data
//!
//! Position
//! 	Units Per Second	24
//! 	Frame	X pixels	Y pixels	Z pixels
//! 	0	960	540	0
//! 	1	962.25	539.5	0
//!
//! End of Keyframe Data
//! ```
//!
//! Only the first `Position` block is read. Rows are indexed by their order in the block, the
//! frame label in the first column is ignored.

use std::fs;
use std::ops::{Index, Sub};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// The literal every keyframe file has to start with.
pub const SIGNATURE: &str = "Adobe After Effects 6.0 Keyframe Data";

/// Name of the block holding the tracked positions.
const POSITION_BLOCK: &str = "Position";

/// Lines between the block name and the first data row.
const HEADER_LINES: usize = 2;

/// A tracked anchor position at one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackPoint {
    pub x: f32,
    pub y: f32,
    /// Parsed and carried along, but not used for compensation.
    pub z: f32,
}

impl TrackPoint {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Sub for TrackPoint {
    type Output = TrackPoint;

    #[inline]
    fn sub(self, rhs: TrackPoint) -> Self::Output {
        TrackPoint::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Tracked positions indexed by frame number, starting at 0.
///
/// The first point is the reference position all offsets are computed against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionTrack {
    points: Vec<TrackPoint>,
}

impl MotionTrack {
    /// Parses keyframe data held in memory.
    pub fn parse(contents: &str) -> Result<Self> {
        if !contents.starts_with(SIGNATURE) {
            return Err(Error::InvalidSignature);
        }

        let mut lines = contents
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .enumerate();

        let mut points = Vec::new();
        if lines.any(|(_, line)| line.starts_with(POSITION_BLOCK)) {
            for (index, line) in lines
                .skip(HEADER_LINES)
                .take_while(|(_, line)| line.starts_with('\t'))
            {
                points.push(parse_row(line, index + 1)?);
            }
        } else {
            warn!("no {} block in the keyframe data", POSITION_BLOCK);
        }

        debug!(frames = points.len(), "parsed motion track");
        Ok(Self { points })
    }

    /// Reads and parses a keyframe file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::EmptyOrUnreadableFile {
            path: path.to_owned(),
            source: Some(source),
        })?;

        if contents.is_empty() {
            return Err(Error::EmptyOrUnreadableFile {
                path: path.to_owned(),
                source: None,
            });
        }

        Self::parse(&contents)
    }

    /// Returns the number of tracked frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the point tracked at `frame`, if any.
    #[inline]
    pub fn get(&self, frame: usize) -> Option<TrackPoint> {
        self.points.get(frame).copied()
    }

    #[inline]
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }
}

impl From<Vec<TrackPoint>> for MotionTrack {
    #[inline]
    fn from(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }
}

impl Index<usize> for MotionTrack {
    type Output = TrackPoint;

    #[inline]
    fn index(&self, frame: usize) -> &Self::Output {
        &self.points[frame]
    }
}

/// Parses one tab-indented data row: `label x y z [...]`.
fn parse_row(line: &str, line_number: usize) -> Result<TrackPoint> {
    let malformed = |reason: String| Error::MalformedKeyframeRow {
        line: line_number,
        reason,
    };

    let fields = line
        .trim_matches(|c| c == '\t' || c == ' ')
        .split('\t')
        .collect::<Vec<_>>();
    if fields.len() < 4 {
        return Err(malformed(format!(
            "expected at least 4 fields, got {}",
            fields.len()
        )));
    }

    let value = |index: usize| {
        fields[index]
            .trim()
            .parse::<f32>()
            .map_err(|err| malformed(format!("field {} ({:?}): {}", index, fields[index], err)))
    };

    Ok(TrackPoint::new(value(1)?, value(2)?, value(3)?))
}
