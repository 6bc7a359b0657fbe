//! The `AvsMotion` filter.
//!
//! Translates every frame of a clip by the displacement of a tracked point relative to the first
//! tracked frame. The translation is done by the host's sub-pixel resizer on a padded copy of the
//! clip, which is then cropped back to the original size.

use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, trace};

use crate::core::{self, Core, ResizeArgs};
use crate::error::{Error, Result};
use crate::frame::FrameRef;
use crate::keyframe::MotionTrack;
use crate::node::Node;
use crate::offset::{self, Offset};
use crate::plugin::{self, Plugin};
use crate::plugins::{Filter, Metadata};
use crate::video_info::{Resolution, VideoInfo};

/// Border width added on each side of the clip before resizing.
pub const PAD_WIDTH: usize = 4;

/// Metadata of the plugin exporting the filter.
pub const METADATA: Metadata = Metadata {
    identifier: "com.avsmotion",
    namespace: "avsmotion",
    name: "AvsMotion",
};

/// Host functions the filter can't work without.
const REQUIRED_FUNCTIONS: [&str; 3] = [core::RESIZE, core::ADD_BORDERS, core::CROP];

/// Construction parameters of the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    /// Path to the keyframe data file.
    pub file: Option<PathBuf>,
    /// Shift applied to the output frame number before the track lookup.
    pub frame_offset: i64,
    /// Whether the clip already carries borders. If `false`, borders are added and cropped away.
    pub mirror: bool,
    /// Color of the synthesized borders.
    pub pad_color: i64,
}

/// Resolved filter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    pub frame_offset: i64,
    pub mirror: bool,
    pub pad_color: i64,
    /// Resolution of the clip the resizer works on.
    pub padded: Resolution,
}

impl FilterConfig {
    /// Returns whether the filter adds and crops its own borders.
    #[inline]
    pub fn add_borders(&self) -> bool {
        !self.mirror
    }
}

/// The motion compensation filter.
pub struct AvsMotion {
    source: Node,
    padded: Node,
    track: MotionTrack,
    config: FilterConfig,
}

impl AvsMotion {
    /// Creates the filter, reading the motion track from `params.file`.
    pub fn new(core: &dyn Core, source: Node, params: Params) -> Result<Self> {
        check_required_functions(core)?;

        let file = params.file.ok_or(Error::MissingFilePath)?;
        let track = MotionTrack::from_file(&file)?;
        debug!(file = %file.display(), frames = track.len(), "loaded motion track");

        Self::build(
            core,
            source,
            track,
            params.frame_offset,
            params.mirror,
            params.pad_color,
        )
    }

    /// Creates the filter from an already parsed motion track.
    pub fn with_track(
        core: &dyn Core,
        source: Node,
        track: MotionTrack,
        frame_offset: i64,
        mirror: bool,
        pad_color: i64,
    ) -> Result<Self> {
        check_required_functions(core)?;
        Self::build(core, source, track, frame_offset, mirror, pad_color)
    }

    fn build(
        core: &dyn Core,
        source: Node,
        track: MotionTrack,
        frame_offset: i64,
        mirror: bool,
        pad_color: i64,
    ) -> Result<Self> {
        let padded = if mirror {
            source.clone()
        } else {
            core.add_borders(
                &source, PAD_WIDTH, PAD_WIDTH, PAD_WIDTH, PAD_WIDTH, pad_color,
            )
            .map_err(|err| Error::Host {
                function: core::ADD_BORDERS,
                message: format!("{:#}", err),
            })?
        };

        let config = FilterConfig {
            frame_offset,
            mirror,
            pad_color,
            padded: padded.info().resolution,
        };
        debug!(
            width = config.padded.width,
            height = config.padded.height,
            frame_offset,
            mirror,
            "created motion filter"
        );

        Ok(Self {
            source,
            padded,
            track,
            config,
        })
    }

    #[inline]
    pub fn track(&self) -> &MotionTrack {
        &self.track
    }

    #[inline]
    pub fn config(&self) -> FilterConfig {
        self.config
    }

    /// Returns the offset applied to output frame `n`, or `None` if the neutral frame is used.
    #[inline]
    pub fn offset(&self, n: usize) -> Option<Offset> {
        let n = i64::try_from(n).ok()?;
        offset::resolve(&self.track, n, self.config.frame_offset)
    }

    /// Builds the clip producing the compensated frames for `offset`.
    fn compensated(&self, core: &dyn Core, offset: Offset) -> anyhow::Result<Node> {
        let padded = self.config.padded;
        let mut clip = core
            .resize(
                &self.padded,
                ResizeArgs {
                    width: padded.width,
                    height: padded.height,
                    src_left: f64::from(offset.dx),
                    src_top: f64::from(offset.dy),
                    src_width: padded.width as f64,
                    src_height: padded.height as f64,
                },
            )
            .with_context(|| format!("{}() failed", core::RESIZE))?;

        if self.config.add_borders() {
            let margin = -(PAD_WIDTH as i64);
            clip = core
                .crop(&clip, PAD_WIDTH, PAD_WIDTH, margin, margin)
                .with_context(|| format!("{}() failed", core::CROP))?;
        }

        Ok(clip)
    }
}

fn check_required_functions(core: &dyn Core) -> Result<()> {
    if REQUIRED_FUNCTIONS.iter().all(|name| core.has_function(name)) {
        Ok(())
    } else {
        Err(Error::MissingRequiredHostFunction(REQUIRED_FUNCTIONS.to_vec()))
    }
}

impl Filter for AvsMotion {
    #[inline]
    fn video_info(&self) -> VideoInfo {
        self.source.info()
    }

    fn get_frame(&self, core: &dyn Core, n: usize) -> anyhow::Result<FrameRef> {
        let offset = match self.offset(n) {
            Some(offset) => offset,
            None => {
                trace!(n, "no track data, using the neutral frame");
                return Ok(self.source.get_frame(0)?);
            }
        };

        trace!(n, dx = offset.dx, dy = offset.dy, "compensating frame");
        let clip = self.compensated(core, offset)?;
        Ok(clip.get_frame(n)?)
    }
}

crate::make_filter_function! {
    AvsMotionFunction, "AvsMotion"

    fn create_avs_motion(
        core: &dyn Core,
        clip: Node,
        file: Option<String>,
        offset: Option<i64>,
        mirror: Option<bool>,
        pad_color: Option<i64>,
    ) -> anyhow::Result<Option<Box<dyn Filter>>> {
        let params = Params {
            file: file.map(PathBuf::from),
            frame_offset: offset.unwrap_or(0),
            mirror: mirror.unwrap_or(false),
            pad_color: pad_color.unwrap_or(0),
        };

        Ok(Some(Box::new(AvsMotion::new(core, clip, params)?)))
    }
}

/// Registers the filter functions of this crate.
///
/// Called once by the host on a fresh plugin created with `METADATA`.
pub fn plugin_init(plugin: &mut Plugin) -> std::result::Result<(), plugin::Error> {
    plugin.register_function(AvsMotionFunction::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PresetFormat;
    use crate::keyframe::TrackPoint;
    use crate::software::{BlankClip, SoftwareCore};

    fn clip() -> Node {
        Node::new(BlankClip::new(
            PresetFormat::Gray8.into(),
            Resolution {
                width: 16,
                height: 8,
            },
            10,
            &[50.0],
        ))
    }

    fn track() -> MotionTrack {
        vec![
            TrackPoint::new(10.0, 20.0, 0.0),
            TrackPoint::new(15.0, 25.0, 0.0),
        ]
        .into()
    }

    #[test]
    fn argument_string() {
        let mut plugin = Plugin::new(METADATA);
        plugin_init(&mut plugin).unwrap();

        let function = plugin.get_plugin_function_by_name("AvsMotion").unwrap();
        assert_eq!(function.name(), "AvsMotion");
        assert_eq!(function.arguments(), "c[file]s[offset]i[mirror]b[pad_color]i");

        assert_eq!(
            plugin_init(&mut plugin),
            Err(plugin::Error::DuplicateFunction("AvsMotion".to_owned()))
        );
    }

    #[test]
    fn padded_resolution() {
        let filter = AvsMotion::with_track(&SoftwareCore, clip(), track(), 0, false, 0).unwrap();
        assert_eq!(
            filter.config().padded,
            Resolution {
                width: 24,
                height: 16
            }
        );
        assert_eq!(filter.video_info(), clip().info());

        let filter = AvsMotion::with_track(&SoftwareCore, clip(), track(), 0, true, 0).unwrap();
        assert_eq!(filter.config().padded, clip().info().resolution);
    }

    #[test]
    fn offsets() {
        let filter = AvsMotion::with_track(&SoftwareCore, clip(), track(), 3, false, 0).unwrap();
        assert_eq!(filter.offset(2), None);
        assert_eq!(filter.offset(3), Some(Offset::default()));
        assert_eq!(
            filter.offset(4),
            Some(Offset {
                dx: -5.0,
                dy: -5.0,
                dz: 0.0
            })
        );
        assert_eq!(filter.offset(5), None);
    }

    #[test]
    fn missing_file_path() {
        let err = AvsMotion::new(&SoftwareCore, clip(), Params::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::MissingFilePath));
    }
}
