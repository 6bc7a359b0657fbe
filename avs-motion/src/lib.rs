//! Motion-track stabilization for video clips, written in Rust.
//!
//! The crate implements `AvsMotion`, a filter that moves every frame of a clip by the displacement
//! of a tracked point. The point comes from an "Adobe After Effects 6.0 Keyframe Data" file, as
//! exported by most motion trackers. Typically the clip is a mask or overlay that should follow
//! tracked footage.
//!
//! ## Functionality
//!
//! The filter is host-agnostic. A host exposes its resizing and padding functions through the
//! `core::Core` trait and its clips as `node::Node`s. Filters are bound to functions through
//! `plugins::FilterFunction`, which is much more easily done via the `make_filter_function!`
//! macro, and collected in a `plugin::Plugin`.
//!
//! The `software` module contains `SoftwareCore`, an in-process host rendering frames on the CPU.
//!
//! ## Short example
//!
//! ```no_run
//! # use anyhow::Error;
//! # fn foo() -> Result<(), Error> {
//! use std::sync::Arc;
//!
//! use avs_motion::prelude::*;
//! use avs_motion::software::{BlankClip, SoftwareCore};
//! use avs_motion::video_info::Resolution;
//!
//! let core: Arc<dyn Core> = Arc::new(SoftwareCore);
//! let clip = Node::new(BlankClip::new(
//!     PresetFormat::Gray8.into(),
//!     Resolution { width: 640, height: 360 },
//!     100,
//!     &[255.0],
//! ));
//!
//! let mut plugin = Plugin::new(avs_motion::filter::METADATA);
//! avs_motion::filter::plugin_init(&mut plugin)?;
//!
//! let mut args = Map::new();
//! args.set_node("clip", &clip);
//! args.set_data("file", b"track.txt");
//! args.set_int("offset", 10);
//!
//! let node = plugin.invoke(&core, "AvsMotion", &args)?;
//! let frame = node.get_frame(42)?;
//!
//! println!("Resolution: {}×{}", frame.width(0), frame.height(0));
//! # Ok(())
//! # }
//! # fn main() {
//! # }
//! ```

// Used by `make_filter_function!`.
#[doc(hidden)]
pub use anyhow;

#[macro_use]
pub mod plugins;

pub mod component;
pub mod core;
pub mod error;
pub mod filter;
pub mod format;
pub mod frame;
pub mod keyframe;
pub mod map;
pub mod node;
pub mod offset;
pub mod plugin;
pub mod software;
pub mod video_info;

pub use crate::error::{Error, Result};

pub mod prelude {
    //! The prelude.
    //!
    //! Contains the types you most likely want to import anyway.
    pub use super::component::Component;
    pub use super::core::Core;
    pub use super::filter::{AvsMotion, Params};
    pub use super::format::{ColorFamily, PresetFormat, SampleType};
    pub use super::frame::{Frame, FrameRef};
    pub use super::keyframe::{MotionTrack, TrackPoint};
    pub use super::map::Map;
    pub use super::node::{GetFrameError, Node};
    pub use super::plugin::Plugin;
}

mod tests;
