//! A minimal in-process host.
//!
//! `SoftwareCore` implements the host functions the filter needs on top of plain in-memory
//! frames, so filters can be driven without an external video runtime.

use anyhow::{bail, Error};

use crate::core::{self, Core, ResizeArgs};
use crate::format::Format;
use crate::node::Node;
use crate::video_info::Resolution;

mod source;
mod spline36;
mod transform;

pub use self::source::{BlankClip, FrameList, DEFAULT_FRAMERATE};
pub use self::transform::plane_color;

/// Host functions provided by `SoftwareCore`.
pub const FUNCTIONS: [&str; 3] = [core::ADD_BORDERS, core::RESIZE, core::CROP];

/// A host core rendering everything on the CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareCore;

/// Checks that luma offsets map onto whole chroma samples.
fn check_subsampling(
    format: Format,
    function: &str,
    horizontal: &[usize],
    vertical: &[usize],
) -> Result<(), Error> {
    let mod_w = 1usize << format.sub_sampling_w();
    let mod_h = 1usize << format.sub_sampling_h();

    if horizontal.iter().any(|x| x % mod_w != 0) || vertical.iter().any(|x| x % mod_h != 0) {
        bail!(
            "{}: offsets must be multiples of {}x{} for {}",
            function,
            mod_w,
            mod_h,
            format
        );
    }
    Ok(())
}

impl Core for SoftwareCore {
    #[inline]
    fn has_function(&self, name: &str) -> bool {
        FUNCTIONS.iter().any(|&function| function == name)
    }

    fn add_borders(
        &self,
        clip: &Node,
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
        color: i64,
    ) -> Result<Node, Error> {
        check_subsampling(
            clip.info().format,
            core::ADD_BORDERS,
            &[left, right],
            &[top, bottom],
        )?;

        Ok(Node::new(transform::AddBorders::new(
            clip.clone(),
            left,
            top,
            right,
            bottom,
            color,
        )))
    }

    fn resize(&self, clip: &Node, args: ResizeArgs) -> Result<Node, Error> {
        let format = clip.info().format;
        if args.width == 0 || args.height == 0 {
            bail!("{}: the target resolution can't be empty", core::RESIZE);
        }
        check_subsampling(format, core::RESIZE, &[args.width], &[args.height])?;
        if !(args.src_width > 0.0 && args.src_height > 0.0) {
            bail!("{}: the source window can't be empty", core::RESIZE);
        }

        Ok(Node::new(transform::Resize::new(
            clip.clone(),
            Resolution {
                width: args.width,
                height: args.height,
            },
            args.src_left,
            args.src_top,
            args.src_width,
            args.src_height,
        )))
    }

    fn crop(
        &self,
        clip: &Node,
        left: usize,
        top: usize,
        width: i64,
        height: i64,
    ) -> Result<Node, Error> {
        let info = clip.info();

        // Zero or negative sizes are margins from the far edge.
        let extent = |size: i64, origin: usize, full: usize| -> Option<usize> {
            let remaining = full.checked_sub(origin)?;
            if size > 0 {
                let size = usize::try_from(size).ok()?;
                (size <= remaining).then_some(size)
            } else {
                remaining.checked_sub(usize::try_from(size.checked_neg()?).ok()?)
            }
        };

        let (width, height) = match (
            extent(width, left, info.resolution.width),
            extent(height, top, info.resolution.height),
        ) {
            (Some(width), Some(height)) if width > 0 && height > 0 => (width, height),
            _ => bail!(
                "{}: the rectangle ({}, {}, {}, {}) lies outside the {}x{} clip",
                core::CROP,
                left,
                top,
                width,
                height,
                info.resolution.width,
                info.resolution.height
            ),
        };
        check_subsampling(info.format, core::CROP, &[left, width], &[top, height])?;

        Ok(Node::new(transform::Crop::new(
            clip.clone(),
            left,
            top,
            Resolution { width, height },
        )))
    }
}
