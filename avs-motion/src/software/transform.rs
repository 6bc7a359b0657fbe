//! Lazily evaluated border, resize and crop clips.

use std::sync::Arc;

use crate::format::{Format, SampleType};
use crate::frame::{plane_resolution, Frame, FrameRef};
use crate::node::{FrameSource, GetFrameError, Node};
use crate::software::spline36::{self, Axis};
use crate::video_info::{Resolution, VideoInfo};

/// Converts a packed 8-bit-per-component color into per-plane samples.
///
/// Three-plane formats take the components in plane order from the bytes `0xAABBCC`; gray takes
/// the lowest byte. Values are scaled to the format's bit depth.
pub fn plane_color(format: Format, color: i64) -> Vec<f32> {
    let component = |shift: u32| ((color >> shift) & 0xFF) as f32;
    let components = match format.plane_count() {
        1 => vec![component(0)],
        _ => vec![component(16), component(8), component(0)],
    };

    components
        .into_iter()
        .map(|value| match format.sample_type() {
            SampleType::Integer => value * (1u32 << (format.bits_per_sample() - 8)) as f32,
            SampleType::Float => value / 255.0,
        })
        .collect()
}

/// Rectangle edges, in luma pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edges {
    left: usize,
    top: usize,
}

impl Edges {
    #[inline]
    fn for_plane(self, format: Format, plane: usize) -> Self {
        if plane == 0 {
            self
        } else {
            Self {
                left: self.left >> format.sub_sampling_w(),
                top: self.top >> format.sub_sampling_h(),
            }
        }
    }
}

/// Pads every frame of the parent clip.
pub struct AddBorders {
    parent: Node,
    info: VideoInfo,
    origin: Edges,
    color: Vec<f32>,
}

impl AddBorders {
    pub(crate) fn new(
        parent: Node,
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
        color: i64,
    ) -> Self {
        let info = parent.info();
        let resolution = Resolution {
            width: info.resolution.width + left + right,
            height: info.resolution.height + top + bottom,
        };

        Self {
            parent,
            info: info.with_resolution(resolution),
            origin: Edges { left, top },
            color: plane_color(info.format, color),
        }
    }
}

impl FrameSource for AddBorders {
    #[inline]
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn get_frame(&self, n: usize) -> Result<FrameRef, GetFrameError> {
        let src = self.parent.get_frame(n)?;
        let format = self.info.format;

        let planes = (0..format.plane_count())
            .map(|plane| {
                let dst_res = plane_resolution(format, self.info.resolution, plane);
                let origin = self.origin.for_plane(format, plane);
                let src_width = src.width(plane);
                let src_data = src.plane_f32(plane);

                let mut data = vec![self.color[plane]; dst_res.width * dst_res.height];
                for (y, row) in src_data.chunks_exact(src_width).enumerate() {
                    let start = (origin.top + y) * dst_res.width + origin.left;
                    data[start..start + src_width].copy_from_slice(row);
                }
                data
            })
            .collect();

        Ok(Arc::new(Frame::from_f32_planes(
            format,
            self.info.resolution,
            planes,
        )))
    }
}

/// Resamples every frame of the parent clip with Spline36.
pub struct Resize {
    parent: Node,
    info: VideoInfo,
    axes: Vec<(Axis, Axis)>,
}

impl Resize {
    pub(crate) fn new(
        parent: Node,
        resolution: Resolution,
        src_left: f64,
        src_top: f64,
        src_width: f64,
        src_height: f64,
    ) -> Self {
        let info = parent.info();
        let format = info.format;

        let axes = (0..format.plane_count())
            .map(|plane| {
                let src_res = plane_resolution(format, info.resolution, plane);
                let dst_res = plane_resolution(format, resolution, plane);
                let (scale_w, scale_h) = if plane == 0 {
                    (1.0, 1.0)
                } else {
                    (
                        f64::from(1u32 << format.sub_sampling_w()),
                        f64::from(1u32 << format.sub_sampling_h()),
                    )
                };

                (
                    Axis::new(
                        src_res.width,
                        dst_res.width,
                        src_left / scale_w,
                        src_width / scale_w,
                    ),
                    Axis::new(
                        src_res.height,
                        dst_res.height,
                        src_top / scale_h,
                        src_height / scale_h,
                    ),
                )
            })
            .collect();

        Self {
            parent,
            info: info.with_resolution(resolution),
            axes,
        }
    }
}

impl FrameSource for Resize {
    #[inline]
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn get_frame(&self, n: usize) -> Result<FrameRef, GetFrameError> {
        let src = self.parent.get_frame(n)?;

        let planes = self
            .axes
            .iter()
            .enumerate()
            .map(|(plane, (horizontal, vertical))| {
                spline36::resample(
                    &src.plane_f32(plane),
                    src.width(plane),
                    src.height(plane),
                    horizontal,
                    vertical,
                )
            })
            .collect();

        Ok(Arc::new(Frame::from_f32_planes(
            self.info.format,
            self.info.resolution,
            planes,
        )))
    }
}

/// Cuts a rectangle out of every frame of the parent clip.
pub struct Crop {
    parent: Node,
    info: VideoInfo,
    origin: Edges,
}

impl Crop {
    pub(crate) fn new(parent: Node, left: usize, top: usize, resolution: Resolution) -> Self {
        let info = parent.info();
        Self {
            parent,
            info: info.with_resolution(resolution),
            origin: Edges { left, top },
        }
    }
}

impl FrameSource for Crop {
    #[inline]
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn get_frame(&self, n: usize) -> Result<FrameRef, GetFrameError> {
        let src = self.parent.get_frame(n)?;
        let format = self.info.format;

        let planes = (0..format.plane_count())
            .map(|plane| {
                let dst_res = plane_resolution(format, self.info.resolution, plane);
                let origin = self.origin.for_plane(format, plane);
                let src_width = src.width(plane);
                let src_data = src.plane_f32(plane);

                let mut data = Vec::with_capacity(dst_res.width * dst_res.height);
                for y in origin.top..origin.top + dst_res.height {
                    let start = y * src_width + origin.left;
                    data.extend_from_slice(&src_data[start..start + dst_res.width]);
                }
                data
            })
            .collect();

        Ok(Arc::new(Frame::from_f32_planes(
            format,
            self.info.resolution,
            planes,
        )))
    }
}
