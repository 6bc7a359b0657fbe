//! Video frames.

use std::sync::Arc;

use crate::component::Component;
use crate::format::{Format, SampleType};
use crate::video_info::Resolution;

/// Sample storage of one plane.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaneData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
    #[cfg(feature = "f16-pixel-type")]
    F16(Vec<half::f16>),
}

impl PlaneData {
    fn to_f32(&self) -> Vec<f32> {
        match self {
            PlaneData::U8(data) => data.iter().map(|&x| x.to_f32()).collect(),
            PlaneData::U16(data) => data.iter().map(|&x| x.to_f32()).collect(),
            PlaneData::F32(data) => data.clone(),
            #[cfg(feature = "f16-pixel-type")]
            PlaneData::F16(data) => data.iter().map(|&x| x.to_f32()).collect(),
        }
    }

    fn from_f32(data: &[f32], format: Format) -> Self {
        fn convert<T: Component>(data: &[f32], format: Format) -> PlaneData {
            T::into_plane(data.iter().map(|&x| T::from_f32(x, format)).collect())
        }

        match (format.sample_type(), format.bytes_per_sample()) {
            (SampleType::Integer, 1) => convert::<u8>(data, format),
            (SampleType::Integer, _) => convert::<u16>(data, format),
            #[cfg(feature = "f16-pixel-type")]
            (SampleType::Float, 2) => convert::<half::f16>(data, format),
            (SampleType::Float, _) => convert::<f32>(data, format),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Plane {
    resolution: Resolution,
    data: PlaneData,
}

/// A reference-counted frame.
pub type FrameRef = Arc<Frame>;

/// An owned planar video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    format: Format,
    planes: Vec<Plane>,
}

/// Returns the resolution of `plane` for a frame of the given format and luma resolution.
#[inline]
pub fn plane_resolution(format: Format, resolution: Resolution, plane: usize) -> Resolution {
    if plane == 0 {
        resolution
    } else {
        Resolution {
            width: resolution.width >> format.sub_sampling_w(),
            height: resolution.height >> format.sub_sampling_h(),
        }
    }
}

impl Frame {
    /// Creates a frame with every plane filled with a constant.
    ///
    /// `color` holds one value per plane, missing values default to zero.
    pub fn blank(format: Format, resolution: Resolution, color: &[f32]) -> Self {
        Self::from_fn(format, resolution, |plane, _, _| {
            color.get(plane).copied().unwrap_or(0.0)
        })
    }

    /// Creates a frame by evaluating `f(plane, x, y)` for every sample.
    pub fn from_fn<F>(format: Format, resolution: Resolution, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        let planes = (0..format.plane_count())
            .map(|plane| {
                let plane_res = plane_resolution(format, resolution, plane);
                let mut data = Vec::with_capacity(plane_res.width * plane_res.height);
                for y in 0..plane_res.height {
                    for x in 0..plane_res.width {
                        data.push(f(plane, x, y));
                    }
                }
                Plane {
                    resolution: plane_res,
                    data: PlaneData::from_f32(&data, format),
                }
            })
            .collect();

        Self { format, planes }
    }

    /// Builds a frame from working samples, one row-major buffer per plane.
    ///
    /// # Panics
    /// Panics if the buffer count or sizes don't match the format and resolution.
    pub fn from_f32_planes(format: Format, resolution: Resolution, planes: Vec<Vec<f32>>) -> Self {
        assert_eq!(planes.len(), format.plane_count());

        let planes = planes
            .into_iter()
            .enumerate()
            .map(|(plane, data)| {
                let plane_res = plane_resolution(format, resolution, plane);
                assert_eq!(data.len(), plane_res.width * plane_res.height);
                Plane {
                    resolution: plane_res,
                    data: PlaneData::from_f32(&data, format),
                }
            })
            .collect();

        Self { format, planes }
    }

    /// Returns the frame format.
    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the resolution of a plane.
    ///
    /// # Panics
    /// Panics if `plane` is out of bounds.
    #[inline]
    pub fn resolution(&self, plane: usize) -> Resolution {
        self.planes[plane].resolution
    }

    /// Returns the width of a plane, in pixels.
    #[inline]
    pub fn width(&self, plane: usize) -> usize {
        self.resolution(plane).width
    }

    /// Returns the height of a plane, in pixels.
    #[inline]
    pub fn height(&self, plane: usize) -> usize {
        self.resolution(plane).height
    }

    /// Returns a slice of a plane's pixel row.
    ///
    /// # Panics
    /// Panics if the requested plane, row or component type is invalid.
    #[inline]
    pub fn plane_row<T: Component>(&self, plane: usize, row: usize) -> &[T] {
        let width = self.width(plane);
        assert!(row < self.height(plane));
        &self.plane::<T>(plane)[row * width..(row + 1) * width]
    }

    /// Returns a plane's pixel data.
    ///
    /// # Panics
    /// Panics if the requested plane or component type is invalid.
    #[inline]
    pub fn plane<T: Component>(&self, plane: usize) -> &[T] {
        assert!(T::is_valid(self.format));
        T::plane(&self.planes[plane].data).expect("plane storage doesn't match the format")
    }

    /// Returns a copy of a plane converted to working samples.
    #[inline]
    pub fn plane_f32(&self, plane: usize) -> Vec<f32> {
        self.planes[plane].data.to_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PresetFormat;

    #[test]
    fn subsampled_planes() {
        let frame = Frame::blank(
            PresetFormat::YUV420P8.into(),
            Resolution {
                width: 16,
                height: 8,
            },
            &[16.0, 128.0, 128.0],
        );

        assert_eq!(frame.width(0), 16);
        assert_eq!(frame.height(0), 8);
        assert_eq!(frame.width(1), 8);
        assert_eq!(frame.height(2), 4);
        assert_eq!(frame.plane_row::<u8>(0, 3), &[16; 16][..]);
        assert_eq!(frame.plane_row::<u8>(2, 3), &[128; 8][..]);
    }

    #[test]
    fn from_fn_layout() {
        let frame = Frame::from_fn(
            PresetFormat::Gray16.into(),
            Resolution {
                width: 3,
                height: 2,
            },
            |_, x, y| (y * 10 + x) as f32,
        );
        assert_eq!(frame.plane::<u16>(0), &[0, 1, 2, 10, 11, 12][..]);
        assert_eq!(frame.plane_f32(0)[4], 11.0);
    }

    /// Whether plane 0 can be read as `T`.
    fn readable<T: Component>(frame: &Frame) -> bool {
        T::is_valid(frame.format()) && T::plane(&frame.planes[0].data).is_some()
    }

    #[test]
    fn every_preset_has_typed_storage() {
        #[allow(unused_mut)]
        let mut presets = vec![
            PresetFormat::Gray8,
            PresetFormat::Gray16,
            PresetFormat::GrayS,
            PresetFormat::YUV420P8,
            PresetFormat::YUV422P8,
            PresetFormat::YUV444P8,
            PresetFormat::YUV420P10,
            PresetFormat::YUV420P16,
            PresetFormat::YUV444P16,
            PresetFormat::YUV444PS,
            PresetFormat::RGB24,
            PresetFormat::RGB48,
            PresetFormat::RGBS,
        ];
        #[cfg(feature = "f16-pixel-type")]
        presets.extend([PresetFormat::GrayH, PresetFormat::RGBH]);

        for preset in presets {
            let frame = Frame::blank(
                preset.into(),
                Resolution {
                    width: 4,
                    height: 2,
                },
                &[1.0, 1.0, 1.0],
            );

            #[allow(unused_mut)]
            let mut readers = vec![
                readable::<u8>(&frame),
                readable::<u16>(&frame),
                readable::<f32>(&frame),
            ];
            #[cfg(feature = "f16-pixel-type")]
            readers.push(readable::<half::f16>(&frame));

            assert_eq!(
                readers.iter().filter(|&&x| x).count(),
                1,
                "{:?} is readable as {:?}",
                preset,
                readers
            );
            assert_eq!(frame.plane_f32(0), [1.0; 8]);
        }
    }

    #[test]
    #[should_panic]
    fn invalid_component_type() {
        let frame = Frame::blank(
            PresetFormat::Gray16.into(),
            Resolution {
                width: 2,
                height: 2,
            },
            &[1.0],
        );
        let _ = frame.plane_row::<u8>(0, 0); // Should be u16.
    }
}
