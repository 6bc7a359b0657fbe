//! The pixel component trait.

use cfg_if::cfg_if;

use crate::format::{Format, SampleType};
use crate::frame::PlaneData;

/// A trait for possible pixel components.
///
/// Each component type has its own `PlaneData` variant, so typed access never reinterprets
/// memory.
pub trait Component: Copy + Default + Send + Sync + 'static {
    /// Returns whether this component is valid for this format.
    fn is_valid(format: Format) -> bool;

    /// Converts the component to a working sample.
    fn to_f32(self) -> f32;

    /// Converts a working sample back, rounding and clamping as needed.
    fn from_f32(value: f32, format: Format) -> Self;

    /// Wraps a plane buffer of this component.
    fn into_plane(data: Vec<Self>) -> PlaneData;

    /// Returns the plane buffer if it holds this component.
    fn plane(data: &PlaneData) -> Option<&[Self]>;
}

#[inline]
fn clamp_integer(value: f32, format: Format) -> f32 {
    value.round().clamp(0.0, format.peak_value())
}

impl Component for u8 {
    #[inline]
    fn is_valid(format: Format) -> bool {
        format.sample_type() == SampleType::Integer && format.bytes_per_sample() == 1
    }

    #[inline]
    fn to_f32(self) -> f32 {
        f32::from(self)
    }

    #[inline]
    fn from_f32(value: f32, format: Format) -> Self {
        clamp_integer(value, format) as u8
    }

    #[inline]
    fn into_plane(data: Vec<Self>) -> PlaneData {
        PlaneData::U8(data)
    }

    #[inline]
    fn plane(data: &PlaneData) -> Option<&[Self]> {
        match data {
            PlaneData::U8(data) => Some(data),
            _ => None,
        }
    }
}

impl Component for u16 {
    #[inline]
    fn is_valid(format: Format) -> bool {
        format.sample_type() == SampleType::Integer && format.bytes_per_sample() == 2
    }

    #[inline]
    fn to_f32(self) -> f32 {
        f32::from(self)
    }

    #[inline]
    fn from_f32(value: f32, format: Format) -> Self {
        clamp_integer(value, format) as u16
    }

    #[inline]
    fn into_plane(data: Vec<Self>) -> PlaneData {
        PlaneData::U16(data)
    }

    #[inline]
    fn plane(data: &PlaneData) -> Option<&[Self]> {
        match data {
            PlaneData::U16(data) => Some(data),
            _ => None,
        }
    }
}

impl Component for f32 {
    #[inline]
    fn is_valid(format: Format) -> bool {
        format.sample_type() == SampleType::Float && format.bytes_per_sample() == 4
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32, _format: Format) -> Self {
        value
    }

    #[inline]
    fn into_plane(data: Vec<Self>) -> PlaneData {
        PlaneData::F32(data)
    }

    #[inline]
    fn plane(data: &PlaneData) -> Option<&[Self]> {
        match data {
            PlaneData::F32(data) => Some(data),
            _ => None,
        }
    }
}

cfg_if! {
    if #[cfg(feature = "f16-pixel-type")] {
        use half::f16;

        impl Component for f16 {
            #[inline]
            fn is_valid(format: Format) -> bool {
                format.sample_type() == SampleType::Float && format.bytes_per_sample() == 2
            }

            #[inline]
            fn to_f32(self) -> f32 {
                f16::to_f32(self)
            }

            #[inline]
            fn from_f32(value: f32, _format: Format) -> Self {
                f16::from_f32(value)
            }

            #[inline]
            fn into_plane(data: Vec<Self>) -> PlaneData {
                PlaneData::F16(data)
            }

            #[inline]
            fn plane(data: &PlaneData) -> Option<&[Self]> {
                match data {
                    PlaneData::F16(data) => Some(data),
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PresetFormat;

    #[test]
    fn validity() {
        assert!(u8::is_valid(PresetFormat::RGB24.into()));
        assert!(!u8::is_valid(PresetFormat::YUV420P10.into()));
        assert!(u16::is_valid(PresetFormat::YUV420P10.into()));
        assert!(f32::is_valid(PresetFormat::GrayS.into()));
    }

    #[cfg(feature = "f16-pixel-type")]
    #[test]
    fn half_precision_validity() {
        assert!(f16::is_valid(PresetFormat::GrayH.into()));
        assert!(!f32::is_valid(PresetFormat::GrayH.into()));
        assert!(!f16::is_valid(PresetFormat::GrayS.into()));
    }

    #[test]
    fn integer_conversion_clamps() {
        let gray8 = PresetFormat::Gray8.into();
        assert_eq!(u8::from_f32(-3.0, gray8), 0);
        assert_eq!(u8::from_f32(127.6, gray8), 128);
        assert_eq!(u8::from_f32(300.0, gray8), 255);

        let yuv10 = PresetFormat::YUV420P10.into();
        assert_eq!(u16::from_f32(5000.0, yuv10), 1023);
    }
}
