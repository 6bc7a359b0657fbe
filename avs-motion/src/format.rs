//! Frame formats.

use std::fmt::{self, Display};

/// Contains information about a video format.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Format {
    color_family: ColorFamily,
    sample_type: SampleType,
    bits_per_sample: u8,
    sub_sampling_w: u8,
    sub_sampling_h: u8,
}

/// Preset formats.
///
/// The presets suffixed with H and S have floating point sample type. The H and S suffixes stand
/// for half precision and single precision, respectively. Half precision presets need the
/// `f16-pixel-type` feature.
///
/// Discriminants encode the format as
/// `(colorFamily << 28) | (sampleType << 24) | (bitsPerSample << 16) | (subSamplingW << 8) | (subSamplingH << 0)`
#[repr(i32)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PresetFormat {
    Gray8 = make_video_id(ColorFamily::Gray, SampleType::Integer, 8, 0, 0),
    Gray16 = make_video_id(ColorFamily::Gray, SampleType::Integer, 16, 0, 0),
    #[cfg(feature = "f16-pixel-type")]
    GrayH = make_video_id(ColorFamily::Gray, SampleType::Float, 16, 0, 0),
    GrayS = make_video_id(ColorFamily::Gray, SampleType::Float, 32, 0, 0),

    YUV420P8 = make_video_id(ColorFamily::YUV, SampleType::Integer, 8, 1, 1),
    YUV422P8 = make_video_id(ColorFamily::YUV, SampleType::Integer, 8, 1, 0),
    YUV444P8 = make_video_id(ColorFamily::YUV, SampleType::Integer, 8, 0, 0),

    YUV420P10 = make_video_id(ColorFamily::YUV, SampleType::Integer, 10, 1, 1),
    YUV420P16 = make_video_id(ColorFamily::YUV, SampleType::Integer, 16, 1, 1),
    YUV444P16 = make_video_id(ColorFamily::YUV, SampleType::Integer, 16, 0, 0),
    YUV444PS = make_video_id(ColorFamily::YUV, SampleType::Float, 32, 0, 0),

    RGB24 = make_video_id(ColorFamily::RGB, SampleType::Integer, 8, 0, 0),
    RGB48 = make_video_id(ColorFamily::RGB, SampleType::Integer, 16, 0, 0),
    #[cfg(feature = "f16-pixel-type")]
    RGBH = make_video_id(ColorFamily::RGB, SampleType::Float, 16, 0, 0),
    RGBS = make_video_id(ColorFamily::RGB, SampleType::Float, 32, 0, 0),
}

/// Format color families.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ColorFamily {
    Gray = 1,
    RGB = 2,
    YUV = 3,
}

/// Format sample types.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SampleType {
    Integer = 0,
    Float = 1,
}

/// Packs format components into a preset discriminant.
const fn make_video_id(
    color_family: ColorFamily,
    sample_type: SampleType,
    bits_per_sample: i32,
    sub_sampling_w: i32,
    sub_sampling_h: i32,
) -> i32 {
    ((color_family as i32) << 28)
        | ((sample_type as i32) << 24)
        | (bits_per_sample << 16)
        | (sub_sampling_w << 8)
        | sub_sampling_h
}

impl Format {
    /// Gets the printable name of this format.
    pub fn name(self) -> String {
        let ss = (self.sub_sampling_w, self.sub_sampling_h);
        let float_suffix = match self.bits_per_sample {
            16 => "H",
            _ => "S",
        };

        match (self.color_family, self.sample_type) {
            (ColorFamily::Gray, SampleType::Integer) => format!("Gray{}", self.bits_per_sample),
            (ColorFamily::Gray, SampleType::Float) => format!("Gray{}", float_suffix),
            (ColorFamily::RGB, SampleType::Integer) => {
                format!("RGB{}", u32::from(self.bits_per_sample) * 3)
            }
            (ColorFamily::RGB, SampleType::Float) => format!("RGB{}", float_suffix),
            (ColorFamily::YUV, sample_type) => {
                let subsampling = match ss {
                    (1, 1) => "420".to_owned(),
                    (1, 0) => "422".to_owned(),
                    (0, 0) => "444".to_owned(),
                    (w, h) => format!("ssw{}ssh{}", w, h),
                };
                match sample_type {
                    SampleType::Integer => format!("YUV{}P{}", subsampling, self.bits_per_sample),
                    SampleType::Float => format!("YUV{}P{}", subsampling, float_suffix),
                }
            }
        }
    }

    /// Gets the number of planes of this format.
    #[inline]
    pub fn plane_count(self) -> usize {
        match self.color_family {
            ColorFamily::Gray => 1,
            ColorFamily::RGB | ColorFamily::YUV => 3,
        }
    }

    /// Gets the color family of this format.
    #[inline]
    pub fn color_family(self) -> ColorFamily {
        self.color_family
    }

    /// Gets the sample type of this format.
    #[inline]
    pub fn sample_type(self) -> SampleType {
        self.sample_type
    }

    /// Gets the number of significant bits per sample.
    #[inline]
    pub fn bits_per_sample(self) -> u8 {
        self.bits_per_sample
    }

    /// Gets the number of bytes needed for a sample. This is always a power of 2 and the smallest
    /// possible that can fit the number of bits used per sample.
    #[inline]
    pub fn bytes_per_sample(self) -> u8 {
        self.bits_per_sample.div_ceil(8).next_power_of_two()
    }

    /// log2 subsampling factor, applied to second and third plane.
    #[inline]
    pub fn sub_sampling_w(self) -> u8 {
        self.sub_sampling_w
    }

    /// log2 subsampling factor, applied to second and third plane.
    #[inline]
    pub fn sub_sampling_h(self) -> u8 {
        self.sub_sampling_h
    }

    /// Returns the largest value an integer sample can hold, or 1 for float formats.
    #[inline]
    pub fn peak_value(self) -> f32 {
        match self.sample_type {
            SampleType::Integer => ((1u64 << self.bits_per_sample) - 1) as f32,
            SampleType::Float => 1.0,
        }
    }
}

impl From<PresetFormat> for Format {
    fn from(preset: PresetFormat) -> Self {
        let id = preset as i32;
        let color_family = match (id >> 28) & 0xF {
            1 => ColorFamily::Gray,
            2 => ColorFamily::RGB,
            _ => ColorFamily::YUV,
        };
        let sample_type = match (id >> 24) & 0xF {
            0 => SampleType::Integer,
            _ => SampleType::Float,
        };

        Format {
            color_family,
            sample_type,
            bits_per_sample: ((id >> 16) & 0xFF) as u8,
            sub_sampling_w: ((id >> 8) & 0xFF) as u8,
            sub_sampling_h: (id & 0xFF) as u8,
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}
