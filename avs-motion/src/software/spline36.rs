//! Separable Spline36 resampling.

/// Kernel radius, in source pixels.
const SUPPORT: f64 = 3.0;

/// The Spline36 kernel.
#[inline]
fn spline36(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        ((13.0 / 11.0 * x - 453.0 / 209.0) * x - 3.0 / 209.0) * x + 1.0
    } else if x < 2.0 {
        let x = x - 1.0;
        ((-6.0 / 11.0 * x + 270.0 / 209.0) * x - 156.0 / 209.0) * x
    } else if x < 3.0 {
        let x = x - 2.0;
        ((1.0 / 11.0 * x - 45.0 / 209.0) * x + 26.0 / 209.0) * x
    } else {
        0.0
    }
}

/// Filter taps for one output sample.
#[derive(Debug, Clone, PartialEq)]
struct Taps {
    /// Source index of the first weight, may be out of bounds.
    start: isize,
    weights: Vec<f32>,
}

/// Precomputed taps mapping a source window onto `dst_len` samples.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Axis {
    src_len: usize,
    taps: Vec<Taps>,
}

impl Axis {
    /// Computes the taps mapping `src_width` source samples starting at `src_left` onto
    /// `dst_len` output samples. Source samples outside `0..src_len` repeat the edge.
    pub(crate) fn new(src_len: usize, dst_len: usize, src_left: f64, src_width: f64) -> Self {
        let scale = src_width / dst_len as f64;
        // Widen the kernel when downscaling so it keeps acting as a lowpass.
        let filter_scale = scale.max(1.0);
        let support = SUPPORT * filter_scale;

        let taps = (0..dst_len)
            .map(|i| {
                let center = src_left + (i as f64 + 0.5) * scale - 0.5;
                let start = (center - support).ceil() as isize;
                let end = (center + support).floor() as isize;

                let mut weights = (start..=end)
                    .map(|j| spline36((j as f64 - center) / filter_scale))
                    .collect::<Vec<_>>();
                let sum: f64 = weights.iter().sum();
                if sum != 0.0 {
                    weights.iter_mut().for_each(|w| *w /= sum);
                }

                Taps {
                    start,
                    weights: weights.into_iter().map(|w| w as f32).collect(),
                }
            })
            .collect();

        Self { src_len, taps }
    }

    /// Returns the output length.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.taps.len()
    }

    /// Computes output sample `i` from a source line accessed through `sample`.
    #[inline]
    fn apply<F: Fn(usize) -> f32>(&self, i: usize, sample: F) -> f32 {
        let taps = &self.taps[i];
        let last = self.src_len as isize - 1;

        taps.weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(k, &w)| {
                let j = (taps.start + k as isize).clamp(0, last) as usize;
                w * sample(j)
            })
            .sum()
    }
}

/// Resamples a row-major plane of `src_width` × `src_height` samples.
pub(crate) fn resample(
    src: &[f32],
    src_width: usize,
    src_height: usize,
    horizontal: &Axis,
    vertical: &Axis,
) -> Vec<f32> {
    debug_assert_eq!(src.len(), src_width * src_height);
    let dst_width = horizontal.len();
    let dst_height = vertical.len();

    let mut rows = Vec::with_capacity(dst_width * src_height);
    for row in src.chunks_exact(src_width) {
        rows.extend((0..dst_width).map(|x| horizontal.apply(x, |j| row[j])));
    }

    let mut dst = Vec::with_capacity(dst_width * dst_height);
    for y in 0..dst_height {
        dst.extend((0..dst_width).map(|x| vertical.apply(y, |j| rows[j * dst_width + x])));
    }
    dst
}
