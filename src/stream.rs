//! Incremental, fixed-memory feature extraction.
//!
//! [`StreamingExtractor`] is the in-process counterpart of the rendered C++
//! artifact: one sample in at a time, one buffer, and the same per-window
//! feature math as [`Windower`](crate::window::Windower). For any
//! `shift <= length` its output matches the batch transform window for
//! window; label aggregation has no streaming counterpart.

use crate::error::{Result, WindowError};
use crate::window::{StreamLayout, WindowSpec};

/// Fixed-buffer streaming feature extractor.
#[derive(Debug, Clone)]
pub struct StreamingExtractor {
    layout: StreamLayout,
    buffer: Vec<f32>,
    head: usize,
    features: Vec<f32>,
}

impl StreamingExtractor {
    /// Build an extractor for a bound spec.
    ///
    /// Fails with [`WindowError::FitRequired`] if `num_features` has not
    /// been bound by a prior fit.
    pub fn new(spec: &WindowSpec) -> Result<Self> {
        let layout = spec.layout()?;
        Ok(Self::from_layout(layout))
    }

    /// Build an extractor directly from a derived layout.
    pub fn from_layout(layout: StreamLayout) -> Self {
        Self {
            layout,
            buffer: vec![0.0; layout.buffer_len],
            head: 0,
            features: vec![0.0; layout.feature_count],
        }
    }

    /// Output vector length: `8 * num_features`.
    pub fn feature_count(&self) -> usize {
        self.layout.feature_count
    }

    /// The most recently completed feature vector.
    ///
    /// Only meaningful after a `push` has returned `true`.
    pub fn features(&self) -> &[f32] {
        &self.features
    }

    /// Feed one sample of `num_features` scalars.
    ///
    /// Returns `false` while the window is still filling. Once the buffer
    /// holds a full window, computes the feature vector, shifts the buffer
    /// down by `shift` samples (discarding the whole buffer when
    /// `shift >= length`) and returns `true`.
    pub fn push(&mut self, sample: &[f32]) -> Result<bool> {
        let nf = self.layout.num_features;
        if sample.len() != nf {
            return Err(WindowError::DimensionMismatch {
                expected: nf,
                got: sample.len(),
            });
        }

        self.buffer[self.head..self.head + nf].copy_from_slice(sample);
        self.head += nf;

        if self.head != self.layout.buffer_len {
            return Ok(false);
        }

        self.extract();

        // keep the newest length-shift samples, drop the rest
        let shift = self.layout.shift_scalars;
        let overlap = self.layout.overlap_scalars;
        self.buffer.copy_within(shift..shift + overlap, 0);
        self.head = overlap;

        Ok(true)
    }

    /// Like [`push`](Self::push), additionally copying a completed feature
    /// vector into `dest`.
    pub fn push_into(&mut self, sample: &[f32], dest: &mut [f32]) -> Result<bool> {
        if dest.len() != self.layout.feature_count {
            return Err(WindowError::DimensionMismatch {
                expected: self.layout.feature_count,
                got: dest.len(),
            });
        }
        let ready = self.push(sample)?;
        if ready {
            dest.copy_from_slice(&self.features);
        }
        Ok(ready)
    }

    /// Two-pass per-axis scan over the full buffer, mirroring the batch
    /// feature math: extrema and mean first, then the mean-dependent std and
    /// counts.
    fn extract(&mut self) {
        let nf = self.layout.num_features;
        let size = self.layout.buffer_len;
        let length = self.layout.length as f32;
        let mut out = 0;

        for axis in 0..nf {
            let first = self.buffer[axis];
            let mut min = first;
            let mut max = first;
            let mut abs_min = first.abs();
            let mut abs_max = first.abs();
            let mut mean = first;

            let mut idx = axis + nf;
            while idx < size {
                let x = self.buffer[idx];
                let abs_x = x.abs();
                mean += x;
                if x < min {
                    min = x;
                }
                if x > max {
                    max = x;
                }
                if abs_x < abs_min {
                    abs_min = abs_x;
                }
                if abs_x > abs_max {
                    abs_max = abs_x;
                }
                idx += nf;
            }
            mean /= length;

            let mut std = 0.0;
            let mut count_above = 0.0;
            let mut count_below = 0.0;
            let mut idx = axis;
            while idx < size {
                let x = self.buffer[idx];
                std += (x - mean) * (x - mean);
                if x > mean {
                    count_above += 1.0;
                } else {
                    count_below += 1.0;
                }
                idx += nf;
            }
            let std = (std / length).sqrt();

            self.features[out] = min;
            self.features[out + 1] = max;
            self.features[out + 2] = abs_min;
            self.features[out + 3] = abs_max;
            self.features[out + 4] = mean;
            self.features[out + 5] = std;
            self.features[out + 6] = count_above;
            self.features[out + 7] = count_below;
            out += 8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bound_spec(length: usize, shift: f64, num_features: usize) -> WindowSpec {
        let mut spec = WindowSpec::new(length, shift, 1.0).unwrap();
        spec.bind_num_features(num_features).unwrap();
        spec
    }

    #[test]
    fn new_requires_bound_spec() {
        let spec = WindowSpec::new(4, 1.0, 1.0).unwrap();
        assert_eq!(
            StreamingExtractor::new(&spec).unwrap_err(),
            WindowError::FitRequired
        );
    }

    #[test]
    fn push_rejects_wrong_sample_width() {
        let mut ex = StreamingExtractor::new(&bound_spec(4, 1.0, 2)).unwrap();
        assert_eq!(
            ex.push(&[1.0]),
            Err(WindowError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn push_into_rejects_wrong_dest_width() {
        let mut ex = StreamingExtractor::new(&bound_spec(4, 1.0, 1)).unwrap();
        let mut dest = vec![0.0; 7];
        assert_eq!(
            ex.push_into(&[1.0], &mut dest),
            Err(WindowError::DimensionMismatch {
                expected: 8,
                got: 7
            })
        );
    }

    #[test]
    fn not_ready_while_filling() {
        let mut ex = StreamingExtractor::new(&bound_spec(4, 2.0, 1)).unwrap();
        assert!(!ex.push(&[1.0]).unwrap());
        assert!(!ex.push(&[2.0]).unwrap());
        assert!(!ex.push(&[3.0]).unwrap());
        assert!(ex.push(&[4.0]).unwrap());
    }

    #[test]
    fn first_window_features() {
        let mut ex = StreamingExtractor::new(&bound_spec(4, 2.0, 1)).unwrap();
        for x in [1.0, 2.0, 3.0] {
            assert!(!ex.push(&[x]).unwrap());
        }
        assert!(ex.push(&[4.0]).unwrap());

        let f = ex.features();
        assert_eq!(f.len(), 8);
        assert_relative_eq!(f[0], 1.0);
        assert_relative_eq!(f[1], 4.0);
        assert_relative_eq!(f[2], 1.0);
        assert_relative_eq!(f[3], 4.0);
        assert_relative_eq!(f[4], 2.5);
        assert_relative_eq!(f[5], 1.25_f32.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(f[6], 2.0);
        assert_relative_eq!(f[7], 2.0);
    }

    #[test]
    fn overlapping_windows_reuse_the_buffer() {
        // length=4 shift=2 over 1..=6: second window is [3,4,5,6], fed with
        // only two new samples after the first completes.
        let mut ex = StreamingExtractor::new(&bound_spec(4, 2.0, 1)).unwrap();
        for x in [1.0, 2.0, 3.0, 4.0] {
            ex.push(&[x]).unwrap();
        }
        assert!(!ex.push(&[5.0]).unwrap());
        assert!(ex.push(&[6.0]).unwrap());

        let f = ex.features();
        assert_relative_eq!(f[0], 3.0);
        assert_relative_eq!(f[1], 6.0);
        assert_relative_eq!(f[4], 4.5);
    }

    #[test]
    fn degenerate_shift_discards_whole_buffer() {
        // shift > length: nothing carries over between windows.
        let mut ex = StreamingExtractor::new(&bound_spec(2, 3.0, 1)).unwrap();
        assert!(!ex.push(&[10.0]).unwrap());
        assert!(ex.push(&[20.0]).unwrap());
        assert_relative_eq!(ex.features()[4], 15.0);

        // A fresh window must take two more pushes, not one.
        assert!(!ex.push(&[1.0]).unwrap());
        assert!(ex.push(&[3.0]).unwrap());
        assert_relative_eq!(ex.features()[0], 1.0);
        assert_relative_eq!(ex.features()[1], 3.0);
        assert_relative_eq!(ex.features()[4], 2.0);
    }

    #[test]
    fn shift_equal_to_length_tumbles() {
        let mut ex = StreamingExtractor::new(&bound_spec(2, 2.0, 1)).unwrap();
        ex.push(&[1.0]).unwrap();
        assert!(ex.push(&[2.0]).unwrap());
        assert_relative_eq!(ex.features()[4], 1.5);
        ex.push(&[5.0]).unwrap();
        assert!(ex.push(&[7.0]).unwrap());
        assert_relative_eq!(ex.features()[4], 6.0);
    }

    #[test]
    fn push_into_copies_on_completion() {
        let mut ex = StreamingExtractor::new(&bound_spec(2, 2.0, 2)).unwrap();
        let mut dest = vec![0.0; ex.feature_count()];
        assert!(!ex.push_into(&[1.0, 10.0], &mut dest).unwrap());
        assert!(ex.push_into(&[3.0, 30.0], &mut dest).unwrap());
        // Axis 0 mean, then axis 1 mean in the second block.
        assert_relative_eq!(dest[4], 2.0);
        assert_relative_eq!(dest[12], 20.0);
        assert_eq!(dest, ex.features());
    }
}
