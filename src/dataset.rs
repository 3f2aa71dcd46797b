//! In-memory dataset container for multivariate sample streams.
//!
//! Stores samples row-major (sample index outer, axis inner) in single
//! precision, matching the representation used by the streaming extractor
//! and the emitted C++ artifact.

use crate::error::{Result, WindowError};

/// A `num_samples x num_features` matrix of readings, one row per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    values: Vec<f32>,
    num_samples: usize,
    num_features: usize,
}

impl Dataset {
    /// Build a dataset from per-sample rows.
    ///
    /// All rows must have the same non-zero width.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let first = rows.first().ok_or(WindowError::EmptyData)?;
        let num_features = first.len();
        if num_features == 0 {
            return Err(WindowError::EmptyData);
        }

        let mut values = Vec::with_capacity(rows.len() * num_features);
        for row in rows {
            if row.len() != num_features {
                return Err(WindowError::DimensionMismatch {
                    expected: num_features,
                    got: row.len(),
                });
            }
            values.extend_from_slice(row);
        }

        Ok(Self {
            values,
            num_samples: rows.len(),
            num_features,
        })
    }

    /// Build a dataset from a flat row-major buffer.
    ///
    /// The buffer length must be a non-zero multiple of `num_features`.
    pub fn from_flat(values: Vec<f32>, num_features: usize) -> Result<Self> {
        if values.is_empty() || num_features == 0 {
            return Err(WindowError::EmptyData);
        }
        if !values.len().is_multiple_of(num_features) {
            return Err(WindowError::DimensionMismatch {
                expected: num_features,
                got: values.len() % num_features,
            });
        }

        let num_samples = values.len() / num_features;
        Ok(Self {
            values,
            num_samples,
            num_features,
        })
    }

    /// Number of samples (rows).
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Number of feature axes (columns).
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// One sample row.
    ///
    /// # Panics
    /// Panics if `index >= num_samples`.
    pub fn row(&self, index: usize) -> &[f32] {
        let offset = index * self.num_features;
        &self.values[offset..offset + self.num_features]
    }

    /// A contiguous block of `len` rows starting at `start`, as a flat
    /// row-major slice.
    ///
    /// # Panics
    /// Panics if the block runs past the end of the data.
    pub fn window(&self, start: usize, len: usize) -> &[f32] {
        let offset = start * self.num_features;
        &self.values[offset..offset + len * self.num_features]
    }

    /// Copy the `len` values of one axis across a window into `out`.
    ///
    /// `out` is cleared first, so it can be reused across calls.
    ///
    /// # Panics
    /// Panics if `axis >= num_features` or the window runs past the end.
    pub fn axis_window(&self, start: usize, len: usize, axis: usize, out: &mut Vec<f32>) {
        assert!(axis < self.num_features, "axis out of range");
        out.clear();
        out.reserve(len);
        let mut idx = start * self.num_features + axis;
        for _ in 0..len {
            out.push(self.values[idx]);
            idx += self.num_features;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_valid() {
        let data = Dataset::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(data.num_samples(), 3);
        assert_eq!(data.num_features(), 2);
        assert_eq!(data.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn from_rows_empty() {
        assert_eq!(Dataset::from_rows(&[]), Err(WindowError::EmptyData));
        assert_eq!(Dataset::from_rows(&[vec![]]), Err(WindowError::EmptyData));
    }

    #[test]
    fn from_rows_ragged() {
        let err = Dataset::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            WindowError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn from_flat_valid() {
        let data = Dataset::from_flat(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
        assert_eq!(data.num_samples(), 2);
        assert_eq!(data.row(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_flat_remainder() {
        let err = Dataset::from_flat(vec![1.0, 2.0, 3.0, 4.0, 5.0], 2).unwrap_err();
        assert_eq!(
            err,
            WindowError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn window_slices_rows() {
        let data = Dataset::from_flat((1..=8).map(|x| x as f32).collect(), 2).unwrap();
        assert_eq!(data.window(1, 2), &[3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn axis_window_strides() {
        let data = Dataset::from_flat((1..=8).map(|x| x as f32).collect(), 2).unwrap();
        let mut out = vec![99.0];
        data.axis_window(0, 4, 1, &mut out);
        assert_eq!(out, vec![2.0, 4.0, 6.0, 8.0]);
        data.axis_window(1, 2, 0, &mut out);
        assert_eq!(out, vec![3.0, 5.0]);
    }
}
