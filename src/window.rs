//! Window configuration and the batch windowing transform.
//!
//! A [`WindowSpec`] describes how a multivariate sample stream is cut into
//! overlapping windows; a [`Windower`] applies it to a full labeled dataset,
//! producing one feature vector and one aggregated label per accepted
//! window. The number of feature axes is bound on the first fit and shared,
//! via [`StreamLayout`], with the streaming extractor and the C++ emitter so
//! the three stay derived from one parameter record.

use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::error::{Result, WindowError};
use crate::features::{axis_features, FEATURES_PER_AXIS};

/// Validated windowing configuration.
///
/// `shift` and `agreement` accept the dual convention of the reference
/// implementation: values `>= 1` are absolute sample counts, values in
/// `(0, 1)` are fractions of `length` and are resolved at construction.
/// `shift = 1.0` is therefore absolute, not fractional.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    length: usize,
    shift: usize,
    agreement: f64,
    num_features: Option<usize>,
}

impl WindowSpec {
    /// Create a spec with explicit shift and agreement.
    ///
    /// Fractional shifts are floored to whole samples after resolution and
    /// must come out to at least one sample. Fractional agreement stays
    /// fractional: a window is accepted when its majority tally, as a float,
    /// reaches the resolved threshold.
    pub fn new(length: usize, shift: f64, agreement: f64) -> Result<Self> {
        if length <= 1 {
            return Err(WindowError::InvalidParameter(
                "length must be greater than 1".to_string(),
            ));
        }
        // NaN must fail validation here; it would otherwise skip the
        // fractional branch and disable the agreement comparison entirely.
        if shift.is_nan() || shift <= 0.0 {
            return Err(WindowError::InvalidParameter(
                "shift must be greater than 0".to_string(),
            ));
        }
        if agreement.is_nan() || agreement <= 0.0 {
            return Err(WindowError::InvalidParameter(
                "agreement must be greater than 0".to_string(),
            ));
        }

        let resolved_shift = if shift >= 1.0 {
            shift
        } else {
            shift * length as f64
        };
        let shift_samples = resolved_shift.floor() as usize;
        if shift_samples == 0 {
            return Err(WindowError::InvalidParameter(
                "shift resolves to zero samples".to_string(),
            ));
        }

        let agreement = if agreement >= 1.0 {
            agreement
        } else {
            agreement * length as f64
        };

        Ok(Self {
            length,
            shift: shift_samples,
            agreement,
            num_features: None,
        })
    }

    /// Create a spec with the reference defaults: shift of one sample and
    /// agreement of half the window.
    pub fn with_length(length: usize) -> Result<Self> {
        Self::new(length, 1.0, 0.5)
    }

    /// Window length in samples.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Resolved step between window starts, in samples.
    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Resolved minimum vote count for a window label to be accepted.
    pub fn agreement(&self) -> f64 {
        self.agreement
    }

    /// Number of feature axes, once bound by a fit.
    pub fn num_features(&self) -> Option<usize> {
        self.num_features
    }

    /// Bind the number of feature axes.
    ///
    /// Binding is one-shot: a second bind with a different axis count fails
    /// instead of silently overwriting.
    pub fn bind_num_features(&mut self, num_features: usize) -> Result<()> {
        if num_features == 0 {
            return Err(WindowError::EmptyData);
        }
        match self.num_features {
            Some(bound) if bound != num_features => Err(WindowError::DimensionMismatch {
                expected: bound,
                got: num_features,
            }),
            _ => {
                self.num_features = Some(num_features);
                Ok(())
            }
        }
    }

    /// Derive the buffer layout shared by the streaming extractor and the
    /// emitter. Fails until `num_features` has been bound.
    pub fn layout(&self) -> Result<StreamLayout> {
        let num_features = self.num_features.ok_or(WindowError::FitRequired)?;
        // shift >= length degenerates to discarding the whole buffer
        let retained = self.length.saturating_sub(self.shift);
        Ok(StreamLayout {
            num_features,
            length: self.length,
            shift: self.shift,
            buffer_len: self.length * num_features,
            shift_scalars: self.shift.min(self.length) * num_features,
            overlap_scalars: retained * num_features,
            feature_count: FEATURES_PER_AXIS * num_features,
        })
    }
}

/// Derived buffer sizes for one bound spec.
///
/// This is the single parameter record behind the batch transform, the
/// [`StreamingExtractor`](crate::stream::StreamingExtractor) and the
/// rendered C++ artifact. It hashes stably, which the emitter uses for
/// reproducible include-guard identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamLayout {
    /// Scalars per incoming sample.
    pub num_features: usize,
    /// Window length in samples.
    pub length: usize,
    /// Step between window starts, in samples.
    pub shift: usize,
    /// Buffer capacity in scalars: `length * num_features`.
    pub buffer_len: usize,
    /// Scalars discarded per completed window: `min(shift, length) * num_features`.
    pub shift_scalars: usize,
    /// Scalars carried over per completed window: `(length - min(shift, length)) * num_features`.
    pub overlap_scalars: usize,
    /// Output vector length: `8 * num_features`.
    pub feature_count: usize,
}

/// Most frequent label in a window, if its tally reaches the agreement
/// threshold. Ties resolve to the smallest label value.
fn majority_label(labels: &[i32], agreement: f64) -> Option<i32> {
    let mut tallies: BTreeMap<i32, usize> = BTreeMap::new();
    for &label in labels {
        *tallies.entry(label).or_insert(0) += 1;
    }

    let mut winner: Option<(i32, usize)> = None;
    for (&label, &count) in &tallies {
        // Strict comparison keeps the earliest (smallest) label on ties.
        if winner.map_or(true, |(_, best)| count > best) {
            winner = Some((label, count));
        }
    }

    let (label, count) = winner?;
    if (count as f64) < agreement {
        None
    } else {
        Some(label)
    }
}

/// Batch windowing transform: dataset + labels in, per-window feature
/// vectors + aggregated labels out.
#[derive(Debug, Clone)]
pub struct Windower {
    spec: WindowSpec,
}

impl Windower {
    pub fn new(spec: WindowSpec) -> Self {
        Self { spec }
    }

    /// The spec, including any bound axis count.
    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }

    /// Consume the windower, returning the (possibly bound) spec.
    pub fn into_spec(self) -> WindowSpec {
        self.spec
    }

    /// Bind the axis count from the dataset and transform it.
    pub fn fit_transform(&mut self, data: &Dataset, labels: &[i32]) -> Result<WindowedSet> {
        self.spec.bind_num_features(data.num_features())?;
        self.transform(data, labels)
    }

    /// Transform a dataset with an already-bound spec.
    ///
    /// Windows start at `0, shift, 2*shift, ...` while a full window still
    /// fits. A window whose majority label tally falls below the agreement
    /// threshold is dropped entirely; accepted windows keep their original
    /// order. For each accepted window the eight per-axis features are
    /// concatenated axis-major into one row.
    pub fn transform(&self, data: &Dataset, labels: &[i32]) -> Result<WindowedSet> {
        let layout = self.spec.layout()?;
        if data.num_features() != layout.num_features {
            return Err(WindowError::DimensionMismatch {
                expected: layout.num_features,
                got: data.num_features(),
            });
        }
        if labels.len() != data.num_samples() {
            return Err(WindowError::DimensionMismatch {
                expected: data.num_samples(),
                got: labels.len(),
            });
        }

        let length = self.spec.length;
        let num_samples = data.num_samples();
        let mut starts = Vec::new();
        let mut features = Vec::new();
        let mut accepted_labels = Vec::new();
        let mut axis_buf = Vec::with_capacity(length);

        let mut start = 0;
        while start + length <= num_samples {
            if let Some(label) = majority_label(&labels[start..start + length], self.spec.agreement)
            {
                let mut row = Vec::with_capacity(layout.feature_count);
                for axis in 0..layout.num_features {
                    data.axis_window(start, length, axis, &mut axis_buf);
                    row.extend_from_slice(&axis_features(&axis_buf));
                }
                starts.push(start);
                features.push(row);
                accepted_labels.push(label);
            }
            start += self.spec.shift;
        }

        Ok(WindowedSet {
            starts,
            features,
            labels: accepted_labels,
        })
    }
}

/// Result of one batch transform: accepted window start indices, their
/// feature vectors and their aggregated labels, co-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedSet {
    starts: Vec<usize>,
    features: Vec<Vec<f32>>,
    labels: Vec<i32>,
}

impl WindowedSet {
    /// Start index of each accepted window.
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    /// Feature matrix, one row of `8 * num_features` values per window.
    pub fn features(&self) -> &[Vec<f32>] {
        &self.features
    }

    /// One feature row.
    pub fn feature_row(&self, index: usize) -> &[f32] {
        &self.features[index]
    }

    /// Aggregated label per accepted window.
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Number of accepted windows.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}
