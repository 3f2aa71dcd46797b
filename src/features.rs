//! Per-axis statistical features.
//!
//! Provides the eight window statistics used by both the batch windower and
//! the streaming extractor: min, max, absolute min, absolute max, mean,
//! population standard deviation, and the two mean-split counts.

/// Number of features computed per axis.
pub const FEATURES_PER_AXIS: usize = 8;

/// Returns the minimum value.
pub fn minimum(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::INFINITY, f32::min)
}

/// Returns the maximum value.
pub fn maximum(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

/// Returns the lowest absolute value.
pub fn absolute_minimum(values: &[f32]) -> f32 {
    values.iter().map(|x| x.abs()).fold(f32::INFINITY, f32::min)
}

/// Returns the highest absolute value.
pub fn absolute_maximum(values: &[f32]) -> f32 {
    values
        .iter()
        .map(|x| x.abs())
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Returns the arithmetic mean.
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return f32::NAN;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Returns the population standard deviation (n denominator) around a
/// precomputed mean.
pub fn population_std(values: &[f32], mean: f32) -> f32 {
    if values.is_empty() {
        return f32::NAN;
    }
    let sum_sq: f32 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
    (sum_sq / values.len() as f32).sqrt()
}

/// Returns the count of values strictly greater than the threshold.
pub fn count_above(values: &[f32], threshold: f32) -> usize {
    values.iter().filter(|&&x| x > threshold).count()
}

/// Returns the count of values less than or equal to the threshold.
pub fn count_at_or_below(values: &[f32], threshold: f32) -> usize {
    values.iter().filter(|&&x| x <= threshold).count()
}

/// Computes the eight features for one axis of one window, in output order:
/// min, max, abs-min, abs-max, mean, population std, count strictly above
/// the mean, count at or below the mean.
///
/// The mean is computed once and reused for the std and both counts, so the
/// two counts always partition the window exactly.
pub fn axis_features(values: &[f32]) -> [f32; FEATURES_PER_AXIS] {
    let m = mean(values);
    [
        minimum(values),
        maximum(values),
        absolute_minimum(values),
        absolute_maximum(values),
        m,
        population_std(values, m),
        count_above(values, m) as f32,
        count_at_or_below(values, m) as f32,
    ]
}
