//! Covariance-to-scalar uncertainty scoring
//!
//! Each local covariance collapses to the mean of its entries; the resulting
//! per-frame sequence is min-max normalized so peak search always operates on
//! a [0, 1] signal.

use crate::error::{ReviewError, ReviewResult};
use crate::selection::local_stats::LocalModel;
use crate::types::POSE_DIM;

/// Mean of all covariance entries, one scalar per frame.
pub fn raw_uncertainty(models: &[LocalModel]) -> Vec<f64> {
    models
        .iter()
        .map(|m| m.covariance.iter().sum::<f64>() / (POSE_DIM * POSE_DIM) as f64)
        .collect()
}

/// Min-max normalize to [0, 1].
///
/// Fails with [`ReviewError::DegenerateSignal`] when the signal is constant
/// (zero dynamic range), since normalizing would divide by zero.
pub fn normalize(raw: &[f64]) -> ReviewResult<Vec<f64>> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !(range > 0.0) {
        return Err(ReviewError::DegenerateSignal);
    }
    Ok(raw.iter().map(|v| (v - min) / range).collect())
}
