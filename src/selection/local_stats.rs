//! Sliding-window Gaussian statistics over the delta signal
//!
//! For every delta frame, a symmetric window of neighbors (clamped at the
//! sequence boundaries) is summarized as a mean vector and sample covariance,
//! and the frame itself is scored with the log-density of that local Gaussian.
//! Windows narrower than the feature dimensionality produce singular
//! covariances, so the log-density works through an eigendecomposition with a
//! pseudo-determinant and pseudo-inverse instead of a plain inversion.

use ndarray::{s, Array1, Array2, ArrayView1};

use crate::error::{ReviewError, ReviewResult};
use crate::types::{PoseCov, PoseVec, POSE_DIM};

/// Relative eigenvalue cutoff below which a covariance direction is treated
/// as part of the null space.
const EIG_RTOL: f64 = 1e-10;

/// Local Gaussian summary of one delta frame's neighborhood.
///
/// Never mutated after creation.
#[derive(Clone, Debug)]
pub struct LocalModel {
    pub mean: Array1<f64>,
    pub covariance: Array2<f64>,
    /// Log-density of the window's Gaussian at this frame's delta, divided by
    /// the feature dimensionality.
    pub log_likelihood: f64,
}

/// Window index range for frame `t`: `[t - radius, t + radius]` clamped to
/// `[0, n)`. Never empty for `n >= 1`.
pub fn window_bounds(t: usize, radius: usize, n: usize) -> (usize, usize) {
    let lo = t.saturating_sub(radius);
    let hi = (t + radius + 1).min(n);
    (lo, hi)
}

/// Estimate a [`LocalModel`] for every row of the delta signal.
///
/// Fails with [`ReviewError::NumericalInstability`] if any window yields a
/// non-finite mean or covariance entry (e.g. a single-row window, whose
/// sample covariance is undefined).
pub fn estimate_local_models(deltas: &Array2<f64>, radius: usize) -> ReviewResult<Vec<LocalModel>> {
    let n = deltas.nrows();
    let mut models = Vec::with_capacity(n);

    for t in 0..n {
        let (lo, hi) = window_bounds(t, radius, n);
        let segment = deltas.slice(s![lo..hi, ..]);
        let rows = segment.nrows();

        let mean = segment
            .mean_axis(ndarray::Axis(0))
            .ok_or(ReviewError::NumericalInstability(t))?;
        let centered = segment.to_owned() - &mean;
        let covariance = centered.t().dot(&centered) / (rows as f64 - 1.0);

        if mean.iter().any(|v| !v.is_finite()) || covariance.iter().any(|v| !v.is_finite()) {
            return Err(ReviewError::NumericalInstability(t));
        }

        let log_likelihood =
            gaussian_logpdf(&deltas.row(t), &mean, &covariance) / POSE_DIM as f64;

        models.push(LocalModel {
            mean,
            covariance,
            log_likelihood,
        });
    }

    Ok(models)
}

/// Log-density of a multivariate Gaussian that tolerates singular covariance.
///
/// Eigenvalues at or below the relative cutoff are excluded from both the
/// pseudo-determinant and the Mahalanobis term, so residual components in the
/// null space contribute nothing. A fully constant window therefore scores 0
/// rather than NaN.
fn gaussian_logpdf(x: &ArrayView1<f64>, mean: &Array1<f64>, covariance: &Array2<f64>) -> f64 {
    let eigen = pose_cov_from_nd(covariance).symmetric_eigen();

    let max_eig = eigen
        .eigenvalues
        .iter()
        .fold(0.0_f64, |acc, &v| acc.max(v.abs()));
    let cutoff = EIG_RTOL * max_eig;

    let residual = PoseVec::from_iterator(x.iter().zip(mean.iter()).map(|(a, b)| a - b));

    let mut rank = 0usize;
    let mut log_pdet = 0.0;
    let mut mahalanobis = 0.0;
    for i in 0..POSE_DIM {
        let lambda = eigen.eigenvalues[i];
        if lambda > cutoff {
            rank += 1;
            log_pdet += lambda.ln();
            let proj = eigen.eigenvectors.column(i).dot(&residual);
            mahalanobis += proj * proj / lambda;
        }
    }

    -0.5 * (rank as f64 * (2.0 * std::f64::consts::PI).ln() + log_pdet + mahalanobis)
}

fn pose_cov_from_nd(covariance: &Array2<f64>) -> PoseCov {
    let data: Vec<f64> = covariance.iter().copied().collect();
    PoseCov::from_row_slice(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    fn ramp_signal(n: usize) -> Array2<f64> {
        let mut deltas = Array2::<f64>::zeros((n, POSE_DIM));
        for t in 0..n {
            for d in 0..POSE_DIM {
                deltas[[t, d]] = (t * (d + 1)) as f64 * 0.01 + ((t * 7919) % 13) as f64 * 0.1;
            }
        }
        deltas
    }

    #[test]
    fn test_window_bounds_clamped() {
        let n = 100;
        let radius = 20;
        for t in 0..n {
            let (lo, hi) = window_bounds(t, radius, n);
            assert!(lo <= t && t < hi && hi <= n);
            assert!(hi - lo <= 2 * radius + 1);
            assert!(hi > lo);
        }
        // Interior windows reach full width, boundary windows shrink.
        assert_eq!(window_bounds(50, radius, n), (30, 71));
        assert_eq!(window_bounds(0, radius, n), (0, 21));
        assert_eq!(window_bounds(99, radius, n), (79, 100));
    }

    #[test]
    fn test_mean_matches_window_average() {
        let deltas = ramp_signal(60);
        let radius = 5;
        let models = estimate_local_models(&deltas, radius).unwrap();

        let (lo, hi) = window_bounds(30, radius, 60);
        for d in 0..POSE_DIM {
            let expected: f64 =
                (lo..hi).map(|t| deltas[[t, d]]).sum::<f64>() / (hi - lo) as f64;
            assert_relative_eq!(models[30].mean[d], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_window_has_zero_covariance_and_finite_likelihood() {
        let mut deltas = Array2::<f64>::zeros((50, POSE_DIM));
        deltas.fill(0.25);
        let models = estimate_local_models(&deltas, 10).unwrap();

        for model in &models {
            assert!(model.covariance.iter().all(|&v| v.abs() < 1e-15));
            assert!(model.log_likelihood.is_finite());
            assert_relative_eq!(model.log_likelihood, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_singular_covariance_tolerated() {
        // Window width 2 * 1 + 1 = 3 < 6 features, so every covariance is
        // rank-deficient; the log-density must still be finite.
        let deltas = ramp_signal(20);
        let models = estimate_local_models(&deltas, 1).unwrap();
        for model in &models {
            assert!(model.log_likelihood.is_finite());
        }
    }

    #[test]
    fn test_single_row_window_is_unstable() {
        // One delta row means a one-sample window whose covariance divisor is
        // zero; that must surface as an error, not NaN.
        let deltas = arr2(&[[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]]);
        let err = estimate_local_models(&deltas, 5).unwrap_err();
        assert_eq!(err, ReviewError::NumericalInstability(0));
    }
}
