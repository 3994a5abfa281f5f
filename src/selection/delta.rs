//! Frame-to-frame pose differencing
//!
//! The selection pipeline never looks at absolute poses; it analyzes the
//! first-difference of the pose sequence, one 6-dimensional delta per
//! consecutive frame pair.

use ndarray::Array2;

use crate::error::{ReviewError, ReviewResult};
use crate::trace::PoseSample;
use crate::types::POSE_DIM;

/// First-difference of a pose sequence.
///
/// Row i holds `samples[i + 1] - samples[i]`, and `frame_ids[i]` is the id of
/// the later sample of the pair. Treated as immutable once computed.
#[derive(Clone, Debug)]
pub struct DeltaSignal {
    pub features: Array2<f64>,
    pub frame_ids: Vec<i64>,
}

impl DeltaSignal {
    pub fn from_samples(samples: &[PoseSample]) -> ReviewResult<Self> {
        if samples.len() < 2 {
            return Err(ReviewError::InsufficientData(samples.len()));
        }

        let n = samples.len() - 1;
        let mut features = Array2::<f64>::zeros((n, POSE_DIM));
        let mut frame_ids = Vec::with_capacity(n);

        for i in 0..n {
            let prev = samples[i].features();
            let next = samples[i + 1].features();
            for d in 0..POSE_DIM {
                features[[i, d]] = next[d] - prev[d];
            }
            frame_ids.push(samples[i + 1].frame_id);
        }

        Ok(Self { features, frame_ids })
    }

    pub fn len(&self) -> usize {
        self.frame_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn sample(frame_id: i64, x: f64, yaw: f64) -> PoseSample {
        PoseSample {
            frame_id,
            position: Vector3::new(x, 0.0, 0.0),
            orientation: Vector3::new(yaw, 0.0, 0.0),
        }
    }

    #[test]
    fn test_delta_length_and_values() {
        let samples = vec![
            sample(10, 1.0, 0.1),
            sample(11, 3.0, 0.4),
            sample(12, 2.5, 0.4),
        ];
        let delta = DeltaSignal::from_samples(&samples).unwrap();

        assert_eq!(delta.len(), 2);
        assert_eq!(delta.features[[0, 0]], 2.0);
        assert_eq!(delta.features[[0, 3]], 0.4 - 0.1);
        assert_eq!(delta.features[[1, 0]], -0.5);
        assert_eq!(delta.features[[1, 3]], 0.0);
    }

    #[test]
    fn test_frame_ids_are_later_samples() {
        let samples = vec![sample(10, 0.0, 0.0), sample(11, 0.0, 0.0), sample(15, 0.0, 0.0)];
        let delta = DeltaSignal::from_samples(&samples).unwrap();
        assert_eq!(delta.frame_ids, vec![11, 15]);
    }

    #[test]
    fn test_too_few_samples() {
        let samples = vec![sample(10, 0.0, 0.0)];
        assert_eq!(
            DeltaSignal::from_samples(&samples).unwrap_err(),
            ReviewError::InsufficientData(1)
        );
        assert_eq!(
            DeltaSignal::from_samples(&[]).unwrap_err(),
            ReviewError::InsufficientData(0)
        );
    }
}
