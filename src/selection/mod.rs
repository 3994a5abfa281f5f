//! Salient-frame selection
//!
//! Pipeline: pose samples -> frame-to-frame deltas -> sliding-window Gaussian
//! statistics -> scalar uncertainty signal -> spaced peak search. The exported
//! artifact is the list of log frame ids worth manual review, with their
//! normalized uncertainty scores.

pub mod delta;
pub mod local_stats;
pub mod peaks;
pub mod uncertainty;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ReviewResult;
use crate::trace::PoseSample;

pub use delta::DeltaSignal;
pub use local_stats::{estimate_local_models, LocalModel};
pub use peaks::{find_peaks, Peak};
pub use uncertainty::{normalize, raw_uncertainty};

/// Tuning for the selection pipeline.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SelectionParams {
    /// Half-window radius for the local statistics pass.
    pub window_radius: usize,
    /// Narrower radius used for the one retry when the first pass finds fewer
    /// peaks than `max_count`.
    pub fallback_radius: usize,
    /// Minimum index spacing between returned peaks.
    pub min_spacing: usize,
    /// When set, rank peaks by descending score and keep at most this many.
    pub max_count: Option<usize>,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            window_radius: 20,
            fallback_radius: 10,
            min_spacing: 30,
            max_count: None,
        }
    }
}

/// A frame selected for review.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct SelectedFrame {
    pub frame_id: i64,
    pub score: f64,
}

/// Run the full selection pipeline over an absolute pose sequence.
///
/// Without `max_count` the peaks come back in temporal order. With
/// `max_count`, the pipeline is rerun once at the fallback radius if the
/// first pass under-produces, and the result is ranked by descending score
/// and truncated.
pub fn select_frames(
    samples: &[PoseSample],
    params: &SelectionParams,
) -> ReviewResult<Vec<SelectedFrame>> {
    let delta = DeltaSignal::from_samples(samples)?;

    let signal = scored_signal(&delta, params.window_radius)?;
    let mut found = find_peaks(&signal, params.min_spacing);

    if let Some(max_count) = params.max_count {
        if found.len() < max_count {
            debug!(
                "found {} peaks at radius {}, retrying at radius {}",
                found.len(),
                params.window_radius,
                params.fallback_radius
            );
            let narrow = scored_signal(&delta, params.fallback_radius)?;
            found = find_peaks(&narrow, params.min_spacing);
        }
        found.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        found.truncate(max_count);
    }

    Ok(found
        .into_iter()
        .map(|peak| SelectedFrame {
            frame_id: delta.frame_ids[peak.index],
            score: peak.score,
        })
        .collect())
}

fn scored_signal(delta: &DeltaSignal, radius: usize) -> ReviewResult<Vec<f64>> {
    let models = estimate_local_models(&delta.features, radius)?;
    normalize(&raw_uncertainty(&models))
}
