//! Best efforts: the fastest interval at each of several target distances.
//!
//! A best effort is the [`fastest_interval`] answer for one distance, paired
//! with its race estimate. Computing many distances is independent work, so
//! with the `parallel` feature the distances are spread across rayon threads.
//!
//! ## Example
//! ```rust
//! use run_metrics::efforts::{best_efforts, STANDARD_EFFORT_DISTANCES};
//! use run_metrics::{GpsPoint, PlanarMetrics, TrackSample};
//!
//! let track: Vec<TrackSample> = (0..60)
//!     .map(|i| TrackSample::new(GpsPoint::new(0.0, i as f64 * 100.0), 0.0, i * 24_000))
//!     .collect();
//!
//! let efforts = best_efforts(&track, STANDARD_EFFORT_DISTANCES, &PlanarMetrics);
//! // 5.9 km track: 400m, 1K, Mile and 5K are reachable
//! assert_eq!(efforts.len(), 4);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::intervals::{fastest_interval, TargetDistance};
use crate::metrics::TrackMetrics;
use crate::races::{estimate_race, RaceEstimate};
use crate::window::Window;
use crate::TrackSample;

/// Standard best-effort distances in meters
pub const STANDARD_EFFORT_DISTANCES: &[f64] = &[
    400.0, 1000.0, 1609.34, 5000.0, 10000.0, 21097.5, 42195.0,
];

/// The fastest interval found for one target distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestEffort {
    /// Requested target distance
    pub target_distance: f64,
    /// The fastest completed window
    pub window: Window,
    /// Race reading of the window at its nearest standard distance
    pub race: Option<RaceEstimate>,
    /// Activity ID where this best was achieved (multi-activity only)
    pub activity_id: Option<String>,
}

fn best_effort_for<M: TrackMetrics + ?Sized>(
    samples: &[TrackSample],
    distance: f64,
    metrics: &M,
) -> Option<BestEffort> {
    let target = TargetDistance::new(distance).ok()?;
    let window = fastest_interval(samples, target, metrics).fastest().cloned()?;
    Some(BestEffort {
        target_distance: distance,
        race: estimate_race(&window),
        window,
        activity_id: None,
    })
}

/// Best effort for each distance the track can reach, in input order.
///
/// Invalid or unreachable distances are skipped.
pub fn best_efforts<M: TrackMetrics + ?Sized>(
    samples: &[TrackSample],
    distances: &[f64],
    metrics: &M,
) -> Vec<BestEffort> {
    let efforts: Vec<BestEffort> = distances
        .iter()
        .filter_map(|&d| best_effort_for(samples, d, metrics))
        .collect();

    debug!(
        "[Efforts] {} of {} distances reachable",
        efforts.len(),
        distances.len()
    );
    efforts
}

/// Best efforts using parallel processing, one distance per task.
#[cfg(feature = "parallel")]
pub fn best_efforts_parallel<M: TrackMetrics>(
    samples: &[TrackSample],
    distances: &[f64],
    metrics: &M,
) -> Vec<BestEffort> {
    if distances.len() < 2 {
        return best_efforts(samples, distances, metrics);
    }

    distances
        .par_iter()
        .filter_map(|&d| best_effort_for(samples, d, metrics))
        .collect()
}

/// All-time best efforts across several activities.
///
/// For each distance keeps the fastest effort, tagged with its activity ID.
/// Ties keep the earlier activity.
pub fn best_efforts_multi<M: TrackMetrics + ?Sized>(
    activities: &[(String, Vec<TrackSample>)],
    distances: &[f64],
    metrics: &M,
) -> Vec<BestEffort> {
    let mut best: Vec<Option<BestEffort>> = vec![None; distances.len()];

    for (activity_id, samples) in activities {
        for (slot, &distance) in best.iter_mut().zip(distances) {
            let Some(mut effort) = best_effort_for(samples, distance, metrics) else {
                continue;
            };
            let faster = slot
                .as_ref()
                .map_or(true, |b| effort.window.duration_secs < b.window.duration_secs);
            if faster {
                effort.activity_id = Some(activity_id.clone());
                *slot = Some(effort);
            }
        }
    }

    best.into_iter().flatten().collect()
}
