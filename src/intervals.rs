//! # Fastest Interval Discovery
//!
//! Finds, for a target distance `D`, every minimal contiguous interval whose
//! distance first reaches `D`, one per feasible start index. The fastest
//! interval is the member of that set with the shortest duration.
//!
//! ## Algorithm
//!
//! Any sample may start the eventual fastest interval, so a window is opened at
//! every sample and all growing windows are advanced together:
//!
//! 1. Open a new window anchored at sample `i`
//! 2. Extend every growing window with sample `i`
//! 3. Retire each window whose distance is now `>= D`
//!
//! Windows live in an arena indexed by start position, with a separate list of
//! indices that are still growing. Windows left growing when the samples run
//! out start too close to the end of the track and are dropped.
//!
//! Worst case is O(n²): with a long target every window stays open for most of
//! the track. That is fine for a single run (thousands of samples); the
//! background entry points exist for long tracks.
//!
//! ## Example
//!
//! ```rust
//! use run_metrics::{fastest_interval, GpsPoint, PlanarMetrics, TargetDistance, TrackSample};
//!
//! let track: Vec<TrackSample> = (0..21)
//!     .map(|i| TrackSample::new(GpsPoint::new(0.0, i as f64 * 100.0), 0.0, i * 10_000))
//!     .collect();
//!
//! let target = TargetDistance::new(1000.0).unwrap();
//! let intervals = fastest_interval(&track, target, &PlanarMetrics);
//! let best = intervals.fastest().unwrap();
//! assert_eq!(best.duration_secs, 100.0);
//! ```

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunMetricsError};
use crate::metrics::{track_distance, TrackMetrics};
use crate::window::{OpenWindow, Window};
use crate::TrackSample;

// ============================================================================
// Types
// ============================================================================

/// A validated target distance: positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TargetDistance(f64);

impl TargetDistance {
    pub fn new(distance: f64) -> Result<Self> {
        if distance.is_finite() && distance > 0.0 {
            Ok(Self(distance))
        } else {
            Err(RunMetricsError::InvalidTarget { distance })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for TargetDistance {
    type Error = RunMetricsError;

    fn try_from(distance: f64) -> Result<Self> {
        Self::new(distance)
    }
}

impl From<TargetDistance> for f64 {
    fn from(target: TargetDistance) -> f64 {
        target.0
    }
}

/// Completed windows from one discovery pass, keyed by start index.
///
/// Iteration is in start-index order. Equality is set equality, so results
/// compare equal regardless of the order windows completed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalSet {
    windows: BTreeMap<usize, Window>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a window, replacing any existing window with the same start index.
    pub fn insert(&mut self, window: Window) -> Option<Window> {
        self.windows.insert(window.start_index, window)
    }

    /// The window with the shortest duration, ties broken by earliest start.
    pub fn fastest(&self) -> Option<&Window> {
        self.windows.values().min_by(|a, b| a.cmp_fastest(b))
    }

    /// The window anchored at `start_index`, if it completed.
    pub fn get(&self, start_index: usize) -> Option<&Window> {
        self.windows.get(&start_index)
    }

    pub fn contains(&self, start_index: usize) -> bool {
        self.windows.contains_key(&start_index)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn into_vec(self) -> Vec<Window> {
        self.windows.into_values().collect()
    }
}

impl FromIterator<Window> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = Window>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for window in iter {
            set.insert(window);
        }
        set
    }
}

impl IntoIterator for IntervalSet {
    type Item = Window;
    type IntoIter = std::collections::btree_map::IntoValues<usize, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.into_values()
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Find every minimal interval reaching `target`, one per feasible start index.
///
/// Returns an empty set when the whole track is shorter than the target.
pub fn fastest_interval<M: TrackMetrics + ?Sized>(
    samples: &[TrackSample],
    target: TargetDistance,
    metrics: &M,
) -> IntervalSet {
    let target = target.value();
    let total = track_distance(samples, metrics);
    if total < target {
        debug!(
            "[Intervals] Track of {:.0} cannot reach target {:.0}",
            total, target
        );
        return IntervalSet::new();
    }

    let mut arena: Vec<Option<OpenWindow>> = Vec::with_capacity(samples.len());
    let mut growing: Vec<usize> = Vec::new();
    let mut completed = IntervalSet::new();

    for (i, sample) in samples.iter().enumerate() {
        arena.push(Some(OpenWindow::new(i)));
        growing.push(i);

        let preceding = if i > 0 { samples.get(i - 1) } else { None };

        growing.retain(|&start| {
            let Some(mut window) = arena[start].take() else {
                return false;
            };
            window.extend(i, sample, preceding, metrics);

            if window.distance() >= target {
                completed.insert(window.finalize());
                false
            } else {
                arena[start] = Some(window);
                true
            }
        });
    }

    debug!(
        "[Intervals] target={:.0}: {} completed, {} discarded near track end",
        target,
        completed.len(),
        growing.len()
    );

    completed
}

/// Convenience wrapper returning only the fastest interval.
pub fn find_fastest<M: TrackMetrics + ?Sized>(
    samples: &[TrackSample],
    target: TargetDistance,
    metrics: &M,
) -> Option<Window> {
    fastest_interval(samples, target, metrics).fastest().cloned()
}

// ============================================================================
// Background Discovery
// ============================================================================

/// Handle for a discovery pass running on a worker thread.
///
/// Dropping the handle cancels delivery: the worker finishes the pass, but its
/// result is discarded and never observed.
pub struct IntervalHandle {
    receiver: mpsc::Receiver<IntervalSet>,
}

impl IntervalHandle {
    /// Check if discovery is complete (non-blocking).
    pub fn try_recv(&self) -> Option<IntervalSet> {
        self.receiver.try_recv().ok()
    }

    /// Wait for discovery to complete (blocking).
    pub fn recv(self) -> Result<IntervalSet> {
        self.receiver
            .recv()
            .map_err(|_| RunMetricsError::WorkerDisconnected)
    }
}

/// Start discovery on a background thread.
///
/// Returns a handle that can be polled or waited on.
pub fn fastest_interval_background<M>(
    samples: Arc<[TrackSample]>,
    target: TargetDistance,
    metrics: M,
) -> IntervalHandle
where
    M: TrackMetrics + 'static,
{
    let (tx, rx) = mpsc::channel();

    fastest_interval_async(samples, target, metrics, move |result| {
        // Receiver may already be gone
        tx.send(result).ok();
    });

    IntervalHandle { receiver: rx }
}

/// Run discovery on a background thread and pass the result to `on_complete`.
///
/// This form cannot be cancelled: `on_complete` always runs once the pass
/// finishes. Use [`fastest_interval_background`] and drop the handle to stop
/// observing a pass.
pub fn fastest_interval_async<M, F>(
    samples: Arc<[TrackSample]>,
    target: TargetDistance,
    metrics: M,
    on_complete: F,
) where
    M: TrackMetrics + 'static,
    F: FnOnce(IntervalSet) + Send + 'static,
{
    info!(
        "[Intervals] Starting background discovery over {} samples, target={:.0}",
        samples.len(),
        target.value()
    );

    thread::spawn(move || {
        let result = fastest_interval(&samples, target, &metrics);
        on_complete(result);
    });
}

/// Run discovery on the tokio blocking pool.
#[cfg(feature = "tokio")]
pub async fn fastest_interval_task<M>(
    samples: Arc<[TrackSample]>,
    target: TargetDistance,
    metrics: M,
) -> Result<IntervalSet>
where
    M: TrackMetrics + 'static,
{
    tokio::task::spawn_blocking(move || fastest_interval(&samples, target, &metrics))
        .await
        .map_err(|_| RunMetricsError::WorkerDisconnected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PlanarMetrics;
    use crate::GpsPoint;

    fn sample(x: f64, t_secs: i64) -> TrackSample {
        TrackSample::new(GpsPoint::new(0.0, x), 0.0, t_secs * 1000)
    }

    fn line(n: usize, spacing: f64, step_secs: i64) -> Vec<TrackSample> {
        (0..n)
            .map(|i| sample(i as f64 * spacing, i as i64 * step_secs))
            .collect()
    }

    fn target(d: f64) -> TargetDistance {
        TargetDistance::new(d).unwrap()
    }

    #[test]
    fn test_target_validation() {
        assert!(TargetDistance::new(0.0).is_err());
        assert!(TargetDistance::new(-1.0).is_err());
        assert!(TargetDistance::new(f64::NAN).is_err());
        assert!(TargetDistance::new(f64::INFINITY).is_err());
        assert_eq!(TargetDistance::new(5000.0).unwrap().value(), 5000.0);
    }

    #[test]
    fn test_target_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<TargetDistance>("-10.0").is_err());
        let t: TargetDistance = serde_json::from_str("400.0").unwrap();
        assert_eq!(t.value(), 400.0);
    }

    #[test]
    fn test_straight_line_one_window_per_feasible_start() {
        let track = line(21, 100.0, 10);
        let set = fastest_interval(&track, target(1000.0), &PlanarMetrics);

        assert_eq!(set.len(), 11);
        for (expected_start, window) in set.iter().enumerate() {
            assert_eq!(window.start_index, expected_start);
            assert_eq!(window.end_index, expected_start + 10);
            assert_eq!(window.distance, 1000.0);
            assert_eq!(window.duration_secs, 100.0);
        }
        assert!(!set.contains(11));
    }

    #[test]
    fn test_infeasible_target_is_empty() {
        let track = line(6, 100.0, 10); // 500 total
        assert!(fastest_interval(&track, target(1000.0), &PlanarMetrics).is_empty());
    }

    #[test]
    fn test_degenerate_tracks() {
        assert!(fastest_interval(&[], target(1.0), &PlanarMetrics).is_empty());
        assert!(fastest_interval(&line(1, 100.0, 10), target(0.5), &PlanarMetrics).is_empty());
    }

    #[test]
    fn test_fastest_picks_surge() {
        // 100 units per step, step time 30s except a fast section of 10s steps
        let mut t = 0;
        let mut track = vec![sample(0.0, 0)];
        for i in 1..=30 {
            t += if (10..=15).contains(&i) { 10 } else { 30 };
            track.push(sample(i as f64 * 100.0, t));
        }

        let set = fastest_interval(&track, target(500.0), &PlanarMetrics);
        let best = set.fastest().unwrap();
        // Steps 10..=15 are fast: the interval from sample 9 to 14 uses 5 fast steps
        assert_eq!(best.start_index, 9);
        assert_eq!(best.duration_secs, 50.0);
    }

    #[test]
    fn test_overshoot_is_bounded_by_last_step() {
        // Uneven spacing: every window overshoots
        let spacing = [30.0, 170.0, 55.0, 410.0, 12.0, 260.0, 95.0, 300.0, 5.0, 140.0];
        let mut x = 0.0;
        let mut track = vec![sample(0.0, 0)];
        for (i, d) in spacing.iter().enumerate() {
            x += d;
            track.push(sample(x, (i as i64 + 1) * 7));
        }

        let d = 400.0;
        let set = fastest_interval(&track, target(d), &PlanarMetrics);
        assert!(!set.is_empty());
        for w in set.iter() {
            let last_step = spacing[w.end_index - 1];
            assert!(w.distance >= d);
            assert!(w.distance - last_step < d);
        }
    }

    #[test]
    fn test_ties_break_to_earliest_start() {
        let track = line(30, 100.0, 10);
        let best = find_fastest(&track, target(300.0), &PlanarMetrics).unwrap();
        assert_eq!(best.start_index, 0);
    }

    #[test]
    fn test_background_matches_sync() {
        let track = line(50, 37.0, 9);
        let expected = fastest_interval(&track, target(400.0), &PlanarMetrics);

        let shared: Arc<[TrackSample]> = track.into();
        let handle = fastest_interval_background(shared, target(400.0), PlanarMetrics);
        assert_eq!(handle.recv().unwrap(), expected);
    }

    #[test]
    fn test_dropped_handle_does_not_panic() {
        let shared: Arc<[TrackSample]> = line(200, 10.0, 3).into();
        let handle = fastest_interval_background(shared, target(100.0), PlanarMetrics);
        drop(handle);
    }

    #[test]
    fn test_callback_runs_exactly_once() {
        let shared: Arc<[TrackSample]> = line(30, 50.0, 5).into();
        let (tx, rx) = mpsc::channel();
        fastest_interval_async(shared, target(500.0), PlanarMetrics, move |result| {
            tx.send(result.len()).ok();
        });

        let timeout = std::time::Duration::from_secs(30);
        assert_eq!(rx.recv_timeout(timeout), Ok(20));
        // Sender moved into the callback is dropped after its single call
        assert!(rx.recv_timeout(timeout).is_err());
    }

    #[test]
    fn test_interval_set_from_iter_dedupes_by_start() {
        let track = line(25, 100.0, 10);
        let set = fastest_interval(&track, target(1000.0), &PlanarMetrics);
        let doubled: IntervalSet = set.iter().cloned().chain(set.iter().cloned()).collect();
        assert_eq!(doubled, set);
        assert_eq!(doubled.into_vec().len(), 15);
    }
}
