//! Fixed-distance split segmentation.
//!
//! Walks the track once, growing a single [`OpenWindow`] until it covers the
//! split distance (1000 units by default) or the samples run out.
//!
//! ## Boundary convention
//!
//! The sample that closes split `k` is also the first member of split `k + 1`,
//! so for a track of `n >= 2` samples producing `s` splits:
//!
//! ```text
//! sum(split.sample_count) == n + s - 1
//! ```
//!
//! Tracks with fewer than two samples produce no splits.

use log::debug;

use crate::metrics::TrackMetrics;
use crate::window::{OpenWindow, Window};
use crate::TrackSample;

/// Default split length in distance units (1 km for metre-based metrics).
pub const DEFAULT_SPLIT_DISTANCE: f64 = 1000.0;

/// Split the track into consecutive ~1000-unit windows.
pub fn fixed_splits<M: TrackMetrics + ?Sized>(samples: &[TrackSample], metrics: &M) -> Vec<Window> {
    fixed_splits_with_distance(samples, metrics, DEFAULT_SPLIT_DISTANCE)
}

/// Split the track into consecutive windows of at least `split_distance`.
///
/// The final split may be shorter.
pub fn fixed_splits_with_distance<M: TrackMetrics + ?Sized>(
    samples: &[TrackSample],
    metrics: &M,
    split_distance: f64,
) -> Vec<Window> {
    let mut segmenter = SplitSegmenter::new(split_distance);
    for i in 1..samples.len() {
        segmenter.push(i, samples, metrics);
    }

    debug!(
        "[Splits] {} samples -> {} splits of {:.0}",
        samples.len(),
        segmenter.splits.len(),
        split_distance
    );

    segmenter.splits
}

/// Incremental segmenter state, shared by [`fixed_splits_with_distance`] and
/// the run aggregator's single pass.
#[derive(Debug)]
pub(crate) struct SplitSegmenter {
    split_distance: f64,
    current: Option<OpenWindow>,
    splits: Vec<Window>,
}

impl SplitSegmenter {
    pub(crate) fn new(split_distance: f64) -> Self {
        Self {
            split_distance,
            current: None,
            splits: Vec::new(),
        }
    }

    /// Feed the pair `(index - 1, index)`. `index` must be >= 1.
    pub(crate) fn push<M: TrackMetrics + ?Sized>(
        &mut self,
        index: usize,
        samples: &[TrackSample],
        metrics: &M,
    ) {
        let previous = &samples[index - 1];
        let current = &samples[index];

        // Anchored at the track index of `previous`, not the split ordinal
        let window = self
            .current
            .get_or_insert_with(|| OpenWindow::new(index - 1));
        if window.is_empty() {
            window.extend(index - 1, previous, None, metrics);
        }
        window.extend(index, current, Some(previous), metrics);

        let is_last = index + 1 == samples.len();
        if window.distance() >= self.split_distance || is_last {
            if let Some(done) = self.current.take() {
                self.splits.push(done.finalize());
            }
        }
    }

    pub(crate) fn into_splits(self) -> Vec<Window> {
        self.splits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PlanarMetrics;
    use crate::GpsPoint;

    fn line(n: usize, spacing: f64) -> Vec<TrackSample> {
        (0..n)
            .map(|i| {
                TrackSample::new(
                    GpsPoint::new(0.0, i as f64 * spacing),
                    0.0,
                    i as i64 * 10_000,
                )
            })
            .collect()
    }

    #[test]
    fn test_even_splits() {
        // 2500 units at 100 spacing -> 1000, 1000, 500
        let track = line(26, 100.0);
        let splits = fixed_splits(&track, &PlanarMetrics);

        assert_eq!(splits.len(), 3);
        assert_eq!(splits[0].distance, 1000.0);
        assert_eq!(splits[1].distance, 1000.0);
        assert_eq!(splits[2].distance, 500.0);

        assert_eq!(splits[0].start_index, 0);
        assert_eq!(splits[0].end_index, 10);
        assert_eq!(splits[1].start_index, 10);
        assert_eq!(splits[1].end_index, 20);
        assert_eq!(splits[2].start_index, 20);
        assert_eq!(splits[2].end_index, 25);
    }

    #[test]
    fn test_sample_accounting_shares_boundaries() {
        let track = line(47, 73.0);
        let splits = fixed_splits(&track, &PlanarMetrics);
        let members: usize = splits.iter().map(|s| s.sample_count).sum();
        assert_eq!(members, track.len() + splits.len() - 1);

        for pair in splits.windows(2) {
            assert_eq!(pair[0].end_index, pair[1].start_index);
        }
        assert_eq!(splits.last().map(|s| s.end_index), Some(track.len() - 1));
    }

    #[test]
    fn test_short_track_single_split() {
        let track = line(6, 100.0);
        let splits = fixed_splits(&track, &PlanarMetrics);
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].sample_count, 6);
        assert_eq!(splits[0].distance, 500.0);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_split() {
        let track = line(21, 100.0);
        let splits = fixed_splits(&track, &PlanarMetrics);
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[1].end_index, 20);
    }

    #[test]
    fn test_degenerate_tracks() {
        assert!(fixed_splits(&[], &PlanarMetrics).is_empty());
        assert!(fixed_splits(&line(1, 100.0), &PlanarMetrics).is_empty());

        let two = fixed_splits(&line(2, 100.0), &PlanarMetrics);
        assert_eq!(two.len(), 1);
        assert_eq!(two[0].sample_count, 2);
    }

    #[test]
    fn test_custom_split_distance() {
        let track = line(11, 100.0);
        let splits = fixed_splits_with_distance(&track, &PlanarMetrics, 250.0);
        // Crosses at 300, 600, 900, then 100 left
        assert_eq!(splits.len(), 4);
        assert!(splits[..3].iter().all(|s| s.distance >= 250.0));
    }
}
