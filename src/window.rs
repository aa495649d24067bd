//! Growing and finalized windows over a contiguous run of track samples.
//!
//! An [`OpenWindow`] accumulates distance, duration and climb as samples are
//! appended. [`OpenWindow::finalize`] consumes it and produces an immutable
//! [`Window`]. Because finalizing takes `self`, a window can be finalized at
//! most once and never extended afterwards.
//!
//! Members are always a contiguous index range of the track, so a window
//! stores `start_index..=end_index` instead of copying samples.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::metrics::TrackMetrics;
use crate::TrackSample;

/// A window that is still accepting samples.
#[derive(Debug, Clone)]
pub struct OpenWindow {
    start_index: usize,
    end_index: usize,
    sample_count: usize,
    distance: f64,
    duration_secs: f64,
    elevation_gain: f64,
    heart_rate_sum: u64,
    heart_rate_count: u32,
}

impl OpenWindow {
    /// Create an empty window anchored at `start_index`.
    pub fn new(start_index: usize) -> Self {
        Self {
            start_index,
            end_index: start_index,
            sample_count: 0,
            distance: 0.0,
            duration_secs: 0.0,
            elevation_gain: 0.0,
            heart_rate_sum: 0,
            heart_rate_count: 0,
        }
    }

    /// Append the sample at `index`.
    ///
    /// The first appended sample only sets the anchor. Later samples add the
    /// distance, duration and positive elevation delta from `preceding`, which
    /// must be the window's current last member. This never finalizes; the
    /// caller checks [`OpenWindow::distance`] against its own threshold.
    pub fn extend<M: TrackMetrics + ?Sized>(
        &mut self,
        index: usize,
        sample: &TrackSample,
        preceding: Option<&TrackSample>,
        metrics: &M,
    ) {
        if self.sample_count == 0 {
            self.start_index = index;
        } else {
            debug_assert_eq!(index, self.end_index + 1, "windows grow contiguously");
            if let Some(prev) = preceding {
                self.distance += metrics.distance(prev, sample);
                self.duration_secs += metrics.duration(prev, sample);
                let climb = metrics.elevation_delta(prev, sample);
                if climb > 0.0 {
                    self.elevation_gain += climb;
                }
            }
        }

        if let Some(hr) = sample.heart_rate {
            self.heart_rate_sum += hr as u64;
            self.heart_rate_count += 1;
        }

        self.end_index = index;
        self.sample_count += 1;
    }

    /// Index of the first member.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Running distance accumulated so far.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    pub fn len(&self) -> usize {
        self.sample_count
    }

    /// Freeze the accumulated stats.
    pub fn finalize(self) -> Window {
        let average_heart_rate = if self.heart_rate_count > 0 {
            Some(self.heart_rate_sum as f64 / self.heart_rate_count as f64)
        } else {
            None
        };

        Window {
            start_index: self.start_index,
            end_index: self.end_index,
            sample_count: self.sample_count,
            distance: self.distance,
            duration_secs: self.duration_secs,
            elevation_gain: self.elevation_gain,
            average_heart_rate,
        }
    }
}

/// A finalized window: an immutable summary of a contiguous run of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Track index of the first member
    pub start_index: usize,
    /// Track index of the last member (inclusive)
    pub end_index: usize,
    /// Number of member samples
    pub sample_count: usize,
    /// Distance covered, in the track's distance unit
    pub distance: f64,
    /// Sum of consecutive sample durations in seconds
    pub duration_secs: f64,
    /// Sum of positive elevation deltas
    pub elevation_gain: f64,
    /// Mean of member heart-rate readings, if any member had one
    pub average_heart_rate: Option<f64>,
}

impl Window {
    /// The member samples of this window within `track`.
    ///
    /// `track` must be the sequence the window was computed from.
    pub fn samples<'a>(&self, track: &'a [TrackSample]) -> &'a [TrackSample] {
        if self.sample_count == 0 {
            return &[];
        }
        &track[self.start_index..=self.end_index]
    }

    /// Average speed in distance units per second.
    pub fn average_speed(&self) -> Option<f64> {
        if self.duration_secs > 0.0 {
            Some(self.distance / self.duration_secs)
        } else {
            None
        }
    }

    /// Pace in seconds per 1000 distance units (min/km * 60 for metres).
    pub fn pace_secs_per_km(&self) -> Option<f64> {
        if self.duration_secs > 0.0 && self.distance > 0.0 {
            Some(self.duration_secs / self.distance * 1000.0)
        } else {
            None
        }
    }

    /// Compare for "fastest" selection: shorter duration first, then earlier start.
    pub fn cmp_fastest(&self, other: &Window) -> Ordering {
        self.duration_secs
            .total_cmp(&other.duration_secs)
            .then_with(|| self.start_index.cmp(&other.start_index))
    }
}
