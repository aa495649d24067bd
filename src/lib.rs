//! # Run Metrics
//!
//! Summary and interval metrics for GPS run tracks.
//!
//! This library provides:
//! - Whole-run totals: distance, duration, elevation gain, heart-rate statistics
//! - Fixed-distance (1 km) splits
//! - Fastest-interval discovery for any target distance (fastest 5K inside a longer run)
//! - Best efforts over standard race distances with a VDOT estimate
//!
//! Parsing GPS files, smoothing and persistence are left to the caller: the
//! input is an already-parsed, time-ordered slice of [`TrackSample`]s.
//!
//! ## Features
//!
//! - **`parallel`** - Compute best efforts for many distances with rayon
//! - **`tokio`** - Future-based fastest-interval discovery on the blocking pool
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use run_metrics::{
//!     aggregate, fastest_interval, GpsPoint, HaversineMetrics, HeartRateConfig,
//!     TargetDistance, TrackSample,
//! };
//!
//! // ~11 m per sample heading north, one sample every 4 seconds
//! let track: Vec<TrackSample> = (0..600)
//!     .map(|i| {
//!         TrackSample::new(GpsPoint::new(51.5 + i as f64 * 0.0001, -0.12), 20.0, i * 4_000)
//!             .with_heart_rate(150)
//!     })
//!     .collect();
//!
//! let summary = aggregate(&track, &HaversineMetrics, &HeartRateConfig::from_max_hr(190).unwrap());
//! println!("{:.2} km in {} splits", summary.total_distance / 1000.0, summary.splits.len());
//!
//! let five_k = TargetDistance::new(5000.0).unwrap();
//! if let Some(best) = fastest_interval(&track, five_k, &HaversineMetrics).fastest() {
//!     println!("Fastest 5K: {:.0}s from sample {}", best.duration_secs, best.start_index);
//! }
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, RunMetricsError};

// Pairwise distance / elevation / duration functions
pub mod metrics;
pub use metrics::{
    haversine_distance, track_distance, HaversineMetrics, PlanarMetrics, TrackMetrics,
};

// Growing and finalized windows
pub mod window;
pub use window::{OpenWindow, Window};

// Fixed-distance splits
pub mod splits;
pub use splits::{fixed_splits, fixed_splits_with_distance, DEFAULT_SPLIT_DISTANCE};

// Fastest-interval discovery
pub mod intervals;
#[cfg(feature = "tokio")]
pub use intervals::fastest_interval_task;
pub use intervals::{
    fastest_interval, fastest_interval_async, fastest_interval_background, find_fastest,
    IntervalHandle, IntervalSet, TargetDistance,
};

// Heart rate zones
pub mod zones;
pub use zones::{
    HeartRateAccumulator, HeartRateConfig, HeartRateZoneDistribution, HeartRateZones,
};

// Whole-run aggregation
pub mod aggregate;
pub use aggregate::{aggregate, aggregate_with, analyze, RunAnalysis, RunSummary};

// Standard distances and VDOT
pub mod races;
pub use races::{estimate_race, vdot, RaceEstimate, StandardDistance};

// Best efforts over many distances
pub mod efforts;
#[cfg(feature = "parallel")]
pub use efforts::best_efforts_parallel;
pub use efforts::{best_efforts, best_efforts_multi, BestEffort, STANDARD_EFFORT_DISTANCES};

// Recency filtering
pub mod recency;
pub use recency::filter_recent;

// Analysis settings
pub mod config;
pub use config::AnalysisConfig;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use run_metrics::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// One observation from a recorded run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub point: GpsPoint,
    /// Elevation in meters
    pub elevation: f64,
    /// Unix timestamp in milliseconds
    pub timestamp_ms: i64,
    /// Heart rate in bpm, if the device recorded one
    pub heart_rate: Option<u8>,
}

impl TrackSample {
    pub fn new(point: GpsPoint, elevation: f64, timestamp_ms: i64) -> Self {
        Self {
            point,
            elevation,
            timestamp_ms,
            heart_rate: None,
        }
    }

    pub fn with_heart_rate(mut self, heart_rate: u8) -> Self {
        self.heart_rate = Some(heart_rate);
        self
    }
}
