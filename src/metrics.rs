//! # Pairwise Sample Metrics
//!
//! Distance, elevation change and elapsed time between two track samples.
//!
//! Every algorithm in this crate is generic over [`TrackMetrics`], so the
//! geometry can be swapped without touching the windowing code.
//!
//! | Implementation | Coordinates | Distance |
//! |----------------|-------------|----------|
//! | [`HaversineMetrics`] | WGS84 degrees | Great-circle metres |
//! | [`PlanarMetrics`] | Projected metres (x = longitude, y = latitude) | Euclidean |
//!
//! ## Example
//!
//! ```rust
//! use run_metrics::{GpsPoint, TrackSample, HaversineMetrics, TrackMetrics};
//!
//! let a = TrackSample::new(GpsPoint::new(51.5074, -0.1278), 10.0, 0);
//! let b = TrackSample::new(GpsPoint::new(51.5080, -0.1290), 12.5, 5_000);
//!
//! let metrics = HaversineMetrics;
//! assert!(metrics.distance(&a, &b) > 90.0);
//! assert_eq!(metrics.elevation_delta(&a, &b), 2.5);
//! assert_eq!(metrics.duration(&a, &b), 5.0);
//! ```

use geo::{Distance, Haversine, Point};

use crate::{GpsPoint, TrackSample};

/// Pairwise metric functions consumed by the windowing algorithms.
///
/// Implementations must be pure. `Send + Sync` is required so a metrics value
/// can move into a background worker.
pub trait TrackMetrics: Send + Sync {
    /// Distance from `a` to `b` in the track's distance unit.
    fn distance(&self, a: &TrackSample, b: &TrackSample) -> f64;

    /// Elevation change from `a` to `b` (positive when climbing).
    fn elevation_delta(&self, a: &TrackSample, b: &TrackSample) -> f64 {
        b.elevation - a.elevation
    }

    /// Elapsed time from `a` to `b` in seconds.
    fn duration(&self, a: &TrackSample, b: &TrackSample) -> f64 {
        (b.timestamp_ms - a.timestamp_ms) as f64 / 1000.0
    }
}

/// Great-circle distances in metres for WGS84 coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMetrics;

impl TrackMetrics for HaversineMetrics {
    #[inline]
    fn distance(&self, a: &TrackSample, b: &TrackSample) -> f64 {
        haversine_distance(&a.point, &b.point)
    }
}

/// Euclidean distances for already-projected coordinates.
///
/// `longitude` is read as x and `latitude` as y, both in the distance unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarMetrics;

impl TrackMetrics for PlanarMetrics {
    #[inline]
    fn distance(&self, a: &TrackSample, b: &TrackSample) -> f64 {
        let dx = b.point.longitude - a.point.longitude;
        let dy = b.point.latitude - a.point.latitude;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Calculate the great-circle distance between two GPS points using the Haversine formula.
///
/// Returns the distance in meters along the Earth's surface (assuming a spherical Earth
/// with radius 6,371 km).
///
/// ```rust
/// use run_metrics::{GpsPoint, metrics};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
///
/// let distance = metrics::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Total distance along a sample sequence.
///
/// Empty or single-sample tracks return 0.0.
pub fn track_distance<M: TrackMetrics + ?Sized>(samples: &[TrackSample], metrics: &M) -> f64 {
    samples
        .windows(2)
        .map(|w| metrics.distance(&w[0], &w[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(lat: f64, lng: f64, elevation: f64, timestamp_ms: i64) -> TrackSample {
        TrackSample::new(GpsPoint::new(lat, lng), elevation, timestamp_ms)
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = GpsPoint::new(0.0, 0.0);
        let b = GpsPoint::new(1.0, 0.0);
        let d = haversine_distance(&a, &b);
        // One degree of latitude is ~111.2 km
        assert!((d - 111_195.0).abs() < 200.0, "got {}", d);
    }

    #[test]
    fn test_planar_distance() {
        let a = sample(0.0, 0.0, 0.0, 0);
        let b = sample(4.0, 3.0, 0.0, 0);
        assert_eq!(PlanarMetrics.distance(&a, &b), 5.0);
    }

    #[test]
    fn test_default_elevation_and_duration() {
        let a = sample(0.0, 0.0, 100.0, 1_000);
        let b = sample(0.0, 0.0, 95.0, 3_500);
        assert_eq!(PlanarMetrics.elevation_delta(&a, &b), -5.0);
        assert_eq!(PlanarMetrics.duration(&a, &b), 2.5);
    }

    #[test]
    fn test_track_distance() {
        let track: Vec<TrackSample> = (0..5)
            .map(|i| sample(0.0, i as f64 * 10.0, 0.0, i * 1000))
            .collect();
        assert_eq!(track_distance(&track, &PlanarMetrics), 40.0);
        assert_eq!(track_distance(&track[..1], &PlanarMetrics), 0.0);
        assert_eq!(track_distance(&[], &PlanarMetrics), 0.0);
    }
}
