//! Standard race distances and the VDOT fitness index.
//!
//! [`StandardDistance::nearest`] maps a measured distance to the closest common
//! race length. [`vdot`] applies the Daniels/Gilbert oxygen-cost and
//! time-to-exhaustion equations to a race distance and finishing time.

use serde::{Deserialize, Serialize};

use crate::window::Window;

/// Common race distances, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardDistance {
    Meters400,
    Kilometer,
    Mile,
    FiveK,
    TenK,
    HalfMarathon,
    Marathon,
}

impl StandardDistance {
    /// All standard distances, shortest first.
    pub const ALL: [StandardDistance; 7] = [
        StandardDistance::Meters400,
        StandardDistance::Kilometer,
        StandardDistance::Mile,
        StandardDistance::FiveK,
        StandardDistance::TenK,
        StandardDistance::HalfMarathon,
        StandardDistance::Marathon,
    ];

    pub fn meters(self) -> f64 {
        match self {
            StandardDistance::Meters400 => 400.0,
            StandardDistance::Kilometer => 1000.0,
            StandardDistance::Mile => 1609.34,
            StandardDistance::FiveK => 5000.0,
            StandardDistance::TenK => 10000.0,
            StandardDistance::HalfMarathon => 21097.5,
            StandardDistance::Marathon => 42195.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StandardDistance::Meters400 => "400m",
            StandardDistance::Kilometer => "1K",
            StandardDistance::Mile => "Mile",
            StandardDistance::FiveK => "5K",
            StandardDistance::TenK => "10K",
            StandardDistance::HalfMarathon => "Half Marathon",
            StandardDistance::Marathon => "Marathon",
        }
    }

    /// The standard distance closest to `distance_m`.
    ///
    /// Returns `None` for non-positive or non-finite input.
    pub fn nearest(distance_m: f64) -> Option<StandardDistance> {
        if !distance_m.is_finite() || distance_m <= 0.0 {
            return None;
        }
        Self::ALL.into_iter().min_by(|a, b| {
            let da = (a.meters() - distance_m).abs();
            let db = (b.meters() - distance_m).abs();
            da.total_cmp(&db)
        })
    }
}

/// VDOT for a race of `distance_m` metres finished in `duration_secs` seconds.
///
/// Returns `None` when either input is non-positive or the result is not finite.
pub fn vdot(distance_m: f64, duration_secs: f64) -> Option<f64> {
    if distance_m <= 0.0 || duration_secs <= 0.0 {
        return None;
    }
    let minutes = duration_secs / 60.0;
    let velocity = distance_m / minutes; // m/min

    let oxygen_cost = -4.60 + 0.182258 * velocity + 0.000104 * velocity * velocity;
    let fraction_of_max = 0.8
        + 0.1894393 * (-0.012778 * minutes).exp()
        + 0.2989558 * (-0.1932605 * minutes).exp();

    let value = oxygen_cost / fraction_of_max;
    value.is_finite().then_some(value)
}

/// A window's duration read as a race result at its nearest standard distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceEstimate {
    pub standard: StandardDistance,
    pub duration_secs: f64,
    pub vdot: Option<f64>,
}

/// Treat a finished window as a race over the nearest standard distance.
pub fn estimate_race(window: &Window) -> Option<RaceEstimate> {
    let standard = StandardDistance::nearest(window.distance)?;
    Some(RaceEstimate {
        standard,
        duration_secs: window.duration_secs,
        vdot: vdot(standard.meters(), window.duration_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_standard_distance() {
        assert_eq!(StandardDistance::nearest(5020.0), Some(StandardDistance::FiveK));
        assert_eq!(StandardDistance::nearest(1500.0), Some(StandardDistance::Mile));
        assert_eq!(StandardDistance::nearest(120.0), Some(StandardDistance::Meters400));
        assert_eq!(StandardDistance::nearest(60_000.0), Some(StandardDistance::Marathon));
        assert_eq!(StandardDistance::nearest(0.0), None);
        assert_eq!(StandardDistance::nearest(f64::NAN), None);
    }

    #[test]
    fn test_vdot_reference_values() {
        // Published tables: 5K in 20:00 is VDOT ~49.8, marathon in 3:00:00 ~53.5
        let five_k = vdot(5000.0, 20.0 * 60.0).unwrap();
        assert!((five_k - 49.8).abs() < 0.3, "got {}", five_k);

        let marathon = vdot(42195.0, 3.0 * 3600.0).unwrap();
        assert!((marathon - 53.5).abs() < 0.5, "got {}", marathon);
    }

    #[test]
    fn test_vdot_guards() {
        assert_eq!(vdot(5000.0, 0.0), None);
        assert_eq!(vdot(0.0, 1200.0), None);
    }

    #[test]
    fn test_estimate_race_uses_standard_distance() {
        let window = Window {
            start_index: 3,
            end_index: 400,
            sample_count: 398,
            distance: 5003.0,
            duration_secs: 1200.0,
            elevation_gain: 0.0,
            average_heart_rate: None,
        };
        let estimate = estimate_race(&window).unwrap();
        assert_eq!(estimate.standard, StandardDistance::FiveK);
        assert_eq!(estimate.vdot, vdot(5000.0, 1200.0));
    }
}
