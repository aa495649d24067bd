//! Heart rate zone accumulation.
//!
//! The run aggregator feeds `(heart_rate, dt)` pairs into a
//! [`HeartRateAccumulator`]. [`HeartRateZones`] is the standard implementation:
//! a time-weighted average plus time spent in each of five zones.
//!
//! Zone boundaries come from an explicit [`HeartRateConfig`]; nothing is read
//! from ambient settings.
//!
//! ## Example
//! ```rust
//! use run_metrics::zones::{HeartRateAccumulator, HeartRateConfig, HeartRateZones};
//!
//! let config = HeartRateConfig::from_max_hr(190).unwrap();
//! let mut zones = HeartRateZones::new(config);
//! zones.add_sample(120, 60.0);
//! zones.add_sample(170, 30.0);
//!
//! let distribution = zones.distribution().unwrap();
//! println!("Time in Zone 4: {}%", distribution.get_zone_percent(4));
//! ```

use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};

use crate::error::{OptionExt, Result, RunMetricsError};

/// Consumes heart-rate readings weighted by the time they cover.
pub trait HeartRateAccumulator {
    /// Record `heart_rate` (bpm) held for `dt_secs` seconds.
    fn add_sample(&mut self, heart_rate: u8, dt_secs: f64);

    /// Time-weighted average heart rate, `None` if no time was recorded.
    fn average(&self) -> Option<f64>;
}

/// Configuration for heart rate zone calculation.
/// Zones are defined as percentages of max HR or LTHR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateConfig {
    /// Maximum heart rate or Lactate Threshold HR
    pub threshold_hr: u8,
    /// Zone thresholds as percentages [Z1 max, Z2 max, Z3 max, Z4 max]
    /// Z5 is everything above Z4 max
    pub zone_thresholds: [f32; 4],
}

impl HeartRateConfig {
    /// Create config from max HR using standard 5-zone model
    pub fn from_max_hr(max_hr: u8) -> Result<Self> {
        Self::with_thresholds(max_hr, [0.60, 0.70, 0.80, 0.90])
    }

    /// Create config from LTHR (Lactate Threshold HR)
    pub fn from_lthr(lthr: u8) -> Result<Self> {
        Self::with_thresholds(lthr, [0.81, 0.89, 0.94, 1.00])
    }

    /// Create config with custom thresholds
    pub fn with_thresholds(threshold_hr: u8, thresholds: [f32; 4]) -> Result<Self> {
        let config = Self {
            threshold_hr,
            zone_thresholds: thresholds,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the threshold HR is non-zero and zone thresholds strictly increase.
    pub fn validate(&self) -> Result<()> {
        NonZeroU8::new(self.threshold_hr)
            .ok_or_config("threshold heart rate must be greater than zero")?;
        let increasing = self
            .zone_thresholds
            .windows(2)
            .all(|w| w[0] < w[1]);
        if !increasing || self.zone_thresholds.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(RunMetricsError::ConfigError {
                message: format!(
                    "zone thresholds must be positive and increasing, got {:?}",
                    self.zone_thresholds
                ),
            });
        }
        Ok(())
    }

    /// Determine which zone a HR value falls into (1-5)
    pub fn get_zone(&self, hr: u8) -> u8 {
        for (i, &threshold) in self.zone_thresholds.iter().enumerate() {
            let max_hr = (self.threshold_hr as f32 * threshold) as u8;
            if hr <= max_hr {
                return (i + 1) as u8;
            }
        }
        5 // Above Z4 max is Z5
    }
}

impl Default for HeartRateConfig {
    fn default() -> Self {
        Self {
            threshold_hr: 185, // Reasonable default max HR
            zone_thresholds: [0.60, 0.70, 0.80, 0.90],
        }
    }
}

/// Result of heart rate zone accumulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZoneDistribution {
    /// Total seconds with a heart-rate reading
    pub total_secs: f64,
    /// Seconds in each zone (indexed 0-4 for zones 1-5)
    pub zone_secs: [f64; 5],
    /// Percentage of time in each zone
    pub zone_percentages: [f32; 5],
    /// Time-weighted average heart rate
    pub average_hr: f64,
    /// Peak heart rate
    pub peak_hr: u8,
}

impl HeartRateZoneDistribution {
    /// Get percentage for a specific zone (1-5)
    pub fn get_zone_percent(&self, zone: u8) -> f32 {
        if (1..=5).contains(&zone) {
            self.zone_percentages[(zone - 1) as usize]
        } else {
            0.0
        }
    }
}

/// Time-in-zone accumulator.
#[derive(Debug, Clone)]
pub struct HeartRateZones {
    config: HeartRateConfig,
    zone_secs: [f64; 5],
    weighted_sum: f64,
    total_secs: f64,
    peak_hr: u8,
}

impl HeartRateZones {
    pub fn new(config: HeartRateConfig) -> Self {
        Self {
            config,
            zone_secs: [0.0; 5],
            weighted_sum: 0.0,
            total_secs: 0.0,
            peak_hr: 0,
        }
    }

    /// Zone distribution, `None` if no time was recorded.
    pub fn distribution(&self) -> Option<HeartRateZoneDistribution> {
        let average_hr = self.average()?;

        let mut zone_percentages = [0.0f32; 5];
        for (pct, secs) in zone_percentages.iter_mut().zip(self.zone_secs.iter()) {
            *pct = (secs / self.total_secs * 100.0) as f32;
        }

        Some(HeartRateZoneDistribution {
            total_secs: self.total_secs,
            zone_secs: self.zone_secs,
            zone_percentages,
            average_hr,
            peak_hr: self.peak_hr,
        })
    }
}

impl HeartRateAccumulator for HeartRateZones {
    fn add_sample(&mut self, heart_rate: u8, dt_secs: f64) {
        self.peak_hr = self.peak_hr.max(heart_rate);
        // Non-monotonic timestamps produce negative dt; they carry no weight
        if dt_secs.is_nan() || dt_secs <= 0.0 {
            return;
        }
        let zone = self.config.get_zone(heart_rate);
        self.zone_secs[(zone - 1) as usize] += dt_secs;
        self.weighted_sum += heart_rate as f64 * dt_secs;
        self.total_secs += dt_secs;
    }

    fn average(&self) -> Option<f64> {
        if self.total_secs > 0.0 {
            Some(self.weighted_sum / self.total_secs)
        } else {
            None
        }
    }
}
