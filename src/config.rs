//! Analysis configuration.
//!
//! Everything that would otherwise come from user settings (max heart rate,
//! zone model, split length, best-effort distances) is carried explicitly in
//! an [`AnalysisConfig`] and can be loaded from JSON.
//!
//! ```rust
//! use run_metrics::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_json(r#"{ "max_heart_rate": 178 }"#).unwrap();
//! assert_eq!(config.split_distance, 1000.0);
//! assert_eq!(config.heart_rate().unwrap().threshold_hr, 178);
//! ```

use serde::{Deserialize, Serialize};

use crate::efforts::STANDARD_EFFORT_DISTANCES;
use crate::error::{Result, RunMetricsError};
use crate::splits::DEFAULT_SPLIT_DISTANCE;
use crate::zones::HeartRateConfig;

/// User-level analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum heart rate in bpm
    pub max_heart_rate: u8,
    /// Zone thresholds as fractions of max HR; standard 5-zone model if absent
    pub zone_thresholds: Option<[f32; 4]>,
    /// Fixed split length in distance units
    pub split_distance: f64,
    /// Target distances for best-effort discovery
    pub effort_distances: Vec<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_heart_rate: HeartRateConfig::default().threshold_hr,
            zone_thresholds: None,
            split_distance: DEFAULT_SPLIT_DISTANCE,
            effort_distances: STANDARD_EFFORT_DISTANCES.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn validate(&self) -> Result<()> {
        self.heart_rate()?;
        if !(self.split_distance.is_finite() && self.split_distance > 0.0) {
            return Err(RunMetricsError::ConfigError {
                message: format!("split distance must be positive, got {}", self.split_distance),
            });
        }
        if let Some(bad) = self
            .effort_distances
            .iter()
            .find(|d| !(d.is_finite() && **d > 0.0))
        {
            return Err(RunMetricsError::ConfigError {
                message: format!("effort distance must be positive, got {}", bad),
            });
        }
        Ok(())
    }

    /// Heart-rate zone configuration derived from these settings.
    pub fn heart_rate(&self) -> Result<HeartRateConfig> {
        match self.zone_thresholds {
            Some(thresholds) => HeartRateConfig::with_thresholds(self.max_heart_rate, thresholds),
            None => HeartRateConfig::from_max_hr(self.max_heart_rate),
        }
    }

}
