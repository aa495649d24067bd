//! Unified error handling for the run-metrics library.
//!
//! Degenerate inputs are not errors here: an empty or single-sample track
//! yields a zero summary, and a target longer than the track yields an empty
//! interval set. Errors are reserved for invalid parameters and for a
//! background worker that vanished before delivering its result.

use thiserror::Error;

/// Unified error type for run-metrics operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunMetricsError {
    /// Target distance is not a positive, finite number
    #[error("Target distance {distance} must be positive and finite")]
    InvalidTarget { distance: f64 },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Background worker dropped its channel before sending a result
    #[error("Background interval worker disconnected before completing")]
    WorkerDisconnected,
}

/// Result type alias for run-metrics operations.
pub type Result<T> = std::result::Result<T, RunMetricsError>;

/// Extension trait for converting Option to RunMetricsError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a configuration error.
    fn ok_or_config(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_config(self, message: &str) -> Result<T> {
        self.ok_or_else(|| RunMetricsError::ConfigError {
            message: message.to_string(),
        })
    }
}

impl From<serde_json::Error> for RunMetricsError {
    fn from(err: serde_json::Error) -> Self {
        RunMetricsError::ConfigError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RunMetricsError::InvalidTarget { distance: -5.0 };
        assert!(err.to_string().contains("-5"));

        let err = RunMetricsError::ConfigError {
            message: "max heart rate is zero".to_string(),
        };
        assert!(err.to_string().contains("max heart rate"));
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_config("missing field");
        assert!(matches!(result, Err(RunMetricsError::ConfigError { .. })));

        assert_eq!(Some(3).ok_or_config("unused"), Ok(3));
    }

    #[test]
    fn test_json_error_maps_to_config() {
        let err: RunMetricsError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, RunMetricsError::ConfigError { .. }));
    }
}
