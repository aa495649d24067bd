//! Whole-run aggregation.
//!
//! One forward pass over consecutive sample pairs computes total distance,
//! duration, climb and heart-rate statistics, while feeding the same pairs to
//! the fixed split segmenter.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::efforts::{best_efforts, BestEffort};
use crate::error::Result;
use crate::metrics::TrackMetrics;
use crate::splits::{SplitSegmenter, DEFAULT_SPLIT_DISTANCE};
use crate::window::Window;
use crate::zones::{
    HeartRateAccumulator, HeartRateConfig, HeartRateZoneDistribution, HeartRateZones,
};
use crate::TrackSample;

/// Aggregate result of one pass over a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub sample_count: usize,
    /// Timestamp of the first sample
    pub started_at: Option<DateTime<Utc>>,
    /// Sum of pairwise distances
    pub total_distance: f64,
    /// Sum of pairwise durations in seconds
    pub total_duration_secs: f64,
    /// Sum of positive elevation deltas
    pub elevation_gain: f64,
    pub min_heart_rate: Option<u8>,
    pub max_heart_rate: Option<u8>,
    /// Time-weighted average heart rate
    pub average_heart_rate: Option<f64>,
    pub heart_rate_zones: Option<HeartRateZoneDistribution>,
    /// Consecutive fixed-distance splits
    pub splits: Vec<Window>,
}

impl RunSummary {
    /// Average speed in distance units per second.
    pub fn average_speed(&self) -> Option<f64> {
        if self.total_duration_secs > 0.0 {
            Some(self.total_distance / self.total_duration_secs)
        } else {
            None
        }
    }

    /// Pace in seconds per 1000 distance units.
    pub fn pace_secs_per_km(&self) -> Option<f64> {
        if self.total_duration_secs > 0.0 && self.total_distance > 0.0 {
            Some(self.total_duration_secs / self.total_distance * 1000.0)
        } else {
            None
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Aggregate a run using the standard heart-rate zone accumulator.
pub fn aggregate<M: TrackMetrics + ?Sized>(
    samples: &[TrackSample],
    metrics: &M,
    heart_rate_config: &HeartRateConfig,
) -> RunSummary {
    let mut zones = HeartRateZones::new(heart_rate_config.clone());
    let mut summary = aggregate_with(samples, metrics, &mut zones, DEFAULT_SPLIT_DISTANCE);
    summary.heart_rate_zones = zones.distribution();
    summary
}

/// Aggregate a run with a caller-supplied heart-rate accumulator and split length.
///
/// `heart_rate_zones` is left empty; the accumulator is the caller's to inspect.
pub fn aggregate_with<M, A>(
    samples: &[TrackSample],
    metrics: &M,
    accumulator: &mut A,
    split_distance: f64,
) -> RunSummary
where
    M: TrackMetrics + ?Sized,
    A: HeartRateAccumulator + ?Sized,
{
    let mut total_distance = 0.0;
    let mut total_duration_secs = 0.0;
    let mut elevation_gain = 0.0;
    let mut min_hr: Option<u8> = None;
    let mut max_hr: Option<u8> = None;
    let mut segmenter = SplitSegmenter::new(split_distance);

    if let Some(hr) = samples.first().and_then(|s| s.heart_rate) {
        min_hr = Some(hr);
        max_hr = Some(hr);
    }

    for i in 1..samples.len() {
        let prev = &samples[i - 1];
        let curr = &samples[i];

        total_distance += metrics.distance(prev, curr);
        let dt = metrics.duration(prev, curr);
        total_duration_secs += dt;
        let climb = metrics.elevation_delta(prev, curr);
        if climb > 0.0 {
            elevation_gain += climb;
        }

        if let Some(hr) = curr.heart_rate {
            min_hr = Some(min_hr.map_or(hr, |m| m.min(hr)));
            max_hr = Some(max_hr.map_or(hr, |m| m.max(hr)));
            accumulator.add_sample(hr, dt);
        }

        segmenter.push(i, samples, metrics);
    }

    let splits = segmenter.into_splits();

    info!(
        "[Aggregate] {} samples, {:.0} distance over {:.0}s, {} splits",
        samples.len(),
        total_distance,
        total_duration_secs,
        splits.len()
    );

    RunSummary {
        sample_count: samples.len(),
        started_at: samples
            .first()
            .and_then(|s| DateTime::from_timestamp_millis(s.timestamp_ms)),
        total_distance,
        total_duration_secs,
        elevation_gain,
        min_heart_rate: min_hr,
        max_heart_rate: max_hr,
        average_heart_rate: accumulator.average(),
        heart_rate_zones: None,
        splits,
    }
}

/// Summary plus best efforts for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAnalysis {
    pub summary: RunSummary,
    pub best_efforts: Vec<BestEffort>,
}

/// Full analysis of a run driven by `config`.
///
/// Fails only when `config` is invalid.
pub fn analyze<M: TrackMetrics + ?Sized>(
    samples: &[TrackSample],
    metrics: &M,
    config: &AnalysisConfig,
) -> Result<RunAnalysis> {
    config.validate()?;
    let mut zones = HeartRateZones::new(config.heart_rate()?);
    let mut summary = aggregate_with(samples, metrics, &mut zones, config.split_distance);
    summary.heart_rate_zones = zones.distribution();

    let best_efforts = best_efforts(samples, &config.effort_distances, metrics);

    Ok(RunAnalysis {
        summary,
        best_efforts,
    })
}
