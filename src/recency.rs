//! Filtering runs by how recently they started.

use chrono::{DateTime, Duration, Utc};

use crate::aggregate::RunSummary;

/// Runs that started within `window` before `now` (inclusive of both ends).
///
/// Runs without a start time, or that start after `now`, are excluded.
pub fn filter_recent<'a>(
    runs: &'a [RunSummary],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<&'a RunSummary> {
    let cutoff = now - window;
    runs.iter()
        .filter(|run| {
            run.started_at
                .map(|start| start >= cutoff && start <= now)
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PlanarMetrics;
    use crate::zones::HeartRateConfig;
    use crate::{aggregate, GpsPoint, TrackSample};

    fn run_at(start: DateTime<Utc>) -> RunSummary {
        let t0 = start.timestamp_millis();
        let samples = vec![
            TrackSample::new(GpsPoint::new(0.0, 0.0), 0.0, t0),
            TrackSample::new(GpsPoint::new(0.0, 100.0), 0.0, t0 + 30_000),
        ];
        aggregate(&samples, &PlanarMetrics, &HeartRateConfig::default())
    }

    #[test]
    fn test_filter_recent() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let runs = vec![
            run_at(now - Duration::days(2)),
            run_at(now - Duration::days(40)),
            run_at(now - Duration::days(30)),
            run_at(now + Duration::days(1)),
        ];

        let recent = filter_recent(&runs, now, Duration::days(30));
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].started_at, Some(now - Duration::days(2)));
        assert_eq!(recent[1].started_at, Some(now - Duration::days(30)));
    }

    #[test]
    fn test_runs_without_start_are_excluded() {
        let empty = aggregate(&[], &PlanarMetrics, &HeartRateConfig::default());
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert!(filter_recent(&[empty], now, Duration::days(365)).is_empty());
    }
}
