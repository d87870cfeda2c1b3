//! Daily forecast aggregation.
//!
//! Turns the provider's 3-hourly forecast steps into one representative entry per
//! calendar day. Day boundaries and hours are evaluated in a single configured
//! timezone, both for the target days and for bucketing samples.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use super::models::DailyForecastEntry;
use crate::models::WeatherSample;

/// Local hour whose sample stands for the whole day
pub const MIDDAY_HOUR: u32 = 13;

/// Day range accepted by the aggregator; routes may narrow it further
pub const MIN_FORECAST_DAYS: i64 = 1;
pub const MAX_FORECAST_DAYS: i64 = 10;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("Invalid number of days: {0}, must be between 1 and 10 inclusive")]
    InvalidDays(i64),

    #[error("Day {offset} after {reference} is outside the supported calendar")]
    DateOutOfRange { reference: NaiveDate, offset: i64 },

    #[error("Could not find the mid-day hourly forecast for day: \"{date}\"")]
    MissingMidday { date: String },

    #[error("Failed to get weather information for the mid-day hourly forecast for day: \"{date}\"")]
    MissingCondition { date: String },
}

/// How the representative sample of a day is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Only the 13:00 sample qualifies; a day without one fails the request
    #[default]
    Midday,
    /// Closest sample to 13:00, the earlier one on ties; a day without samples still fails
    NearestMidday,
}

#[derive(Debug, Clone, Copy)]
pub struct DailyAggregator {
    timezone: Tz,
    policy: SelectionPolicy,
}

impl DailyAggregator {
    pub fn new(timezone: Tz, policy: SelectionPolicy) -> Self {
        Self { timezone, policy }
    }

    /// Build one entry for each of the `days` calendar days following `reference`.
    ///
    /// Samples outside those days are ignored. The result is all-or-nothing: the
    /// first day without a usable sample fails the whole aggregation.
    pub fn aggregate(
        &self,
        samples: &[WeatherSample],
        days: i64,
        reference: DateTime<Utc>,
    ) -> Result<Vec<DailyForecastEntry>, AggregationError> {
        if !(MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(AggregationError::InvalidDays(days));
        }

        let today = reference.with_timezone(&self.timezone).date_naive();

        // BTreeMap keeps the target days in ascending order
        let mut buckets: BTreeMap<NaiveDate, Vec<&WeatherSample>> = BTreeMap::new();
        for offset in 1..=days {
            let day = today
                .checked_add_days(Days::new(offset.unsigned_abs()))
                .ok_or(AggregationError::DateOutOfRange {
                    reference: today,
                    offset,
                })?;
            buckets.insert(day, Vec::new());
        }

        for sample in samples {
            let Some(local_day) = self.local_time(sample).map(|t| t.date_naive()) else {
                tracing::warn!(timestamp = sample.timestamp, "Skipping sample with invalid timestamp");
                continue;
            };
            if let Some(bucket) = buckets.get_mut(&local_day) {
                bucket.push(sample);
            }
        }

        let mut entries = Vec::with_capacity(buckets.len());
        for (day, bucket) in buckets {
            let date = day.format(DATE_KEY_FORMAT).to_string();

            let chosen = self
                .select(&bucket)
                .ok_or_else(|| AggregationError::MissingMidday { date: date.clone() })?;

            let forecast = chosen
                .clone()
                .into_snapshot()
                .ok_or_else(|| AggregationError::MissingCondition { date: date.clone() })?;

            entries.push(DailyForecastEntry { date, forecast });
        }

        tracing::debug!(
            days = days,
            samples = samples.len(),
            entries = entries.len(),
            timezone = %self.timezone,
            "Daily forecast aggregated"
        );

        Ok(entries)
    }

    fn local_time(&self, sample: &WeatherSample) -> Option<DateTime<Tz>> {
        DateTime::from_timestamp(sample.timestamp, 0).map(|t| t.with_timezone(&self.timezone))
    }

    fn local_hour(&self, sample: &WeatherSample) -> Option<u32> {
        self.local_time(sample).map(|t| t.hour())
    }

    /// Pick the representative sample of one day's bucket.
    ///
    /// Ties on the selection key resolve to the earliest timestamp, so input order never matters.
    fn select<'a>(&self, bucket: &[&'a WeatherSample]) -> Option<&'a WeatherSample> {
        match self.policy {
            SelectionPolicy::Midday => bucket
                .iter()
                .copied()
                .filter(|s| self.local_hour(s) == Some(MIDDAY_HOUR))
                .min_by_key(|s| s.timestamp),
            SelectionPolicy::NearestMidday => bucket.iter().copied().min_by_key(|s| {
                let hour = self.local_hour(s).unwrap_or(0);
                (hour.abs_diff(MIDDAY_HOUR), s.timestamp)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherCondition;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn clear() -> WeatherCondition {
        WeatherCondition {
            id: 800,
            main: "Clear".to_string(),
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
        }
    }

    fn sample_at(at: DateTime<Utc>, temperature: f64) -> WeatherSample {
        WeatherSample {
            timestamp: at.timestamp(),
            temperature,
            humidity: 70,
            wind_speed: 2.5,
            wind_direction: 180,
            conditions: vec![clear()],
        }
    }

    /// Upstream-like 3-hour cadence (01:00, 04:00, ... 22:00 UTC) for the given days
    fn three_hourly(start: DateTime<Utc>, days: u32) -> Vec<WeatherSample> {
        (0..days * 8)
            .map(|step| {
                let at = start + chrono::Duration::hours(1 + 3 * step as i64);
                sample_at(at, step as f64)
            })
            .collect()
    }

    fn strict() -> DailyAggregator {
        DailyAggregator::new(chrono_tz::UTC, SelectionPolicy::Midday)
    }

    #[test]
    fn test_single_day_picks_midday_sample() {
        let samples = vec![sample_at(utc(2024, 1, 11, 13), 5.0)];

        let entries = strict()
            .aggregate(&samples, 1, utc(2024, 1, 10, 0))
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, "2024-01-11");
        assert_eq!(entries[0].forecast.temperature, 5.0);
        assert_eq!(entries[0].forecast.condition, clear());
    }

    #[test]
    fn test_full_coverage_returns_every_requested_day_in_order() {
        let samples = three_hourly(utc(2024, 1, 10, 0), 11);

        for days in 1..=10 {
            let entries = strict()
                .aggregate(&samples, days, utc(2024, 1, 10, 9))
                .unwrap();

            assert_eq!(entries.len(), days as usize);
            for (i, entry) in entries.iter().enumerate() {
                let expected = NaiveDate::from_ymd_opt(2024, 1, 11)
                    .unwrap()
                    .checked_add_days(Days::new(i as u64))
                    .unwrap();
                assert_eq!(entry.date, expected.format("%Y-%m-%d").to_string());
                assert_eq!(
                    DateTime::from_timestamp(entry.forecast.timestamp, 0).unwrap().hour(),
                    13
                );
            }
        }
    }

    #[test]
    fn test_samples_outside_window_are_ignored() {
        let mut samples = three_hourly(utc(2024, 1, 9, 0), 6);
        // Today's and far-future midday samples must never show up
        samples.push(sample_at(utc(2024, 1, 10, 13), -99.0));
        samples.push(sample_at(utc(2024, 2, 1, 13), 99.0));

        let entries = strict()
            .aggregate(&samples, 2, utc(2024, 1, 10, 0))
            .unwrap();

        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-11", "2024-01-12"]);
        assert!(entries
            .iter()
            .all(|e| e.forecast.temperature != -99.0 && e.forecast.temperature != 99.0));
    }

    #[test]
    fn test_selection_ignores_input_order() {
        let mut samples = vec![
            sample_at(utc(2024, 1, 11, 10), 1.0),
            sample_at(utc(2024, 1, 11, 13), 2.0),
            sample_at(utc(2024, 1, 11, 16), 3.0),
        ];
        let forward = strict().aggregate(&samples, 1, utc(2024, 1, 10, 0)).unwrap();
        samples.reverse();
        let backward = strict().aggregate(&samples, 1, utc(2024, 1, 10, 0)).unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward[0].forecast.temperature, 2.0);
    }

    #[test]
    fn test_duplicate_midday_samples_resolve_deterministically() {
        let first = sample_at(utc(2024, 1, 11, 13), 4.0);
        let mut late = sample_at(utc(2024, 1, 11, 13), 8.0);
        late.timestamp += 30 * 60;

        let a = strict()
            .aggregate(&[late.clone(), first.clone()], 1, utc(2024, 1, 10, 0))
            .unwrap();
        let b = strict()
            .aggregate(&[first, late], 1, utc(2024, 1, 10, 0))
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(a[0].forecast.temperature, 4.0);
    }

    #[test]
    fn test_missing_midday_names_the_day() {
        let samples = vec![
            sample_at(utc(2024, 1, 11, 13), 5.0),
            sample_at(utc(2024, 1, 12, 10), 6.0),
            sample_at(utc(2024, 1, 12, 16), 7.0),
        ];

        let err = strict()
            .aggregate(&samples, 2, utc(2024, 1, 10, 0))
            .unwrap_err();

        assert_eq!(
            err,
            AggregationError::MissingMidday {
                date: "2024-01-12".to_string()
            }
        );
        assert!(err.to_string().contains("2024-01-12"));
    }

    #[test]
    fn test_empty_samples_fail_on_the_only_day() {
        let err = strict().aggregate(&[], 1, utc(2024, 1, 10, 0)).unwrap_err();

        assert_eq!(
            err,
            AggregationError::MissingMidday {
                date: "2024-01-11".to_string()
            }
        );
    }

    #[test]
    fn test_days_above_limit_rejected() {
        let samples = three_hourly(utc(2024, 1, 10, 0), 12);

        assert_eq!(
            strict().aggregate(&samples, 11, utc(2024, 1, 10, 0)),
            Err(AggregationError::InvalidDays(11))
        );
        assert_eq!(
            strict().aggregate(&samples, i64::MAX, utc(2024, 1, 10, 0)),
            Err(AggregationError::InvalidDays(i64::MAX))
        );
    }

    #[test]
    fn test_target_day_past_calendar_end_fails() {
        let reference = DateTime::<Utc>::MAX_UTC;

        let err = strict().aggregate(&[], 3, reference).unwrap_err();

        assert_eq!(
            err,
            AggregationError::DateOutOfRange {
                reference: reference.date_naive(),
                offset: 1,
            }
        );
    }

    #[test]
    fn test_non_positive_days_rejected() {
        let samples = three_hourly(utc(2024, 1, 10, 0), 3);

        assert_eq!(
            strict().aggregate(&samples, 0, utc(2024, 1, 10, 0)),
            Err(AggregationError::InvalidDays(0))
        );
        assert_eq!(
            strict().aggregate(&samples, -3, utc(2024, 1, 10, 0)),
            Err(AggregationError::InvalidDays(-3))
        );
    }

    #[test]
    fn test_midday_sample_without_condition_fails() {
        let mut bare = sample_at(utc(2024, 1, 11, 13), 5.0);
        bare.conditions.clear();

        let err = strict()
            .aggregate(&[bare], 1, utc(2024, 1, 10, 0))
            .unwrap_err();

        assert_eq!(
            err,
            AggregationError::MissingCondition {
                date: "2024-01-11".to_string()
            }
        );
    }

    #[test]
    fn test_only_first_condition_is_kept() {
        let mut sample = sample_at(utc(2024, 1, 11, 13), 5.0);
        sample.conditions.push(WeatherCondition {
            id: 701,
            main: "Mist".to_string(),
            description: "mist".to_string(),
            icon: "50d".to_string(),
        });

        let entries = strict()
            .aggregate(&[sample], 1, utc(2024, 1, 10, 0))
            .unwrap();

        assert_eq!(entries[0].forecast.condition.id, 800);
    }

    #[test]
    fn test_timezone_applies_to_days_and_hours() {
        // 12:00 UTC is 13:00 in Berlin during winter
        let berlin = DailyAggregator::new(chrono_tz::Europe::Berlin, SelectionPolicy::Midday);
        let samples = vec![
            sample_at(utc(2024, 1, 11, 12), 3.0),
            sample_at(utc(2024, 1, 11, 13), 9.0),
        ];

        // 23:30 UTC on the 10th is already the 11th in Berlin, so tomorrow is the 12th
        let late = utc(2024, 1, 10, 23) + chrono::Duration::minutes(30);
        assert_eq!(
            berlin.aggregate(&samples, 1, late).unwrap_err(),
            AggregationError::MissingMidday {
                date: "2024-01-12".to_string()
            }
        );

        let entries = berlin.aggregate(&samples, 1, utc(2024, 1, 10, 8)).unwrap();
        assert_eq!(entries[0].date, "2024-01-11");
        assert_eq!(entries[0].forecast.temperature, 3.0);
    }

    #[test]
    fn test_nearest_midday_falls_back_to_closest_hour() {
        let nearest = DailyAggregator::new(chrono_tz::UTC, SelectionPolicy::NearestMidday);
        let samples = vec![
            sample_at(utc(2024, 1, 11, 9), 1.0),
            sample_at(utc(2024, 1, 11, 15), 2.0),
            sample_at(utc(2024, 1, 11, 11), 3.0),
        ];

        let entries = nearest.aggregate(&samples, 1, utc(2024, 1, 10, 0)).unwrap();

        // 11:00 and 15:00 are both two hours away; the earlier one wins
        assert_eq!(entries[0].forecast.temperature, 3.0);
    }

    #[test]
    fn test_nearest_midday_still_fails_on_empty_day() {
        let nearest = DailyAggregator::new(chrono_tz::UTC, SelectionPolicy::NearestMidday);

        let err = nearest.aggregate(&[], 2, utc(2024, 1, 10, 0)).unwrap_err();

        assert_eq!(
            err,
            AggregationError::MissingMidday {
                date: "2024-01-11".to_string()
            }
        );
    }

    #[test]
    fn test_selection_policy_deserializes_from_snake_case() {
        let policy: SelectionPolicy = serde_json::from_str("\"nearest_midday\"").unwrap();
        assert_eq!(policy, SelectionPolicy::NearestMidday);
        assert_eq!(SelectionPolicy::default(), SelectionPolicy::Midday);
    }
}
