//! Forecast aggregation: collapse the 3-hourly feed into one representative
//! sample per calendar day.
//!
//! The feed arrives in chronological order and is not re-sorted; only the
//! derived daily buckets are ordered, by actual date value.

use chrono::{Local, NaiveDate, TimeZone, Timelike};

use crate::types::{DailyForecastSummary, ForecastPoint};

/// Maximum number of daily summaries produced from one feed.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Aggregate a forecast feed into daily summaries using the local timezone.
///
/// An empty feed yields an empty list.
pub fn daily_summaries(points: &[ForecastPoint]) -> Vec<DailyForecastSummary> {
    daily_summaries_in(points, &Local)
}

/// Timezone-explicit variant of [`daily_summaries`].
///
/// Points are bucketed by the calendar date they fall on in `tz`, feed order
/// preserved within a bucket. The first [`MAX_FORECAST_DAYS`] distinct dates
/// (ascending) each contribute one summary: the point whose local hour is
/// nearest to noon. Exact ties keep the earlier-encountered point.
pub fn daily_summaries_in<Tz: TimeZone>(
    points: &[ForecastPoint],
    tz: &Tz,
) -> Vec<DailyForecastSummary> {
    let mut buckets: Vec<(NaiveDate, Vec<&ForecastPoint>)> = Vec::new();
    for point in points {
        let date = point.timestamp.with_timezone(tz).date_naive();
        match buckets.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(point),
            None => buckets.push((date, vec![point])),
        }
    }

    buckets.sort_by_key(|(date, _)| *date);
    buckets.truncate(MAX_FORECAST_DAYS);

    buckets
        .into_iter()
        .filter_map(|(date, bucket)| {
            let mut candidates = bucket.into_iter();
            let mut best = candidates.next()?;
            let mut best_distance = noon_distance(best, tz);
            for point in candidates {
                let distance = noon_distance(point, tz);
                // Strict `<`: the first point encountered wins exact ties.
                if distance < best_distance {
                    best = point;
                    best_distance = distance;
                }
            }
            Some(DailyForecastSummary { date, representative: best.clone() })
        })
        .collect()
}

fn noon_distance<Tz: TimeZone>(point: &ForecastPoint, tz: &Tz) -> i64 {
    let hour = i64::from(point.timestamp.with_timezone(tz).hour());
    (hour - 12).abs()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::types::WeatherCondition;
    use chrono::{Datelike, FixedOffset, Utc};

    fn condition(description: &str) -> WeatherCondition {
        WeatherCondition {
            code: 800,
            description: description.to_string(),
            icon: "01d".to_string(),
        }
    }

    fn point(y: i32, m: u32, d: u32, hour: u32, temp: f64) -> ForecastPoint {
        ForecastPoint {
            timestamp: Utc.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap(),
            temperature: temp,
            condition: condition("clear sky"),
        }
    }

    #[test]
    fn test_empty_feed_yields_no_summaries() {
        assert!(daily_summaries_in(&[], &Utc).is_empty());
    }

    #[test]
    fn test_single_point_is_its_own_representative() {
        let points = vec![point(2026, 8, 7, 21, 18.0)];
        let summaries = daily_summaries_in(&points, &Utc);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].representative, points[0]);
    }

    #[test]
    fn test_three_hourly_day_picks_noon() {
        let points: Vec<_> =
            (0..8).map(|i| point(2026, 8, 7, i * 3, f64::from(i))).collect();
        let summaries = daily_summaries_in(&points, &Utc);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].representative.timestamp.hour(), 12);
    }

    #[test]
    fn test_seven_days_truncated_to_five_ascending() {
        let points: Vec<_> = (1..=7).map(|d| point(2026, 8, d, 12, 20.0)).collect();
        let summaries = daily_summaries_in(&points, &Utc);
        assert_eq!(summaries.len(), MAX_FORECAST_DAYS);
        let dates: Vec<_> = summaries.iter().map(|s| s.date.day()).collect();
        assert_eq!(dates, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_tie_at_equal_distance_keeps_first_encountered() {
        // Hours 9 and 15 are both 3 from noon; whichever arrives first wins.
        let morning_first = vec![point(2026, 8, 7, 9, 10.0), point(2026, 8, 7, 15, 20.0)];
        let summaries = daily_summaries_in(&morning_first, &Utc);
        assert_eq!(summaries[0].representative.timestamp.hour(), 9);

        let afternoon_first = vec![point(2026, 8, 7, 15, 20.0), point(2026, 8, 7, 9, 10.0)];
        let summaries = daily_summaries_in(&afternoon_first, &Utc);
        assert_eq!(summaries[0].representative.timestamp.hour(), 15);
    }

    #[test]
    fn test_dates_sort_by_value_across_month_boundary() {
        // String ordering would put "Oct" before "Sep"; date values must win.
        let points = vec![
            point(2026, 9, 29, 12, 14.0),
            point(2026, 9, 30, 12, 15.0),
            point(2026, 10, 1, 12, 16.0),
            point(2026, 10, 2, 12, 17.0),
        ];
        let summaries = daily_summaries_in(&points, &Utc);
        let temps: Vec<_> = summaries.iter().map(|s| s.representative.temperature).collect();
        assert_eq!(temps, vec![14.0, 15.0, 16.0, 17.0]);
    }

    #[test]
    fn test_bucketing_follows_requested_timezone() {
        // 23:00 UTC on the 7th is already the 8th at UTC+2.
        let points = vec![point(2026, 8, 7, 23, 12.0)];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let summaries = daily_summaries_in(&points, &plus_two);
        assert_eq!(summaries[0].date.day(), 8);
    }
}
