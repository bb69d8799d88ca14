// Timeline alignment: hourly glucose means plus interpolated event markers
use super::glucose::{
    parse_timestamp, DisplayPoint, Event, HourlyPoint, MgDl, Reading, Sample, TimestampError,
};
use chrono::{DateTime, NaiveDate, Timelike};
use chrono_tz::Tz;
use std::collections::BTreeMap;

pub const DEFAULT_TARGET: MgDl = 100;

/// Value given to events that precede every sample of the day. Not a measured
/// reading, only a placeholder so the marker can still be drawn.
pub const DEFAULT_BASELINE: MgDl = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignOptions {
    /// Zone in which calendar days and hour labels are evaluated.
    pub zone: Tz,
    pub target: MgDl,
    pub baseline: MgDl,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            zone: Tz::UTC,
            target: DEFAULT_TARGET,
            baseline: DEFAULT_BASELINE,
        }
    }
}

/// Build the display timeline for one calendar day.
///
/// Samples are averaged per hour, each medication and then each food event is
/// placed at its own minute with a glucose value interpolated between the
/// surrounding hourly means, and the result is ordered by minute of day.
/// Returns an empty timeline when no sample falls on `date`, even if events do.
pub fn align(
    samples: &[Sample],
    medications: &[Event],
    foods: &[Event],
    date: NaiveDate,
    options: &AlignOptions,
) -> Vec<DisplayPoint> {
    let readings = samples_on(samples, date, options.zone);
    align_readings(&readings, medications, foods, date, options)
}

/// Same as [`align`] for samples already placed on `date` by [`samples_on`].
pub fn align_readings(
    readings: &[Reading],
    medications: &[Event],
    foods: &[Event],
    date: NaiveDate,
    options: &AlignOptions,
) -> Vec<DisplayPoint> {
    let hourly = hourly_points(readings, options.target);
    if hourly.is_empty() {
        return Vec::new();
    }

    let mut points: Vec<DisplayPoint> = hourly.iter().copied().map(DisplayPoint::from).collect();

    for event in medications.iter().chain(foods) {
        let at = match on_date(&event.timestamp, date, options.zone) {
            Ok(Some(at)) => at,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Skipping event: {}", e);
                continue;
            }
        };

        points.push(DisplayPoint {
            hour: at.hour(),
            minute: at.minute(),
            glucose: interpolate(&hourly, at.hour(), at.minute(), options.baseline),
            target: options.target,
            event: Some(event.tag.clone()),
        });
    }

    // Stable: hourly points stay ahead of events sharing their minute.
    points.sort_by_key(DisplayPoint::minute_of_day);

    tracing::debug!("{} hourly points, {} total for {}", hourly.len(), points.len(), date);
    points
}

/// Hourly means of one day's readings, sparse and ordered by hour.
pub fn hourly_points(readings: &[Reading], target: MgDl) -> Vec<HourlyPoint> {
    let mut buckets: BTreeMap<u32, (i64, i64)> = BTreeMap::new();

    for (at, glucose) in readings {
        let bucket = buckets.entry(at.hour()).or_insert((0, 0));
        bucket.0 += i64::from(*glucose);
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(hour, (sum, count))| HourlyPoint {
            hour,
            glucose: (sum as f64 / count as f64).round() as MgDl,
            target,
        })
        .collect()
}

/// Samples that fall on `date`, in feed order, with their parsed local instants.
/// Malformed timestamps are logged and dropped here, once per sample.
pub fn samples_on(samples: &[Sample], date: NaiveDate, zone: Tz) -> Vec<Reading> {
    samples
        .iter()
        .filter_map(|sample| match on_date(&sample.timestamp, date, zone) {
            Ok(Some(at)) => Some((at, sample.glucose)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Skipping sample: {}", e);
                None
            }
        })
        .collect()
}

fn on_date(raw: &str, date: NaiveDate, zone: Tz) -> Result<Option<DateTime<Tz>>, TimestampError> {
    let at = parse_timestamp(raw, zone)?;
    Ok((at.date_naive() == date).then_some(at))
}

fn interpolate(hourly: &[HourlyPoint], hour: u32, minute: u32, baseline: MgDl) -> MgDl {
    let Some(before) = hourly.iter().rev().find(|p| p.hour <= hour) else {
        return baseline;
    };

    // A reading in the event's own hour is used as is.
    if before.hour == hour {
        return before.glucose;
    }

    match hourly.iter().find(|p| p.hour > hour) {
        Some(after) => {
            let span = f64::from(after.hour - before.hour);
            let ratio = (f64::from(hour - before.hour) + f64::from(minute) / 60.0) / span;
            let delta = f64::from(after.glucose - before.glucose);
            (f64::from(before.glucose) + delta * ratio).round() as MgDl
        }
        None => before.glucose,
    }
}
