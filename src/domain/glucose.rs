// Glucose readings and the events plotted against them
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// Glucose value in mg/dL as drawn on the chart.
pub type MgDl = i32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("malformed timestamp: {0:?}")]
    Malformed(String),
    #[error("timestamp {0:?} does not exist in the display time zone")]
    Unrepresentable(String),
}

/// A sample placed on the local clock.
pub type Reading = (DateTime<Tz>, MgDl);

/// One reading from the glucose feed, timestamp kept as received.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: String,
    pub glucose: MgDl,
}

impl Sample {
    pub fn new(timestamp: impl Into<String>, glucose: MgDl) -> Self {
        Self {
            timestamp: timestamp.into(),
            glucose,
        }
    }

    /// The feed reports glucose as a JSON number; the chart works in whole mg/dL.
    pub fn from_reading(timestamp: impl Into<String>, glucose: f64) -> Self {
        Self::new(timestamp, glucose.round() as MgDl)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTag {
    Medication { name: String, dosage: String },
    Food { description: String, image_url: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub timestamp: String,
    pub tag: EventTag,
}

impl Event {
    pub fn medication(
        timestamp: impl Into<String>,
        name: impl Into<String>,
        dosage: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            tag: EventTag::Medication {
                name: name.into(),
                dosage: dosage.into(),
            },
        }
    }

    pub fn food(
        timestamp: impl Into<String>,
        description: impl Into<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            tag: EventTag::Food {
                description: description.into(),
                image_url,
            },
        }
    }
}

/// Mean of all samples within one hour of the selected day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyPoint {
    pub hour: u32,
    pub glucose: MgDl,
    pub target: MgDl,
}

/// A point on the display timeline: either an hourly mean or an event marker
/// carrying an interpolated glucose value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPoint {
    pub hour: u32,
    pub minute: u32,
    pub glucose: MgDl,
    pub target: MgDl,
    pub event: Option<EventTag>,
}

impl DisplayPoint {
    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    pub fn minute_of_day(&self) -> u32 {
        self.hour * 60 + self.minute
    }
}

impl From<HourlyPoint> for DisplayPoint {
    fn from(point: HourlyPoint) -> Self {
        Self {
            hour: point.hour,
            minute: 0,
            glucose: point.glucose,
            target: point.target,
            event: None,
        }
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Place a wall-clock time in `zone`.
///
/// A time repeated by a fall-back transition takes its earlier instant. A time
/// skipped by a spring-forward jump is read with the offset in force before
/// the jump, so it lands just past the gap.
pub fn localize(naive: NaiveDateTime, zone: Tz) -> Option<DateTime<Tz>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(at) => Some(at),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => zone
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

/// Parse a feed timestamp into the display time zone.
///
/// RFC 3339 values keep their instant and are shifted into `zone`. Values
/// without an offset are read as wall-clock time in `zone`, the way a browser
/// reads a bare ISO date-time as local time.
pub fn parse_timestamp(raw: &str, zone: Tz) -> Result<DateTime<Tz>, TimestampError> {
    let trimmed = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&zone));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return localize(naive, zone)
                .ok_or_else(|| TimestampError::Unrepresentable(raw.to_string()));
        }
    }

    Err(TimestampError::Malformed(raw.to_string()))
}
