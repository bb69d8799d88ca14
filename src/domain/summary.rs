// Dashboard summary tiles for a single day
use super::glucose::{MgDl, Reading};
use serde::Serialize;

/// Target range used for time-in-range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub low: MgDl,
    pub high: MgDl,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { low: 70, high: 180 }
    }
}

impl Thresholds {
    pub fn contains(&self, value: MgDl) -> bool {
        value >= self.low && value <= self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GlucoseStatus {
    Low,
    Normal,
    High,
}

impl GlucoseStatus {
    const LOW_BELOW: MgDl = 70;
    const HIGH_ABOVE: MgDl = 140;

    pub fn classify(value: MgDl) -> Self {
        if value > Self::HIGH_ABOVE {
            GlucoseStatus::High
        } else if value < Self::LOW_BELOW {
            GlucoseStatus::Low
        } else {
            GlucoseStatus::Normal
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            GlucoseStatus::High => "Monitor closely",
            GlucoseStatus::Low => "Action needed",
            GlucoseStatus::Normal => "All good",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub current: MgDl,
    pub average: MgDl,
    pub status: GlucoseStatus,
    pub time_in_range_percent: u8,
    pub readings: usize,
}

impl DaySummary {
    /// Summarise one day's readings. `current` is the latest reading by time,
    /// not the last one in feed order.
    pub fn from_readings(
        readings: &[Reading],
        thresholds: Thresholds,
    ) -> Option<Self> {
        let (_, current) = readings.iter().max_by_key(|(at, _)| *at)?;

        let total: i64 = readings.iter().map(|(_, v)| i64::from(*v)).sum();
        let average = (total as f64 / readings.len() as f64).round() as MgDl;

        let in_range = readings
            .iter()
            .filter(|(_, v)| thresholds.contains(*v))
            .count();
        let time_in_range_percent =
            ((in_range as f64 / readings.len() as f64) * 100.0).round() as u8;

        Some(Self {
            current: *current,
            average,
            status: GlucoseStatus::classify(*current),
            time_in_range_percent,
            readings: readings.len(),
        })
    }
}
