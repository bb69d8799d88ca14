// Mapper to convert domain models to the chart's JSON shape
use crate::application::streaming_service::StreamMessage;
use crate::domain::dashboard::Dashboard;
use crate::domain::glucose::{DisplayPoint, EventTag};
use crate::domain::summary::DaySummary;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub time: String,
    pub glucose: i32,
    pub target: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_medication: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_food: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBody {
    pub user_id: String,
    pub title: String,
    pub date: String,
    pub summary: Option<SummaryBody>,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBody {
    #[serde(flatten)]
    pub summary: DaySummary,
    pub advice: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StreamChunk {
    #[serde(rename_all = "camelCase")]
    Skeleton {
        user_id: String,
        date: String,
        widgets: Vec<String>,
    },
    Summary { summary: Option<SummaryBody> },
    Timeline { points: Vec<ChartPoint> },
    Failed { message: String },
    #[serde(rename_all = "camelCase")]
    Complete { widgets: usize, duration_ms: i64 },
}

pub fn to_chart_point(point: &DisplayPoint) -> ChartPoint {
    let mut chart = ChartPoint {
        time: point.time_label(),
        glucose: point.glucose,
        target: point.target,
        has_medication: None,
        medication: None,
        dosage: None,
        has_food: None,
        food_description: None,
        food_image: None,
    };

    match &point.event {
        Some(EventTag::Medication { name, dosage }) => {
            chart.has_medication = Some(true);
            chart.medication = Some(name.clone());
            chart.dosage = Some(dosage.clone());
        }
        Some(EventTag::Food {
            description,
            image_url,
        }) => {
            chart.has_food = Some(true);
            chart.food_description = Some(description.clone());
            chart.food_image = image_url.clone();
        }
        None => {}
    }

    chart
}

fn summary_body(summary: DaySummary) -> SummaryBody {
    SummaryBody {
        advice: summary.status.advice(),
        summary,
    }
}

pub fn dashboard_to_body(dashboard: Dashboard) -> DashboardBody {
    DashboardBody {
        title: dashboard.title(),
        date: dashboard.date.to_string(),
        points: dashboard.points.iter().map(to_chart_point).collect(),
        summary: dashboard.summary.map(summary_body),
        user_id: dashboard.user_id,
    }
}

pub fn message_to_chunk(message: StreamMessage) -> StreamChunk {
    match message {
        StreamMessage::Skeleton {
            user_id,
            date,
            widgets,
        } => StreamChunk::Skeleton {
            user_id,
            date: date.to_string(),
            widgets,
        },
        StreamMessage::Summary(summary) => StreamChunk::Summary {
            summary: summary.map(summary_body),
        },
        StreamMessage::Timeline(points) => StreamChunk::Timeline {
            points: points.iter().map(to_chart_point).collect(),
        },
        StreamMessage::Failed { message } => StreamChunk::Failed { message },
        StreamMessage::Complete {
            widgets,
            duration_ms,
        } => StreamChunk::Complete {
            widgets,
            duration_ms,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::GlucoseStatus;
    use chrono::NaiveDate;
    use serde_json::json;

    fn point(event: Option<EventTag>) -> DisplayPoint {
        DisplayPoint {
            hour: 9,
            minute: 15,
            glucose: 130,
            target: 100,
            event,
        }
    }

    #[test]
    fn test_hourly_point_omits_event_fields() {
        let json = serde_json::to_value(to_chart_point(&point(None))).unwrap();
        assert_eq!(json, json!({"time": "09:15", "glucose": 130, "target": 100}));
    }

    #[test]
    fn test_medication_point() {
        let tag = EventTag::Medication {
            name: "Metformin".into(),
            dosage: "500mg".into(),
        };
        let json = serde_json::to_value(to_chart_point(&point(Some(tag)))).unwrap();
        assert_eq!(json["hasMedication"], true);
        assert_eq!(json["medication"], "Metformin");
        assert_eq!(json["dosage"], "500mg");
        assert!(json.get("hasFood").is_none());
    }

    #[test]
    fn test_food_point() {
        let tag = EventTag::Food {
            description: "Oatmeal".into(),
            image_url: Some("https://img/oat.jpg".into()),
        };
        let json = serde_json::to_value(to_chart_point(&point(Some(tag)))).unwrap();
        assert_eq!(json["hasFood"], true);
        assert_eq!(json["foodDescription"], "Oatmeal");
        assert_eq!(json["foodImage"], "https://img/oat.jpg");
    }

    #[test]
    fn test_dashboard_body() {
        let summary = DaySummary {
            current: 150,
            average: 120,
            status: GlucoseStatus::High,
            time_in_range_percent: 80,
            readings: 10,
        };
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let dashboard = Dashboard::new("demo-user".into(), date, Some(summary), vec![point(None)]);

        let json = serde_json::to_value(dashboard_to_body(dashboard)).unwrap();
        assert_eq!(json["title"], "Glucose Levels - 2025-03-10");
        assert_eq!(json["date"], "2025-03-10");
        assert_eq!(json["summary"]["timeInRangePercent"], 80);
        assert_eq!(json["summary"]["status"], "High");
        assert_eq!(json["summary"]["advice"], "Monitor closely");
        assert_eq!(json["points"][0]["time"], "09:15");
    }

    #[test]
    fn test_stream_chunks_are_tagged() {
        let chunk = message_to_chunk(StreamMessage::Complete {
            widgets: 2,
            duration_ms: 15,
        });
        assert_eq!(
            serde_json::to_value(chunk).unwrap(),
            json!({"type": "complete", "widgets": 2, "durationMs": 15})
        );

        let chunk = message_to_chunk(StreamMessage::Summary(None));
        assert_eq!(
            serde_json::to_value(chunk).unwrap(),
            json!({"type": "summary", "summary": null})
        );

        let chunk = message_to_chunk(StreamMessage::Failed {
            message: "glucose readings are unavailable".into(),
        });
        assert_eq!(
            serde_json::to_value(chunk).unwrap(),
            json!({"type": "failed", "message": "glucose readings are unavailable"})
        );
    }
}
