// Dashboard domain model
use super::glucose::DisplayPoint;
use super::summary::DaySummary;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub user_id: String,
    pub date: NaiveDate,
    pub summary: Option<DaySummary>,
    pub points: Vec<DisplayPoint>,
}

impl Dashboard {
    pub fn new(
        user_id: String,
        date: NaiveDate,
        summary: Option<DaySummary>,
        points: Vec<DisplayPoint>,
    ) -> Self {
        Self {
            user_id,
            date,
            summary,
            points,
        }
    }

    pub fn title(&self) -> String {
        format!("Glucose Levels - {}", self.date.format("%Y-%m-%d"))
    }

    /// The chart has nothing to draw for this date.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
