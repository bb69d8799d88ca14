// Timeline service - Use case for building a day's dashboard
use crate::application::glucose_repository::GlucoseRepository;
use crate::domain::dashboard::Dashboard;
use crate::domain::glucose::Event;
use crate::domain::summary::{DaySummary, Thresholds};
use crate::domain::timeline::{align_readings, samples_on, AlignOptions};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct TimelineService {
    repository: Arc<dyn GlucoseRepository>,
    options: AlignOptions,
    thresholds: Thresholds,
}

impl TimelineService {
    pub fn new(
        repository: Arc<dyn GlucoseRepository>,
        options: AlignOptions,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            repository,
            options,
            thresholds,
        }
    }

    /// Today's date in the display time zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.options.zone).date_naive()
    }

    pub async fn get_dashboard(&self, user_id: &str, date: NaiveDate) -> anyhow::Result<Dashboard> {
        let (samples, medications, foods) = tokio::join!(
            self.repository.fetch_samples(user_id),
            self.repository.list_medications(user_id),
            self.repository.list_foods(user_id),
        );

        let samples = samples.with_context(|| format!("Failed to fetch samples for {}", user_id))?;
        let medications = or_empty(medications, "medications", user_id);
        let foods = or_empty(foods, "foods", user_id);

        tracing::debug!(
            "Aligning {} samples, {} medications, {} foods for {} on {}",
            samples.len(),
            medications.len(),
            foods.len(),
            user_id,
            date
        );

        let readings = samples_on(&samples, date, self.options.zone);
        let summary = DaySummary::from_readings(&readings, self.thresholds);
        let points = align_readings(&readings, &medications, &foods, date, &self.options);

        let dashboard = Dashboard::new(user_id.to_string(), date, summary, points);
        if dashboard.is_empty() {
            tracing::info!("No readings for {} on {}", user_id, date);
        }
        Ok(dashboard)
    }
}

/// Events only decorate the chart, so a failed event feed leaves it undecorated.
pub(crate) fn or_empty(result: anyhow::Result<Vec<Event>>, what: &str, user_id: &str) -> Vec<Event> {
    result.unwrap_or_else(|e| {
        tracing::error!("Error fetching {} for {}: {:#}", what, user_id, e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::glucose_repository::fakes::InMemoryRepository;
    use crate::domain::glucose::Sample;
    use crate::domain::summary::GlucoseStatus;
    use chrono_tz::Europe::Berlin;
    use std::sync::Mutex;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn repository() -> InMemoryRepository {
        InMemoryRepository {
            samples: vec![
                Sample::new("2025-03-10T08:00:00Z", 142),
                Sample::new("2025-03-10T10:00:00Z", 118),
                Sample::new("2025-03-11T10:00:00Z", 300),
            ],
            medications: Mutex::new(vec![Event::medication(
                "2025-03-10T09:00:00Z",
                "Metformin",
                "500mg",
            )]),
            foods: Mutex::new(vec![Event::food("2025-03-10T09:30:00Z", "Oatmeal", None)]),
            ..Default::default()
        }
    }

    fn service(repo: InMemoryRepository) -> TimelineService {
        TimelineService::new(Arc::new(repo), AlignOptions::default(), Thresholds::default())
    }

    #[tokio::test]
    async fn test_get_dashboard() {
        let dashboard = service(repository()).get_dashboard("demo-user", day()).await.unwrap();

        assert_eq!(dashboard.user_id, "demo-user");
        assert_eq!(dashboard.points.len(), 4);
        assert_eq!(dashboard.points[1].glucose, 130);

        let summary = dashboard.summary.unwrap();
        assert_eq!(summary.current, 118);
        assert_eq!(summary.average, 130);
        assert_eq!(summary.status, GlucoseStatus::Normal);
        assert_eq!(summary.readings, 2);
    }

    #[tokio::test]
    async fn test_event_failures_degrade() {
        let repo = InMemoryRepository {
            fail_events: true,
            ..repository()
        };
        let dashboard = service(repo).get_dashboard("demo-user", day()).await.unwrap();
        assert_eq!(dashboard.points.len(), 2);
        assert!(dashboard.points.iter().all(|p| p.event.is_none()));
    }

    #[tokio::test]
    async fn test_sample_failure_is_an_error() {
        let repo = InMemoryRepository {
            fail_samples: true,
            ..repository()
        };
        assert!(service(repo).get_dashboard("demo-user", day()).await.is_err());
    }

    #[tokio::test]
    async fn test_day_without_data() {
        let other_day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let dashboard = service(repository()).get_dashboard("demo-user", other_day).await.unwrap();
        assert!(dashboard.is_empty());
        assert!(dashboard.summary.is_none());
    }

    #[tokio::test]
    async fn test_summer_day_in_configured_zone() {
        let repo = InMemoryRepository {
            samples: vec![
                Sample::new("2025-07-10T06:00:00Z", 110),
                Sample::new("2025-07-10T22:30:00Z", 150),
                Sample::new("not a time", 999),
            ],
            ..Default::default()
        };
        let options = AlignOptions {
            zone: Berlin,
            ..AlignOptions::default()
        };
        let service = TimelineService::new(Arc::new(repo), options, Thresholds::default());

        let tenth = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        let dashboard = service.get_dashboard("demo-user", tenth).await.unwrap();
        assert_eq!(dashboard.points.len(), 1);
        assert_eq!(dashboard.points[0].time_label(), "08:00");
        assert_eq!(dashboard.summary.unwrap().readings, 1);

        let eleventh = NaiveDate::from_ymd_opt(2025, 7, 11).unwrap();
        let dashboard = service.get_dashboard("demo-user", eleventh).await.unwrap();
        assert_eq!(dashboard.points[0].time_label(), "00:00");
        assert_eq!(dashboard.summary.unwrap().current, 150);
    }
}
