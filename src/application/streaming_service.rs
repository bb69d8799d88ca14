// Streaming dashboard service - Progressive loading over a channel
use crate::application::glucose_repository::GlucoseRepository;
use crate::application::timeline_service::or_empty;
use crate::domain::glucose::{DisplayPoint, Event};
use crate::domain::summary::{DaySummary, Thresholds};
use crate::domain::timeline::{align_readings, samples_on, AlignOptions};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const WIDGETS: [&str; 2] = ["summary", "timeline"];

#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    Skeleton {
        user_id: String,
        date: NaiveDate,
        widgets: Vec<String>,
    },
    Summary(Option<DaySummary>),
    Timeline(Vec<DisplayPoint>),
    /// The glucose feed could not be read; no summary or timeline follows.
    Failed {
        message: String,
    },
    /// `widgets` counts the widgets actually delivered.
    Complete {
        widgets: usize,
        duration_ms: i64,
    },
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    repository: Arc<dyn GlucoseRepository>,
    options: AlignOptions,
    thresholds: Thresholds,
}

impl StreamingDashboardService {
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

    /// Sends the skeleton right away, the summary as soon as samples arrive,
    /// the aligned timeline once the event feeds are in, then a completion marker.
    /// A failed glucose feed is reported as `Failed` so it is never mistaken for
    /// an empty day.
    pub async fn stream_dashboard(&self, user_id: &str, date: NaiveDate) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(8);
        let start_time = Instant::now();

        let skeleton = StreamMessage::Skeleton {
            user_id: user_id.to_string(),
            date,
            widgets: WIDGETS.iter().map(|w| w.to_string()).collect(),
        };
        let _ = tx.send(skeleton).await;

        // Event feeds load while samples are fetched.
        let medications = self.spawn_events(user_id, |repo, user| async move {
            repo.list_medications(&user).await
        });
        let foods = self.spawn_events(user_id, |repo, user| async move {
            repo.list_foods(&user).await
        });

        let repo = self.repository.clone();
        let user = user_id.to_string();
        let options = self.options;
        let thresholds = self.thresholds;

        tokio::spawn(async move {
            let samples = match repo.fetch_samples(&user).await {
                Ok(samples) => samples,
                Err(e) => {
                    tracing::error!("Error fetching samples for {}: {:#}", user, e);
                    medications.abort();
                    foods.abort();
                    let failed = StreamMessage::Failed {
                        message: "glucose readings are unavailable".to_string(),
                    };
                    if tx.send(failed).await.is_ok() {
                        let _ = tx.send(complete(0, start_time)).await;
                    }
                    return;
                }
            };

            let readings = samples_on(&samples, date, options.zone);
            let summary = DaySummary::from_readings(&readings, thresholds);
            if tx.send(StreamMessage::Summary(summary)).await.is_err() {
                tracing::debug!("Dashboard stream for {} closed early", user);
                return;
            }

            let medications = join_events(medications, "medications", &user).await;
            let foods = join_events(foods, "foods", &user).await;
            let points = align_readings(&readings, &medications, &foods, date, &options);
            let _ = tx.send(StreamMessage::Timeline(points)).await;

            let _ = tx.send(complete(WIDGETS.len(), start_time)).await;
        });

        rx
    }

    fn spawn_events<F, Fut>(&self, user_id: &str, fetch: F) -> JoinHandle<anyhow::Result<Vec<Event>>>
    where
        F: FnOnce(Arc<dyn GlucoseRepository>, String) -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<Vec<Event>>> + Send + 'static,
    {
        tokio::spawn(fetch(self.repository.clone(), user_id.to_string()))
    }
}

fn complete(widgets: usize, start_time: Instant) -> StreamMessage {
    StreamMessage::Complete {
        widgets,
        duration_ms: start_time.elapsed().as_millis() as i64,
    }
}

async fn join_events(
    handle: JoinHandle<anyhow::Result<Vec<Event>>>,
    what: &str,
    user_id: &str,
) -> Vec<Event> {
    match handle.await {
        Ok(result) => or_empty(result, what, user_id),
        Err(e) => {
            tracing::error!("Task fetching {} for {} failed: {}", what, user_id, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::glucose_repository::fakes::InMemoryRepository;
    use crate::domain::glucose::Sample;
    use std::sync::Mutex;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn service(repo: InMemoryRepository) -> StreamingDashboardService {
        StreamingDashboardService::new(Arc::new(repo), AlignOptions::default(), Thresholds::default())
    }

    async fn collect(mut rx: mpsc::Receiver<StreamMessage>) -> Vec<StreamMessage> {
        let mut messages = Vec::new();
        while let Some(msg) = rx.recv().await {
            messages.push(msg);
        }
        messages
    }

    #[tokio::test]
    async fn test_stream_order() {
        let repo = InMemoryRepository {
            samples: vec![
                Sample::new("2025-03-10T08:00:00Z", 142),
                Sample::new("2025-03-10T10:00:00Z", 118),
            ],
            medications: Mutex::new(vec![Event::medication(
                "2025-03-10T09:00:00Z",
                "Metformin",
                "500mg",
            )]),
            ..Default::default()
        };

        let messages = collect(service(repo).stream_dashboard("demo-user", day()).await).await;
        assert_eq!(messages.len(), 4);
        assert!(matches!(&messages[0], StreamMessage::Skeleton { widgets, .. } if widgets.len() == 2));
        assert!(matches!(&messages[1], StreamMessage::Summary(Some(s)) if s.current == 118));
        match &messages[2] {
            StreamMessage::Timeline(points) => {
                assert_eq!(points.len(), 3);
                assert_eq!(points[1].glucose, 130);
            }
            other => panic!("expected timeline, got {:?}", other),
        }
        assert!(matches!(messages[3], StreamMessage::Complete { widgets: 2, .. }));
    }

    #[tokio::test]
    async fn test_stream_reports_sample_failure() {
        let repo = InMemoryRepository {
            fail_samples: true,
            fail_events: true,
            ..Default::default()
        };
        let messages = collect(service(repo).stream_dashboard("demo-user", day()).await).await;
        assert_eq!(messages.len(), 3);
        assert!(matches!(&messages[1], StreamMessage::Failed { message } if !message.is_empty()));
        assert!(matches!(messages[2], StreamMessage::Complete { widgets: 0, .. }));
    }

    #[tokio::test]
    async fn test_stream_survives_event_failures() {
        let repo = InMemoryRepository {
            samples: vec![Sample::new("2025-03-10T08:00:00Z", 142)],
            fail_events: true,
            ..Default::default()
        };
        let messages = collect(service(repo).stream_dashboard("demo-user", day()).await).await;
        assert_eq!(messages.len(), 4);
        assert!(matches!(&messages[1], StreamMessage::Summary(Some(_))));
        assert!(matches!(&messages[2], StreamMessage::Timeline(points) if points.len() == 1));
        assert!(matches!(messages[3], StreamMessage::Complete { widgets: 2, .. }));
    }

    #[tokio::test]
    async fn test_stream_empty_day() {
        let messages = collect(
            service(InMemoryRepository::default())
                .stream_dashboard("demo-user", day())
                .await,
        )
        .await;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1], StreamMessage::Summary(None));
        assert_eq!(messages[2], StreamMessage::Timeline(Vec::new()));
    }
}
