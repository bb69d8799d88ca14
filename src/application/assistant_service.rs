// Assistant service - Chat relay with an offline fallback
use crate::application::glucose_repository::AssistantRelay;
use crate::application::timeline_service::TimelineService;
use crate::domain::assistant::{display_name, greeting, offline_reply, AssistantContext};
use crate::domain::glucose::EventTag;
use std::sync::Arc;

#[derive(Clone)]
pub struct AssistantService {
    relay: Option<Arc<dyn AssistantRelay>>,
    timeline: TimelineService,
}

impl AssistantService {
    pub fn new(relay: Option<Arc<dyn AssistantRelay>>, timeline: TimelineService) -> Self {
        Self { relay, timeline }
    }

    pub fn greet(&self, user_id: &str) -> String {
        greeting(display_name(user_id))
    }

    /// Ask the relay when one is configured; fall back to a canned reply built
    /// from today's dashboard when it is missing or fails.
    pub async fn reply(&self, user_id: &str, session_id: &str, prompt: &str) -> String {
        if let Some(relay) = &self.relay {
            match relay.ask(session_id, prompt).await {
                Ok(answer) => return answer,
                Err(e) => tracing::warn!("Assistant relay failed for {}: {:#}", user_id, e),
            }
        }

        let context = self.context(user_id).await;
        offline_reply(prompt, &context)
    }

    async fn context(&self, user_id: &str) -> AssistantContext {
        let dashboard = match self.timeline.get_dashboard(user_id, self.timeline.today()).await {
            Ok(dashboard) => dashboard,
            Err(e) => {
                tracing::warn!("No dashboard context for {}: {:#}", user_id, e);
                return AssistantContext::default();
            }
        };

        let mut context = AssistantContext::default();
        if let Some(summary) = &dashboard.summary {
            context.current = Some(summary.current);
            context.average = Some(summary.average);
            context.readings = summary.readings;
        }
        for point in &dashboard.points {
            match point.event {
                Some(EventTag::Medication { .. }) => context.medications += 1,
                Some(EventTag::Food { .. }) => context.foods += 1,
                None => {}
            }
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::glucose_repository::fakes::{EchoRelay, InMemoryRepository};
    use crate::domain::glucose::{Event, Sample};
    use crate::domain::summary::Thresholds;
    use crate::domain::timeline::AlignOptions;
    use chrono::{SecondsFormat, Utc};
    use std::sync::Mutex;

    fn timeline() -> TimelineService {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let repo = InMemoryRepository {
            samples: vec![Sample::new(now.clone(), 150)],
            medications: Mutex::new(vec![Event::medication(now, "Metformin", "500mg")]),
            ..Default::default()
        };
        TimelineService::new(Arc::new(repo), AlignOptions::default(), Thresholds::default())
    }

    #[tokio::test]
    async fn test_relay_answer_is_returned() {
        let service = AssistantService::new(Some(Arc::new(EchoRelay { fail: false })), timeline());
        assert_eq!(service.reply("demo-user", "s-1", "hello").await, "[s-1] hello");
    }

    #[tokio::test]
    async fn test_fallback_uses_live_context() {
        let service = AssistantService::new(Some(Arc::new(EchoRelay { fail: true })), timeline());
        let reply = service.reply("demo-user", "s-1", "medication?").await;
        assert!(reply.contains("You have 1 medications recorded"));

        let service = AssistantService::new(None, timeline());
        let reply = service.reply("demo-user", "s-1", "glucose").await;
        assert!(reply.contains("current glucose level is 150 mg/dL"));
    }

    #[test]
    fn test_greet() {
        let service = AssistantService::new(None, timeline());
        assert!(service.greet("jane@example.com").starts_with("Hello jane!"));
    }
}
