// Collaborator traits for glucose data, dataset storage and the chat relay
use crate::domain::glucose::{Event, Sample};
use async_trait::async_trait;
use bytes::Bytes;

/// A medication dose to persist, `date` already resolved to an RFC 3339 instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFood {
    pub description: String,
    pub image_url: Option<String>,
    pub date: String,
}

#[async_trait]
pub trait GlucoseRepository: Send + Sync {
    /// All glucose readings known for the user, any order, any day
    async fn fetch_samples(&self, user_id: &str) -> anyhow::Result<Vec<Sample>>;

    async fn list_medications(&self, user_id: &str) -> anyhow::Result<Vec<Event>>;

    async fn list_foods(&self, user_id: &str) -> anyhow::Result<Vec<Event>>;

    async fn add_medication(&self, user_id: &str, medication: NewMedication) -> anyhow::Result<()>;

    async fn add_food(&self, user_id: &str, food: NewFood) -> anyhow::Result<()>;
}

#[async_trait]
pub trait DatasetStore: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AssistantRelay: Send + Sync {
    /// Forward a prompt; the session id lets the relay keep conversation memory
    async fn ask(&self, session_id: &str, prompt: &str) -> anyhow::Result<String>;
}
