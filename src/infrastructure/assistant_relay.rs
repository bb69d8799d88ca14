// HTTP relay to the hosted chat assistant
use crate::application::glucose_repository::AssistantRelay;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct HttpAssistantRelay {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvokeRequest<'a> {
    prompt: &'a str,
    session_id: &'a str,
}

impl HttpAssistantRelay {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

/// The assistant answers either with plain text or with a JSON string.
fn answer_text(body: &str) -> String {
    match serde_json::from_str::<String>(body) {
        Ok(text) => text.trim().to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl AssistantRelay for HttpAssistantRelay {
    async fn ask(&self, session_id: &str, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&InvokeRequest { prompt, session_id })
            .send()
            .await
            .context("Failed to send request to assistant")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Assistant request failed with status {}: {}", status, body);
        }

        let body = response.text().await.context("Failed to read assistant answer")?;
        let answer = answer_text(&body);
        if answer.is_empty() {
            anyhow::bail!("Assistant returned an empty answer");
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_text() {
        assert_eq!(answer_text("\"Stay hydrated.\\n\""), "Stay hydrated.");
        assert_eq!(answer_text("  Plain answer \n"), "Plain answer");
        assert_eq!(answer_text("{\"not\": \"a string\"}"), "{\"not\": \"a string\"}");
    }

    #[test]
    fn test_request_shape() {
        let json = serde_json::to_value(InvokeRequest {
            prompt: "hi",
            session_id: "s-1",
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"prompt": "hi", "sessionId": "s-1"}));
    }
}
