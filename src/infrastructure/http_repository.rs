// REST repository for glucose readings, medications and meals
use crate::application::glucose_repository::{GlucoseRepository, NewFood, NewMedication};
use crate::domain::glucose::{Event, Sample};
use crate::infrastructure::config::{expand_template, EndpointSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HttpGlucoseRepository {
    client: reqwest::Client,
    endpoints: EndpointSettings,
}

/// Every endpoint wraps its rows as `{"data": [...]}`.
#[derive(Debug, Deserialize)]
struct DataResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SampleRecord {
    time: String,
    glucose: f64,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct MedicationRecord {
    date: String,
    medication_name: String,
    dosage: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct FoodRecord {
    date: String,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddRequest<'a, T> {
    user_id: &'a str,
    #[serde(flatten)]
    record: T,
}

impl From<SampleRecord> for Sample {
    fn from(record: SampleRecord) -> Self {
        Sample::from_reading(record.time, record.glucose)
    }
}

impl From<MedicationRecord> for Event {
    fn from(record: MedicationRecord) -> Self {
        Event::medication(record.date, record.medication_name, record.dosage)
    }
}

impl From<FoodRecord> for Event {
    fn from(record: FoodRecord) -> Self {
        Event::food(record.date, record.description, record.image_url)
    }
}

impl HttpGlucoseRepository {
    pub fn new(client: reqwest::Client, endpoints: EndpointSettings) -> Self {
        Self { client, endpoints }
    }

    fn user_url(template: &str, user_id: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("user".to_string(), user_id.to_string());
        expand_template(template, &vars)
    }

    async fn get_rows<T: DeserializeOwned>(&self, template: &str, user_id: &str) -> Result<Vec<T>> {
        let url = Self::user_url(template, user_id);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed with status {}: {}", url, status, body);
        }

        let body = response.text().await.context("Failed to read response body")?;
        let rows = parse_rows::<T>(&body).with_context(|| format!("Failed to parse response from {}", url))?;

        tracing::debug!("Fetched {} rows from {}", rows.len(), url);
        Ok(rows)
    }

    async fn post_row<T: Serialize + Send + Sync>(&self, template: &str, user_id: &str, record: T) -> Result<()> {
        let url = Self::user_url(template, user_id);
        let request = AddRequest { user_id, record };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("POST {} failed with status {}: {}", url, status, body);
        }

        Ok(())
    }
}

fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let parsed: DataResponse<T> = serde_json::from_str(body)?;
    Ok(parsed.data)
}

#[async_trait]
impl GlucoseRepository for HttpGlucoseRepository {
    async fn fetch_samples(&self, user_id: &str) -> Result<Vec<Sample>> {
        let rows: Vec<SampleRecord> = self.get_rows(&self.endpoints.data_url, user_id).await?;
        Ok(rows.into_iter().map(Sample::from).collect())
    }

    async fn list_medications(&self, user_id: &str) -> Result<Vec<Event>> {
        let rows: Vec<MedicationRecord> = self.get_rows(&self.endpoints.medications_url, user_id).await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_foods(&self, user_id: &str) -> Result<Vec<Event>> {
        let rows: Vec<FoodRecord> = self.get_rows(&self.endpoints.foods_url, user_id).await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn add_medication(&self, user_id: &str, medication: NewMedication) -> Result<()> {
        let record = MedicationRecord {
            date: medication.date,
            medication_name: medication.name,
            dosage: medication.dosage,
        };
        self.post_row(&self.endpoints.medications_url, user_id, record).await
    }

    async fn add_food(&self, user_id: &str, food: NewFood) -> Result<()> {
        let record = FoodRecord {
            date: food.date,
            description: food.description,
            image_url: food.image_url,
        };
        self.post_row(&self.endpoints.foods_url, user_id, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::glucose::EventTag;

    #[test]
    fn test_parse_samples() {
        let body = r#"{"data": [
            {"time": "2025-03-10T08:05:00Z", "glucose": 140.4},
            {"time": "2025-03-10T08:40:00Z", "glucose": 144}
        ]}"#;
        let samples: Vec<Sample> = parse_rows::<SampleRecord>(body)
            .unwrap()
            .into_iter()
            .map(Sample::from)
            .collect();
        assert_eq!(samples[0], Sample::new("2025-03-10T08:05:00Z", 140));
        assert_eq!(samples[1].glucose, 144);
    }

    #[test]
    fn test_parse_events() {
        let body = r#"{"data": [{"date": "2025-03-10T09:00:00Z", "medicationName": "Metformin", "dosage": "500mg"}]}"#;
        let meds: Vec<MedicationRecord> = parse_rows(body).unwrap();
        let event = Event::from(meds.into_iter().next().unwrap());
        assert_eq!(
            event.tag,
            EventTag::Medication {
                name: "Metformin".into(),
                dosage: "500mg".into()
            }
        );

        let body = r#"{"data": [{"date": "2025-03-10T12:00:00Z", "description": "Pasta"}]}"#;
        let foods: Vec<FoodRecord> = parse_rows(body).unwrap();
        assert_eq!(foods[0].image_url, None);
    }

    #[test]
    fn test_missing_data_is_empty() {
        let rows: Vec<SampleRecord> = parse_rows("{}").unwrap();
        assert!(rows.is_empty());
        assert!(parse_rows::<SampleRecord>("<html>").is_err());
    }

    #[test]
    fn test_add_request_shape() {
        let request = AddRequest {
            user_id: "demo-user",
            record: MedicationRecord {
                date: "2025-03-10T09:00:00+01:00".into(),
                medication_name: "Metformin".into(),
                dosage: "500mg".into(),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["userId"], "demo-user");
        assert_eq!(json["medicationName"], "Metformin");
        assert_eq!(json["date"], "2025-03-10T09:00:00+01:00");
    }

    #[test]
    fn test_user_url() {
        let url = HttpGlucoseRepository::user_url("http://x/data?userId=${user}", "a b");
        assert_eq!(url, "http://x/data?userId=a%20b");
    }
}
