// Record service - Use cases for logging medications, meals and device exports
use crate::application::glucose_repository::{DatasetStore, GlucoseRepository, NewFood, NewMedication};
use crate::domain::glucose::localize;
use crate::domain::view_state::MedicationDraft;
use bytes::Bytes;
use chrono::{NaiveDate, NaiveTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use thiserror::Error;

const DATASET_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid time of day: {0:?}")]
    InvalidTime(String),
    #[error("only .csv exports can be uploaded")]
    NotCsv,
    #[error("upload is empty")]
    EmptyUpload,
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct RecordService {
    repository: Arc<dyn GlucoseRepository>,
    store: Arc<dyn DatasetStore>,
    zone: Tz,
}

impl RecordService {
    pub fn new(
        repository: Arc<dyn GlucoseRepository>,
        store: Arc<dyn DatasetStore>,
        zone: Tz,
    ) -> Self {
        Self {
            repository,
            store,
            zone,
        }
    }

    pub async fn add_medication(
        &self,
        user_id: &str,
        date: NaiveDate,
        draft: MedicationDraft,
    ) -> Result<NewMedication, RecordError> {
        if !draft.is_complete() {
            let missing = if draft.name.trim().is_empty() {
                "name"
            } else if draft.dosage.trim().is_empty() {
                "dosage"
            } else {
                "time"
            };
            return Err(RecordError::Missing(missing));
        }

        let medication = NewMedication {
            name: draft.name.trim().to_string(),
            dosage: draft.dosage.trim().to_string(),
            date: self.instant(date, &draft.time)?,
        };
        self.repository
            .add_medication(user_id, medication.clone())
            .await?;

        tracing::info!("Recorded medication {} for {}", medication.name, user_id);
        Ok(medication)
    }

    pub async fn add_food(
        &self,
        user_id: &str,
        date: NaiveDate,
        time: &str,
        description: &str,
        image_url: Option<String>,
    ) -> Result<NewFood, RecordError> {
        if description.trim().is_empty() {
            return Err(RecordError::Missing("description"));
        }

        let food = NewFood {
            description: description.trim().to_string(),
            image_url: image_url.filter(|url| !url.trim().is_empty()),
            date: self.instant(date, time)?,
        };
        self.repository.add_food(user_id, food.clone()).await?;

        tracing::info!("Recorded meal for {} at {}", user_id, food.date);
        Ok(food)
    }

    /// Store a device export under `{user}_{millis}_{file}` and return the key.
    pub async fn upload_dataset(
        &self,
        user_id: &str,
        file_name: &str,
        body: Bytes,
    ) -> Result<String, RecordError> {
        let file_name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
        if !file_name.to_ascii_lowercase().ends_with(".csv") {
            return Err(RecordError::NotCsv);
        }
        if body.is_empty() {
            return Err(RecordError::EmptyUpload);
        }

        let key = format!("{}_{}_{}", user_id, Utc::now().timestamp_millis(), file_name);
        tracing::debug!("Uploading {} bytes to {}", body.len(), key);
        self.store
            .put_object(&key, body, DATASET_CONTENT_TYPE)
            .await?;

        Ok(key)
    }

    fn instant(&self, date: NaiveDate, time: &str) -> Result<String, RecordError> {
        let time = time.trim();
        let parsed = NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|_| RecordError::InvalidTime(time.to_string()))?;

        localize(date.and_time(parsed), self.zone)
            .map(|at| at.fixed_offset().to_rfc3339_opts(SecondsFormat::Secs, false))
            .ok_or_else(|| RecordError::InvalidTime(time.to_string()))
    }
}
