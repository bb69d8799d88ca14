// HTTP request handlers
use crate::domain::view_state::MedicationDraft;
use crate::infrastructure::chart_mapper::dashboard_to_body;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub time: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub key: String,
}

impl AppState {
    fn resolve_date(&self, raw: Option<&str>) -> Result<NaiveDate, ApiError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest(format!("date must be YYYY-MM-DD, got {:?}", raw))),
            None => Ok(self.timeline_service.today()),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Chart data for one day
pub async fn get_timeline(
    Path(user_id): Path<String>,
    Query(query): Query<DateQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let date = state.resolve_date(query.date.as_deref())?;

    let dashboard = state
        .timeline_service
        .get_dashboard(&user_id, date)
        .await
        .map_err(ApiError::Upstream)?;

    json_response(&dashboard_to_body(dashboard), accepts_brotli(&headers))
        .await
        .map_err(ApiError::Encoding)
}

/// Stream the dashboard for one day (progressive loading)
pub async fn stream_dashboard(
    Path(user_id): Path<String>,
    Query(query): Query<DateQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let date = state.resolve_date(query.date.as_deref())?;

    let rx = state.streaming_service.stream_dashboard(&user_id, date).await;
    Ok(stream_from_receiver(rx, accepts_brotli(&headers)).await)
}

pub async fn add_medication(
    Path(user_id): Path<String>,
    Query(query): Query<DateQuery>,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<MedicationDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let date = state.resolve_date(query.date.as_deref())?;
    state.record_service.add_medication(&user_id, date, draft).await?;
    Ok(StatusCode::CREATED)
}

pub async fn add_food(
    Path(user_id): Path<String>,
    Query(query): Query<DateQuery>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<FoodRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let date = state.resolve_date(query.date.as_deref())?;
    state
        .record_service
        .add_food(&user_id, date, &request.time, &request.description, request.image_url)
        .await?;
    Ok(StatusCode::CREATED)
}

/// Store a CSV export from a glucose device
pub async fn upload_dataset(
    Path((user_id, file_name)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let key = state
        .record_service
        .upload_dataset(&user_id, &file_name, body)
        .await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { key })))
}

pub async fn chat_greeting(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ChatResponse> {
    Json(ChatResponse {
        reply: state.assistant_service.greet(&user_id),
    })
}

pub async fn chat(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
    }

    let session_id = request.session_id.unwrap_or_else(|| user_id.clone());
    let reply = state.assistant_service.reply(&user_id, &session_id, prompt).await;
    Ok(Json(ChatResponse { reply }))
}
