// Router assembly
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_food, add_medication, chat, chat_greeting, get_timeline, health_check, stream_dashboard,
    upload_dataset,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    // Compression is handled in the response builders, so no CompressionLayer here
    Router::new()
        .route("/healthz", get(health_check))
        .route("/users/:user/timeline", get(get_timeline))
        .route("/users/:user/dashboard/stream", get(stream_dashboard))
        .route("/users/:user/medications", post(add_medication))
        .route("/users/:user/foods", post(add_food))
        .route("/users/:user/datasets/:file_name", put(upload_dataset))
        .route("/users/:user/chat", get(chat_greeting).post(chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
