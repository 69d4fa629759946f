use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::infra::app_state::AppState;

/// GET /health - Reports whether the metadata store answers.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    let database = state.tracks.store_reachable().await;
    let (status, label) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(json!({
            "status": label,
            "database": database,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
