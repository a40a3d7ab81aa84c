//! Service and database status endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/status`
pub async fn status(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("timestamp format failed: {e}")))?;
    Ok(Json(json!({
        "status": "online",
        "version": state.api_version,
        "timestamp": timestamp,
    })))
}

/// `GET /api/database/status`
pub async fn database_status(State(state): State<AppState>) -> Response {
    match state.store.status().await {
        Ok(db) => Json(json!({
            "status": "connected",
            "database": db.database,
            "driver": db.driver,
            "server_version": db.server_version,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "database status check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": "Could not connect to the database",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
