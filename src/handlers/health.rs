use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{StreamlineError, router::StreamlineState};

/// GET /health -> 200 once the database answers.
pub async fn health_handler(
    State(state): State<StreamlineState>,
) -> Result<Json<Value>, StreamlineError> {
    state.db.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}
