/*
 * Responsibility
 * - GET /public (gate なしで常に到達できる)
 */
use axum::{Json, response::IntoResponse};
use serde_json::json;

pub async fn public() -> impl IntoResponse {
    Json(json!({"path": "public"}))
}
