/*
 * Responsibility
 * - GET /secret (gate 通過後のみ到達)
 * - claims を gate の claims field 名のまま返す
 */
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Map, Value};

use crate::api::v1::extractors::AuthClaims;
use crate::state::AppState;

pub async fn secret(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> impl IntoResponse {
    let mut body = Map::new();
    body.insert("path".into(), Value::from("secret"));
    body.insert(state.gate.config().claims_field().to_owned(), claims);

    Json(Value::Object(body))
}
