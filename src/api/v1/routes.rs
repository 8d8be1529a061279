/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /public は素通し、/secret には TokenGate を route 単位で掛ける
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, public::public, secret::secret};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new().route("/secret", get(secret));
    let protected = access::apply(protected, state.gate.clone());

    Router::new()
        .route("/health", get(health))
        .route("/public", get(public))
        .merge(protected)
}
