use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::gate::AuthData;
use crate::services::auth::Claims;
use crate::state::AppState;

/// Handler で、gate が付与した claims を受け取るための extractor
/// middleware が AuthData を request.extensions() に insert 済みである前提
/// gate の claims field に値が無ければ 401 を返す（gate 未設定のルートなど）
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let field = state.gate.config().claims_field();

        parts
            .extensions
            .get::<AuthData>()
            .and_then(|auth| auth.get(field))
            .cloned()
            .map(AuthClaims)
            .ok_or(AppError::Unauthorized)
    }
}
