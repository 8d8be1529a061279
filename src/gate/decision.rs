use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Outcome of running one request through the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Claims were attached; the request may proceed downstream.
    Admit,
    /// Stop here and answer with the rejection.
    Reject(Rejection),
}

impl Decision {
    pub fn is_admit(&self) -> bool {
        matches!(self, Decision::Admit)
    }
}

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingHeader,
    MissingBearer,
    StrictBearer,
    Expired,
    Invalid,
}

/// Body sent on expiry when the gate is configured to explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiredBody {
    pub error: &'static str,
}

impl ExpiredBody {
    pub const TOKEN_EXPIRED: Self = Self {
        error: "TokenExpiredError",
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: StatusCode,
    pub body: Option<ExpiredBody>,
    pub reason: RejectReason,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}
