use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;

use super::config::{GateConfig, GateOptions};
use super::context::AuthData;
use super::decision::{Decision, ExpiredBody, RejectReason, Rejection};
use crate::error::GateConfigError;
use crate::services::auth::{HmacVerifier, TokenVerifier, VerificationOutcome};

const BEARER_PREFIX: &str = "Bearer";

/// Log lines emitted by the gate, one per request.
pub mod messages {
    pub const MISSING_HEADER: &str = "Authorization header was not sent. Denying request.";
    pub const MISSING_BEARER: &str = "Bearer token was not sent. Denying request.";
    pub const STRICT_BEARER: &str = "Strict Bearer validation failed. Denying request.";
    pub const EXPIRED: &str = "Expired bearer token was sent. Denying request.";
    pub const INVALID: &str = "Invalid bearer token was sent. Denying request.";
    pub const VERIFIED: &str = "Token verification successful";
}

/// Reusable bearer-token filter.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct TokenGate {
    config: Arc<GateConfig>,
    verifier: Arc<dyn TokenVerifier>,
}

impl fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenGate {
    /// Build a gate that verifies HMAC-signed JWTs.
    ///
    /// Fails when `options.secret` is missing or empty.
    pub fn new(options: GateOptions) -> Result<Self, GateConfigError> {
        Self::with_verifier(options, Arc::new(HmacVerifier::new()))
    }

    pub fn with_verifier(
        options: GateOptions,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Result<Self, GateConfigError> {
        let config = GateConfig::try_from(options)?;

        Ok(Self {
            config: Arc::new(config),
            verifier,
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run one request through the gate.
    ///
    /// On `Decision::Admit` the claims have already been written to `auth`
    /// under the configured claims field. On rejection `auth` is untouched.
    pub fn handle(&self, headers: &HeaderMap, auth: &mut AuthData) -> Decision {
        let config = &*self.config;
        let logger = config.logger();

        let Some(value) = headers.get(config.header()) else {
            logger.warn(messages::MISSING_HEADER);
            return self.reject(RejectReason::MissingHeader);
        };

        // Non-visible-ASCII values cannot carry a bearer token.
        let Ok(value) = value.to_str() else {
            logger.warn(messages::MISSING_BEARER);
            return self.reject(RejectReason::MissingBearer);
        };

        let parts: Vec<&str> = value.split(' ').collect();
        if parts.len() < 2 {
            logger.warn(messages::MISSING_BEARER);
            return self.reject(RejectReason::MissingBearer);
        }

        if config.strict_bearer() && (parts.len() != 2 || parts[0] != BEARER_PREFIX) {
            logger.warn(messages::STRICT_BEARER);
            return self.reject(RejectReason::StrictBearer);
        }

        match self.verifier.verify(parts[1], config.secret()) {
            VerificationOutcome::Valid(claims) => {
                auth.insert(config.claims_field(), claims);
                logger.info(messages::VERIFIED);
                Decision::Admit
            }
            VerificationOutcome::Expired => {
                logger.warn(messages::EXPIRED);
                self.reject(RejectReason::Expired)
            }
            VerificationOutcome::Invalid => {
                logger.error(messages::INVALID);
                self.reject(RejectReason::Invalid)
            }
        }
    }

    fn reject(&self, reason: RejectReason) -> Decision {
        let body = match reason {
            RejectReason::Expired if self.config.send_expired_detail() => {
                Some(ExpiredBody::TOKEN_EXPIRED)
            }
            _ => None,
        };

        Decision::Reject(Rejection {
            status: self.config.reject_status(),
            body,
            reason,
        })
    }
}
