use std::fmt;
use std::sync::Arc;

use axum::http::{HeaderName, StatusCode, header};

use crate::error::GateConfigError;
use crate::logger::{GateLogger, NoopLogger};
use crate::services::auth::SigningSecret;

pub const DEFAULT_HEADER: HeaderName = header::AUTHORIZATION;
pub const DEFAULT_REJECT_STATUS: StatusCode = StatusCode::UNAUTHORIZED;
pub const DEFAULT_CLAIMS_FIELD: &str = "authData";
const DEFAULT_SEND_EXPIRED_MESSAGE: bool = true;
const DEFAULT_STRICT_BEARER_VALIDATION: bool = false;

/// Construction options for a `TokenGate`.
///
/// Everything except `secret` is optional and falls back to a default when
/// left unset. Empty strings count as unset.
#[derive(Clone, Default)]
pub struct GateOptions {
    /// Key used for verification. Required.
    pub secret: Option<String>,
    /// Header carrying the credential. Default `authorization`.
    pub header: Option<HeaderName>,
    /// Status used for every rejection. Default 401.
    pub reject_http_status: Option<StatusCode>,
    /// Attach `{"error":"TokenExpiredError"}` when the token is expired. Default true.
    pub send_expired_message: Option<bool>,
    /// Name under which decoded claims are attached. Default `authData`.
    pub request_auth_prop: Option<String>,
    /// Require exactly `Bearer <token>`. Default false.
    pub strict_bearer_validation: Option<bool>,
    pub logger: Option<Arc<dyn GateLogger>>,
}

impl fmt::Debug for GateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("GateOptions")
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("header", &self.header)
            .field("reject_http_status", &self.reject_http_status)
            .field("send_expired_message", &self.send_expired_message)
            .field("request_auth_prop", &self.request_auth_prop)
            .field("strict_bearer_validation", &self.strict_bearer_validation)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl GateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_header(mut self, header: HeaderName) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_reject_http_status(mut self, status: StatusCode) -> Self {
        self.reject_http_status = Some(status);
        self
    }

    pub fn with_send_expired_message(mut self, send: bool) -> Self {
        self.send_expired_message = Some(send);
        self
    }

    pub fn with_request_auth_prop(mut self, field: impl Into<String>) -> Self {
        self.request_auth_prop = Some(field.into());
        self
    }

    pub fn with_strict_bearer_validation(mut self, strict: bool) -> Self {
        self.strict_bearer_validation = Some(strict);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn GateLogger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

/// Resolved, immutable gate configuration.
#[derive(Clone)]
pub struct GateConfig {
    secret: SigningSecret,
    header: HeaderName,
    reject_status: StatusCode,
    send_expired_detail: bool,
    claims_field: String,
    strict_bearer: bool,
    logger: Arc<dyn GateLogger>,
}

impl fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateConfig")
            .field("secret", &self.secret)
            .field("header", &self.header)
            .field("reject_status", &self.reject_status)
            .field("send_expired_detail", &self.send_expired_detail)
            .field("claims_field", &self.claims_field)
            .field("strict_bearer", &self.strict_bearer)
            .finish_non_exhaustive()
    }
}

impl TryFrom<GateOptions> for GateConfig {
    type Error = GateConfigError;

    fn try_from(options: GateOptions) -> Result<Self, Self::Error> {
        let secret = options
            .secret
            .filter(|s| !s.is_empty())
            .map(SigningSecret::new)
            .ok_or(GateConfigError::MissingSecret)?;

        let claims_field = options
            .request_auth_prop
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CLAIMS_FIELD.to_string());

        Ok(Self {
            secret,
            header: options.header.unwrap_or(DEFAULT_HEADER),
            reject_status: options.reject_http_status.unwrap_or(DEFAULT_REJECT_STATUS),
            send_expired_detail: options
                .send_expired_message
                .unwrap_or(DEFAULT_SEND_EXPIRED_MESSAGE),
            claims_field,
            strict_bearer: options
                .strict_bearer_validation
                .unwrap_or(DEFAULT_STRICT_BEARER_VALIDATION),
            logger: options.logger.unwrap_or_else(|| Arc::new(NoopLogger)),
        })
    }
}

impl GateConfig {
    pub fn secret(&self) -> &SigningSecret {
        &self.secret
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    pub fn reject_status(&self) -> StatusCode {
        self.reject_status
    }

    pub fn send_expired_detail(&self) -> bool {
        self.send_expired_detail
    }

    pub fn claims_field(&self) -> &str {
        &self.claims_field
    }

    pub fn strict_bearer(&self) -> bool {
        self.strict_bearer
    }

    pub fn logger(&self) -> &dyn GateLogger {
        self.logger.as_ref()
    }
}
