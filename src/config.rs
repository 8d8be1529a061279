/*
 * Responsibility
 * - 環境変数の読み込み (PORT, JWT_* など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - GateOptions への変換 (secret の必須チェックは TokenGate 側)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use thiserror::Error;

use crate::gate::GateOptions;
use crate::logger::TracingLogger;
use crate::middleware::http::HttpLimits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub jwt_secret: String,
    pub jwt_header: Option<HeaderName>,
    pub jwt_reject_status: Option<StatusCode>,
    pub jwt_send_expired_message: Option<bool>,
    pub jwt_request_auth_prop: Option<String>,
    pub jwt_strict_bearer: Option<bool>,
    pub jwt_gate_log: bool,

    pub http_limits: HttpLimits,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("jwt_header", &self.jwt_header)
            .field("jwt_reject_status", &self.jwt_reject_status)
            .field("jwt_send_expired_message", &self.jwt_send_expired_message)
            .field("jwt_request_auth_prop", &self.jwt_request_auth_prop)
            .field("jwt_strict_bearer", &self.jwt_strict_bearer)
            .field("jwt_gate_log", &self.jwt_gate_log)
            .field("http_limits", &self.http_limits)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_header = lookup("JWT_HEADER")
            .map(|raw| {
                HeaderName::from_str(raw.trim()).map_err(|_| ConfigError::Invalid("JWT_HEADER"))
            })
            .transpose()?;

        let jwt_reject_status = lookup("JWT_REJECT_STATUS")
            .map(|raw| {
                raw.trim()
                    .parse::<u16>()
                    .ok()
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .ok_or(ConfigError::Invalid("JWT_REJECT_STATUS"))
            })
            .transpose()?;

        let jwt_send_expired_message = lookup("JWT_SEND_EXPIRED_MESSAGE")
            .map(|raw| parse_bool(&raw).ok_or(ConfigError::Invalid("JWT_SEND_EXPIRED_MESSAGE")))
            .transpose()?;

        let jwt_request_auth_prop = lookup("JWT_REQUEST_AUTH_PROP")
            .map(|raw| raw.trim().to_string())
            .filter(|s| !s.is_empty());

        let jwt_strict_bearer = lookup("JWT_STRICT_BEARER")
            .map(|raw| parse_bool(&raw).ok_or(ConfigError::Invalid("JWT_STRICT_BEARER")))
            .transpose()?;

        let jwt_gate_log = match lookup("JWT_GATE_LOG") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid("JWT_GATE_LOG"))?,
            None => true,
        };

        let defaults = HttpLimits::default();
        let body_limit_bytes = match lookup("HTTP_BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("HTTP_BODY_LIMIT_BYTES"))?,
            None => defaults.body_limit_bytes,
        };
        let timeout = match lookup("HTTP_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("HTTP_TIMEOUT_SECONDS"))?,
            None => defaults.timeout,
        };

        Ok(Self {
            addr,
            app_env,
            jwt_secret,
            jwt_header,
            jwt_reject_status,
            jwt_send_expired_message,
            jwt_request_auth_prop,
            jwt_strict_bearer,
            jwt_gate_log,
            http_limits: HttpLimits {
                body_limit_bytes,
                timeout,
            },
        })
    }

    pub fn gate_options(&self) -> GateOptions {
        let mut options = GateOptions::new().with_secret(self.jwt_secret.clone());
        options.header = self.jwt_header.clone();
        options.reject_http_status = self.jwt_reject_status;
        options.send_expired_message = self.jwt_send_expired_message;
        options.request_auth_prop = self.jwt_request_auth_prop.clone();
        options.strict_bearer_validation = self.jwt_strict_bearer;

        if self.jwt_gate_log {
            options = options.with_logger(Arc::new(TracingLogger));
        }

        options
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
