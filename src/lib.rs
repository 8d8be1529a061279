//! HTTP bearer-token gate for axum.
//!
//! A [`TokenGate`] checks the configured request header for a
//! `Bearer <jwt>` credential, verifies it against a shared secret and
//! either admits the request (attaching the decoded claims as [`AuthData`])
//! or rejects it with a configurable status.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod gate;
pub mod logger;
pub mod middleware;
pub mod services;
pub mod state;

pub use error::GateConfigError;
pub use gate::{AuthData, Decision, GateOptions, TokenGate};
pub use logger::{GateLogger, NoopLogger, TracingLogger};
pub use services::auth::{Claims, HmacVerifier, TokenVerifier, VerificationOutcome};
