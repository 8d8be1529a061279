//! Bearer-token gate.
//!
//! [`TokenGate`] is built once from [`GateOptions`] and then applied to every
//! request: it reads the configured header, extracts the bearer credential,
//! verifies it and yields a [`Decision`]. On admission the decoded claims are
//! written to the request's [`AuthData`] under the configured field name.
//!
//! ```ignore
//! let gate = TokenGate::new(GateOptions::new().with_secret("123456"))?;
//! let mut auth = AuthData::default();
//! match gate.handle(req.headers(), &mut auth) {
//!     Decision::Admit => { /* run downstream */ }
//!     Decision::Reject(rejection) => return rejection.into_response(),
//! }
//! ```

mod config;
mod context;
mod core;
mod decision;

pub use config::{
    DEFAULT_CLAIMS_FIELD, DEFAULT_HEADER, DEFAULT_REJECT_STATUS, GateConfig, GateOptions,
};
pub use context::AuthData;
pub use self::core::{TokenGate, messages};
pub use decision::{Decision, ExpiredBody, RejectReason, Rejection};
