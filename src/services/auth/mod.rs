pub mod verifier;

pub use verifier::{Claims, HmacVerifier, SigningSecret, TokenVerifier, VerificationOutcome};
