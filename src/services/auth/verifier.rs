use std::collections::HashSet;
use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};

/// Decoded token payload. Application-defined, passed through untouched.
pub type Claims = serde_json::Value;

/// Result of checking a bearer credential.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Valid(Claims),
    Expired,
    /// Bad signature, malformed token, disallowed algorithm, ...
    Invalid,
}

/// Shared key material for HMAC verification.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(***)")
    }
}

/// Signature + expiry check for a single token.
///
/// Implementations return exactly one outcome per call and never retry.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, secret: &SigningSecret) -> VerificationOutcome;
}

/// HMAC (HS256/HS384/HS512) verifier backed by `jsonwebtoken`.
///
/// - expired once `now >= exp`, no leeway
/// - not usable while `now < nbf`; reported as `Invalid`
/// - no required claims: a token without `exp` does not expire
/// - `aud` is not checked
#[derive(Clone)]
pub struct HmacVerifier {
    validation: Validation,
}

impl fmt::Debug for HmacVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

impl Default for HmacVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HmacVerifier {
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        // `exp - 1 < now` rejects a token in the second it expires.
        validation.reject_tokens_expiring_in_less_than = 1;
        validation.validate_nbf = true;
        validation.required_spec_claims = HashSet::new();
        validation.validate_aud = false;

        Self { validation }
    }
}

impl TokenVerifier for HmacVerifier {
    fn verify(&self, token: &str, secret: &SigningSecret) -> VerificationOutcome {
        let key = DecodingKey::from_secret(secret.as_bytes());

        match jsonwebtoken::decode::<Claims>(token, &key, &self.validation) {
            Ok(data) => VerificationOutcome::Valid(data.claims),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => VerificationOutcome::Expired,
                _ => VerificationOutcome::Invalid,
            },
        }
    }
}
