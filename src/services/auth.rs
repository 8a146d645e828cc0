//! Bearer token verification.
//!
//! Tokens are HS256 JWTs minted by the account service. The payload carries
//! the caller's `userId`; `exp` is enforced when present but not required,
//! since the issuer does not always set it.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing token")]
    Missing,
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("token carries no user id")]
    NoUser,
}

/// JWT payload. `exp` is checked by the validator directly from the raw claims.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId", default)]
    pub user_id: String,
}

/// Verifies bearer tokens against the shared secret.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    /// Verify `token` and return the user id it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the token is absent, fails signature or
    /// expiry checks, or carries an empty `userId`.
    pub fn verify(&self, token: Option<&str>) -> Result<String, AuthError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or(AuthError::Missing)?;
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        if data.claims.user_id.is_empty() {
            return Err(AuthError::NoUser);
        }
        Ok(data.claims.user_id)
    }
}

/// Strip an optional `Bearer ` scheme from an `Authorization` header value.
#[must_use]
pub fn bearer_token(header: &str) -> &str {
    let header = header.trim();
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .unwrap_or(header)
        .trim()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
