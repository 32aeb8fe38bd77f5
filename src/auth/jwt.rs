use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Claims carried by the identity provider's bearer tokens.
///
/// The provider signs HS256 tokens whose `sub` is the user's UUID in our
/// `users` table. Token issuance is outside this service; we only validate.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user's UUID.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    /// Role claim ("client", "freelancer", "admin"). Informational only: the
    /// role of record lives on the user row.
    pub role: Option<String>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| ApiError::Unauthorized(format!("invalid uuid in sub claim: {e}")))
    }
}

/// Validate an HS256 bearer token and return the decoded claims.
///
/// Expiry is reported as [`ApiError::TokenExpired`] so callers can tell the
/// client to re-authenticate rather than retry.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::TokenExpired,
        _ => ApiError::Unauthorized(format!("invalid token: {e}")),
    })
}
