//! Bearer credential issuing and verification.
//!
//! Tokens are HS256 JWTs signed with the shared `JWT_SECRET`. The subject is
//! the numeric user id; some issuers encode it as a string, so both forms are
//! accepted on the way in.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Numeric identity of the caller, taken from the `sub` claim.
pub type SubjectId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(deserialize_with = "subject_from_number_or_string")]
    pub sub: SubjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: SubjectId, role: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub,
            role,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

fn subject_from_number_or_string<'de, D>(deserializer: D) -> Result<SubjectId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("subject '{}' is not numeric", s))),
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VerificationError {
    #[error("token expired")]
    Expired,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("JWT secret not configured")]
    MissingSecret,
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => VerificationError::Expired,
            ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
            _ => VerificationError::Malformed(err.to_string()),
        }
    }
}

/// Verifies and issues tokens against one shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Result<Self, VerificationError> {
        if secret.is_empty() {
            return Err(VerificationError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // `sub` may be numeric, which the library's presence check does not
        // count; the `Claims` deserializer requires it instead.
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, VerificationError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| VerificationError::Signing(e.to_string()))
    }
}
