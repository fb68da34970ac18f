use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::auth::role::Role;
use crate::constants::TOKEN_LIFETIME_SECS;
use crate::error::{FinLearnError, Result};

/// Session token claims
///
/// Claims are a snapshot of the entitlement record at issuance. Tokens are
/// stateless and not revocable, so role/premium changes only take effect
/// once the client obtains a fresh token; the staleness bound equals the
/// token lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Account role embedded at issuance
    pub role: Role,
    /// Premium entitlement embedded at issuance
    pub premium: bool,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

fn unix_now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or(0)
}

impl Claims {
    /// Creates new claims with the default 7-day lifetime
    pub fn new(user_id: String, role: Role, premium: bool) -> Self {
        Self::with_lifetime(user_id, role, premium, Duration::from_secs(TOKEN_LIFETIME_SECS as u64))
    }

    /// Creates claims with a custom lifetime
    pub fn with_lifetime(user_id: String, role: Role, premium: bool, lifetime: Duration) -> Self {
        let now = unix_now();
        Self {
            sub: user_id,
            role,
            premium,
            exp: now + lifetime.as_secs() as usize,
            iat: now,
        }
    }

    /// Check if the claims are past their expiry timestamp
    pub fn is_expired(&self) -> bool {
        unix_now() > self.exp
    }
}

/// Issues and verifies signed session tokens
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenManager {
    /// Creates a new token manager with a server-held secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Signs the given claims into a token string
    pub fn issue(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| FinLearnError::StorageError(format!("Failed to sign token: {}", e)))
    }

    /// Validates a presented token and returns its claims
    ///
    /// Fails closed: a bad signature or malformed structure is
    /// `InvalidSignature`, a past expiry is `Expired`.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                if data.claims.is_expired() {
                    return Err(FinLearnError::Expired);
                }
                Ok(data.claims)
            }
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(FinLearnError::Expired),
                _ => {
                    log::debug!("Token validation failed: {}", e);
                    Err(FinLearnError::InvalidSignature)
                }
            },
        }
    }

    /// Verifies the bearer credential of a protected request
    ///
    /// `auth_header` is the raw `Authorization` header value, if present.
    pub fn verify_request(&self, auth_header: Option<&str>) -> Result<Claims> {
        let token = auth_header
            .and_then(extract_bearer_token)
            .ok_or(FinLearnError::MissingToken)?;
        self.verify(&token)
    }

    /// Like `verify_request`, but an absent credential is anonymous rather
    /// than an error. A present-but-invalid credential still fails.
    pub fn verify_request_optional(&self, auth_header: Option<&str>) -> Result<Option<Claims>> {
        match auth_header.and_then(extract_bearer_token) {
            Some(token) => self.verify(&token).map(Some),
            None => Ok(None),
        }
    }
}

/// Extracts bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}
