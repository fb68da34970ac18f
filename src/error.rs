use std::error::Error;
use std::fmt;

use crate::access::RedirectTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinLearnError {
    // Input errors
    Validation(String),
    DuplicateEmail,

    // Authentication errors
    InvalidCredentials,
    MissingToken,
    InvalidSignature,
    Expired,
    /// Anonymous request to a protected resource; carries where the client
    /// should send the user to authenticate
    AuthRequired(RedirectTarget),

    // Authorization errors
    Forbidden,

    // Resource errors
    NotFound(String),

    // Upstream errors
    UpstreamUnavailable(String),

    // Storage errors
    StorageError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for FinLearnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
            Self::DuplicateEmail => write!(f, "Email already registered"),
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::MissingToken => write!(f, "Missing authentication token"),
            Self::InvalidSignature => write!(f, "Invalid authentication token"),
            Self::Expired => write!(f, "Authentication token expired"),
            Self::AuthRequired(_) => write!(f, "Authentication required"),
            Self::Forbidden => write!(f, "Forbidden: insufficient permissions"),
            Self::NotFound(what) => write!(f, "Not found: {}", what),
            Self::UpstreamUnavailable(msg) => write!(f, "Upstream unavailable: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for FinLearnError {}

impl FinLearnError {
    /// HTTP status code this error maps to at the API boundary
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::DuplicateEmail => 409,
            Self::InvalidCredentials => 401,
            Self::MissingToken | Self::InvalidSignature | Self::Expired => 401,
            Self::AuthRequired(_) => 401,
            Self::Forbidden => 403,
            Self::NotFound(_) => 404,
            Self::UpstreamUnavailable(_) => 503,
            Self::StorageError(_) | Self::ConfigError(_) => 500,
        }
    }

    /// Whether the client should re-authenticate (as opposed to showing
    /// an access-denied state or a field error)
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::MissingToken
                | Self::InvalidSignature
                | Self::Expired
                | Self::AuthRequired(_)
        )
    }

    /// Login destination for an anonymous-access failure, if one applies
    pub fn redirect_target(&self) -> Option<RedirectTarget> {
        match self {
            Self::AuthRequired(target) => Some(*target),
            _ => None,
        }
    }
}

// Generic result type for FinLearn
pub type Result<T> = std::result::Result<T, FinLearnError>;
