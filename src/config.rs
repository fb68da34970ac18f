//! Server configuration module
//! Handles dynamic configuration parameters for the platform server

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT, STORE_TIMEOUT_MS, TOKEN_LIFETIME_SECS};
use crate::error::{FinLearnError, Result};
use std::env;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JWT secret for session token signing/validation
    pub jwt_secret: String,
    /// Lifetime of issued session tokens
    pub token_lifetime: Duration,
    /// Deadline for any single entitlement store access
    pub store_timeout: Duration,
    /// Development mode (seeds a default admin account)
    pub development_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        panic!("ServerConfig::default() is not allowed for security reasons. Use ServerConfig::from_env() instead.");
    }
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "unit-testing-0nly-jwt-s3cret-never-use-in-production".to_string(),
            token_lifetime: Duration::from_secs(TOKEN_LIFETIME_SECS as u64),
            store_timeout: Duration::from_millis(STORE_TIMEOUT_MS),
            development_mode: true,
        }
    }

    /// Validate that the JWT secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(FinLearnError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "test-secret",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(FinLearnError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FinLearnError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("FINLEARN_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("FINLEARN_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = env::var("FINLEARN_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                FinLearnError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let token_lifetime_secs = env::var("FINLEARN_TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(TOKEN_LIFETIME_SECS as u64);

        let store_timeout_ms = env::var("FINLEARN_STORE_TIMEOUT_MS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(STORE_TIMEOUT_MS);

        let development_mode = env::var("FINLEARN_DEVELOPMENT_MODE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false); // SECURITY: Default to false (production mode)

        Self::validate_jwt_secret(&jwt_secret)?;

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_lifetime: Duration::from_secs(token_lifetime_secs),
            store_timeout: Duration::from_millis(store_timeout_ms),
            development_mode,
        })
    }
}
