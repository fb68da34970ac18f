//! FinLearn - finance-education content platform backend
//!
//! This library provides the role-based authentication and content-access
//! control core: session token issuance and verification, the access policy
//! engine, the entitlement store contract, and the client route-guard
//! mirror, plus the HTTP surface tying them together.

pub mod access;
pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod payment;
pub mod security;
pub mod storage;

// Re-export main components
pub use config::ServerConfig;
pub use constants::*;
pub use error::{FinLearnError, Result};
