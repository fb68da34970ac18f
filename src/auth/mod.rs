//! Authentication: credential issuance and verification

pub mod password;
pub mod role;
pub mod service;
pub mod token;

// Re-export main components
pub use role::Role;
pub use service::{AuthService, LoginOutcome};
pub use token::{extract_bearer_token, Claims, TokenManager};
