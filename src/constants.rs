// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

// Session token lifetime: fixed 7-day window. Entitlement changes are not
// reflected in an outstanding token until it is reissued, so this is also
// the staleness bound for embedded role/premium claims.
pub const TOKEN_LIFETIME_SECS: usize = 7 * 24 * 3600;

// Entitlement store access is bounded; a hit on this deadline fails closed.
pub const STORE_TIMEOUT_MS: u64 = 2_000;

// Single retry for transient store read failures
pub const STORE_RETRY_BACKOFF_MS: u64 = 50;

// Minimum wall-clock duration of a login attempt, successful or not
pub const MIN_AUTH_DURATION_MS: u64 = 100;
