//! Route guard: client-side mirror of the access policy
//!
//! The guard gates navigation before any network round trip, using a local
//! copy of the session's role and premium flag. The mirror is advisory: the
//! policy engine re-runs server-side on the first API call a page makes,
//! and a server authorization failure overrides any optimistic allow here.

use crate::access::{authorize, Decision, Identity, RedirectTarget, Resource};
use crate::auth::token::Claims;
use crate::error::FinLearnError;

/// Per-navigation guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// No navigation attempted, or mirror just reset
    Unknown,
    /// Navigation in progress, local decision pending
    Checking,
    /// Optimistically allowed; still subject to server confirmation
    Allowed,
    /// Blocked; the client should navigate to the target
    Redirected(RedirectTarget),
}

/// Client-side navigation gate holding the mirrored session
#[derive(Debug)]
pub struct RouteGuard {
    mirror: Option<Identity>,
    state: GuardState,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self {
            mirror: None,
            state: GuardState::Unknown,
        }
    }

    /// Prime the mirror from a freshly issued token's claims
    pub fn on_login(&mut self, claims: &Claims) {
        self.mirror = Some(Identity::from(claims));
        self.state = GuardState::Unknown;
    }

    /// The mirrored identity, if a session is cached locally
    pub fn mirrored(&self) -> Option<Identity> {
        self.mirror
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Gate a navigation attempt using only the local mirror (no I/O).
    /// Transitions `Unknown -> Checking -> {Allowed, Redirected}`.
    pub fn begin_navigation(&mut self, resource: Resource) -> GuardState {
        self.state = GuardState::Checking;

        self.state = match authorize(self.mirror, resource) {
            Decision::Allow => GuardState::Allowed,
            Decision::Redirect(target) => GuardState::Redirected(target),
            // A hard deny renders as an access-denied redirect client-side;
            // there is no partial-render state
            Decision::Deny => GuardState::Redirected(RedirectTarget::Login),
        };
        self.state
    }

    /// Feed back the server's authoritative answer for the current page.
    /// Any auth failure after an optimistic allow means the mirror was
    /// stale, so it is cleared before redirecting. A kept mirror would send
    /// the next navigation straight back to the same denied page.
    pub fn on_server_error(&mut self, error: &FinLearnError) {
        match error {
            FinLearnError::AuthRequired(target) => {
                self.mirror = None;
                self.state = GuardState::Redirected(*target);
            }
            FinLearnError::MissingToken
            | FinLearnError::InvalidSignature
            | FinLearnError::Expired
            | FinLearnError::Forbidden => {
                self.mirror = None;
                self.state = GuardState::Redirected(RedirectTarget::Login);
            }
            _ => {}
        }
    }

    /// Logout: the only explicit terminal reset
    pub fn logout(&mut self) {
        self.mirror = None;
        self.state = GuardState::Unknown;
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}
