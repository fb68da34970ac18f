//! Access policy engine
//!
//! Pure, synchronous decisions: given a verified identity (or none) and a
//! requested resource, produce allow / deny / redirect. The same rules run
//! server-side per request and client-side inside the route guard mirror;
//! the server is the final arbiter.

use serde::{Deserialize, Serialize};

use crate::auth::role::Role;
use crate::auth::token::Claims;
use crate::error::{FinLearnError, Result};
use crate::storage::traits::{ContentItem, PublishStatus};

/// The identity facts policy rules consume. Derived from verified claims
/// server-side, or from the locally mirrored session client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub role: Role,
    pub premium: bool,
}

impl From<&Claims> for Identity {
    fn from(claims: &Claims) -> Self {
        Self {
            role: claims.role,
            premium: claims.premium,
        }
    }
}

/// Route-level resource classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Catalogue browse, marketing pages
    Public,
    /// Profile, activity: any authenticated account
    UserArea,
    /// Dashboard, editors, user/content/roadmap management
    AdminArea,
}

/// Where an unauthorized navigation should be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectTarget {
    Login,
    AdminLogin,
}

/// Ephemeral per-request access decision; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    Redirect(RedirectTarget),
}

impl Decision {
    /// Collapse into a `Result` for request handling: a redirect means the
    /// caller must (re)authenticate at the carried target, a deny is a hard
    /// `Forbidden`.
    pub fn require(self) -> Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(FinLearnError::Forbidden),
            Decision::Redirect(target) => Err(FinLearnError::AuthRequired(target)),
        }
    }
}

/// Route-level authorization
pub fn authorize(who: Option<Identity>, resource: Resource) -> Decision {
    match resource {
        Resource::Public => Decision::Allow,
        Resource::UserArea => match who {
            // Both roles clear the user area; admins are users too
            Some(_) => Decision::Allow,
            None => Decision::Redirect(RedirectTarget::Login),
        },
        Resource::AdminArea => match who {
            Some(identity) if identity.role.is_admin() => Decision::Allow,
            Some(_) => Decision::Deny,
            None => Decision::Redirect(RedirectTarget::AdminLogin),
        },
    }
}

/// How much of a content item a requester may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Full item including the body
    Full,
    /// Metadata only, with an upgrade-required signal. A soft deny: the
    /// item stays discoverable, the body is withheld.
    MetadataOnly,
}

/// Content-level check. Role rules dominate premium rules: an admin always
/// sees the full body regardless of its own premium flag.
pub fn content_visibility(who: Option<Identity>, item: &ContentItem) -> Visibility {
    if let Some(identity) = who {
        if identity.role.is_admin() {
            return Visibility::Full;
        }
        if !item.premium || identity.premium {
            return Visibility::Full;
        }
        return Visibility::MetadataOnly;
    }

    if item.premium {
        Visibility::MetadataOnly
    } else {
        Visibility::Full
    }
}

/// Whether a catalogue listing includes this item at all.
/// Drafts exist only for admins.
pub fn item_listed(who: Option<Identity>, item: &ContentItem) -> bool {
    match item.status {
        PublishStatus::Published => true,
        PublishStatus::Draft => who.map(|w| w.role.is_admin()).unwrap_or(false),
    }
}
