//! Abstract storage interfaces for pluggable backends
//!
//! This module defines the entitlement store contract plus the record types
//! it persists: users, content items, and learning roadmaps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::role::Role;
use crate::error::Result;

/// Persisted user record, the single source of truth for entitlements.
/// Embedded token claims may lag behind this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string; never leaves the storage layer in a response
    pub password_hash: String,
    pub role: Role,
    pub premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            role,
            premium: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sanitized view for API responses; carries no credential material
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            premium: self.premium,
            created_at: self.created_at,
        }
    }
}

/// User data safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub premium: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile fields a user may edit; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
}

/// Content type tags; an item may carry several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Article,
    Video,
}

/// Difficulty levels, also the roadmap step-list keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Draft,
    Published,
}

/// A catalogue entry: article or video lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub body: String,
    pub kinds: Vec<ContentKind>,
    pub difficulty: Difficulty,
    pub premium: bool,
    pub status: PublishStatus,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Metadata-only view: everything except the body. Returned to
    /// non-premium requesters of premium items so the catalogue stays
    /// discoverable.
    pub fn preview(&self, upgrade_required: bool) -> ContentPreview {
        ContentPreview {
            id: self.id.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            kinds: self.kinds.clone(),
            difficulty: self.difficulty,
            premium: self.premium,
            views: self.views,
            upgrade_required,
        }
    }
}

/// Content metadata without the gated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPreview {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub kinds: Vec<ContentKind>,
    pub difficulty: Difficulty,
    pub premium: bool,
    pub views: u64,
    /// Client-visible signal that the full body needs a premium account
    pub upgrade_required: bool,
}

/// One roadmap step: a titled external resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub title: String,
    pub link: String,
}

/// A learning roadmap with one ordered step list per difficulty level.
/// Step order within a level is insertion order and survives edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub beginner: Vec<RoadmapStep>,
    pub intermediate: Vec<RoadmapStep>,
    pub advanced: Vec<RoadmapStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Roadmap {
    pub fn steps(&self, level: Difficulty) -> &[RoadmapStep] {
        match level {
            Difficulty::Beginner => &self.beginner,
            Difficulty::Intermediate => &self.intermediate,
            Difficulty::Advanced => &self.advanced,
        }
    }

    pub fn steps_mut(&mut self, level: Difficulty) -> &mut Vec<RoadmapStep> {
        match level {
            Difficulty::Beginner => &mut self.beginner,
            Difficulty::Intermediate => &mut self.intermediate,
            Difficulty::Advanced => &mut self.advanced,
        }
    }
}

/// User record storage interface
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a new user; fails with `DuplicateEmail` if the email is taken
    async fn create_user(&self, user: StoredUser) -> Result<String>;

    /// Get user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>>;

    /// Get user by ID
    async fn find_by_id(&self, user_id: &str) -> Result<Option<StoredUser>>;

    /// Update editable profile fields; returns the updated record
    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<StoredUser>;

    /// Field-level premium flag write. Must not clobber or be clobbered by
    /// a concurrent profile update on the same record.
    async fn set_premium(&self, user_id: &str, premium: bool) -> Result<()>;

    /// List all users (admin console)
    async fn list_users(&self) -> Result<Vec<StoredUser>>;
}

/// Content catalogue storage interface
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create_item(&self, item: ContentItem) -> Result<String>;

    async fn get_item(&self, item_id: &str) -> Result<Option<ContentItem>>;

    /// Replace an existing item; the stored view counter is preserved
    async fn update_item(&self, item: ContentItem) -> Result<()>;

    async fn delete_item(&self, item_id: &str) -> Result<()>;

    /// List items in creation order
    async fn list_items(&self) -> Result<Vec<ContentItem>>;

    /// Bump and return the view counter
    async fn record_view(&self, item_id: &str) -> Result<u64>;
}

/// Roadmap storage interface
#[async_trait]
pub trait RoadmapStore: Send + Sync {
    async fn create_roadmap(&self, roadmap: Roadmap) -> Result<String>;

    async fn get_roadmap(&self, roadmap_id: &str) -> Result<Option<Roadmap>>;

    async fn update_roadmap(&self, roadmap: Roadmap) -> Result<()>;

    async fn delete_roadmap(&self, roadmap_id: &str) -> Result<()>;

    async fn list_roadmaps(&self) -> Result<Vec<Roadmap>>;
}

/// Combined storage provider interface
pub trait StoreProvider: Send + Sync {
    fn users(&self) -> &dyn UserStore;

    fn content(&self) -> &dyn ContentStore;

    fn roadmaps(&self) -> &dyn RoadmapStore;
}
