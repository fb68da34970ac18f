//! In-memory storage implementation for development and testing
//!
//! Keeps all records in memory, one tokio `RwLock` per store covering both
//! the record map and its order index. Writers to the same record are
//! serialized by the write lock; `set_premium` touches only the premium
//! field so it cannot lose against a racing profile edit.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::*;
use crate::auth::password::hash_password;
use crate::auth::role::Role;
use crate::error::{FinLearnError, Result};

struct UsersInner {
    by_id: HashMap<String, StoredUser>,
    // email (lowercased) -> user id; kept under the same lock as by_id so
    // the uniqueness check and the insert are a single atomic step
    email_index: HashMap<String, String>,
}

/// In-memory user record store
pub struct MemoryUserStore {
    inner: RwLock<UsersInner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(UsersInner {
                by_id: HashMap::new(),
                email_index: HashMap::new(),
            }),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: StoredUser) -> Result<String> {
        let mut inner = self.inner.write().await;
        let email_key = user.email.to_lowercase();

        if inner.email_index.contains_key(&email_key) {
            return Err(FinLearnError::DuplicateEmail);
        }

        let id = user.id.clone();
        inner.email_index.insert(email_key, id.clone());
        inner.by_id.insert(id.clone(), user);
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let inner = self.inner.read().await;
        let user = inner
            .email_index
            .get(&email.to_lowercase())
            .and_then(|id| inner.by_id.get(id))
            .cloned();
        Ok(user)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<StoredUser>> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(user_id).cloned())
    }

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<StoredUser> {
        let mut inner = self.inner.write().await;

        let user = inner
            .by_id
            .get_mut(user_id)
            .ok_or_else(|| FinLearnError::NotFound(format!("user {}", user_id)))?;

        // Profile edits never touch role, premium, or the password hash
        if let Some(name) = update.name {
            user.name = name;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_premium(&self, user_id: &str, premium: bool) -> Result<()> {
        let mut inner = self.inner.write().await;

        let user = inner
            .by_id
            .get_mut(user_id)
            .ok_or_else(|| FinLearnError::NotFound(format!("user {}", user_id)))?;

        user.premium = premium;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<StoredUser>> {
        let inner = self.inner.read().await;
        let mut users: Vec<StoredUser> = inner.by_id.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }
}

struct ContentInner {
    items: HashMap<String, ContentItem>,
    // creation-order index for stable catalogue listings; shares the lock
    // with the map so a listing never interleaves with a delete
    order: Vec<String>,
}

/// In-memory content catalogue store
pub struct MemoryContentStore {
    inner: RwLock<ContentInner>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ContentInner {
                items: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn create_item(&self, item: ContentItem) -> Result<String> {
        let mut inner = self.inner.write().await;
        let id = item.id.clone();
        inner.items.insert(id.clone(), item);
        inner.order.push(id.clone());
        Ok(id)
    }

    async fn get_item(&self, item_id: &str) -> Result<Option<ContentItem>> {
        Ok(self.inner.read().await.items.get(item_id).cloned())
    }

    async fn update_item(&self, mut item: ContentItem) -> Result<()> {
        let mut inner = self.inner.write().await;

        match inner.items.get(&item.id) {
            Some(existing) => {
                // Edits never reset the view counter or the creation time
                item.views = existing.views;
                item.created_at = existing.created_at;
                item.updated_at = Utc::now();
                inner.items.insert(item.id.clone(), item);
                Ok(())
            }
            None => Err(FinLearnError::NotFound(format!("content {}", item.id))),
        }
    }

    async fn delete_item(&self, item_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;

        if inner.items.remove(item_id).is_none() {
            return Err(FinLearnError::NotFound(format!("content {}", item_id)));
        }
        inner.order.retain(|id| id != item_id);
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<ContentItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.items.get(id))
            .cloned()
            .collect())
    }

    async fn record_view(&self, item_id: &str) -> Result<u64> {
        let mut inner = self.inner.write().await;

        let item = inner
            .items
            .get_mut(item_id)
            .ok_or_else(|| FinLearnError::NotFound(format!("content {}", item_id)))?;
        item.views += 1;
        Ok(item.views)
    }
}

struct RoadmapsInner {
    roadmaps: HashMap<String, Roadmap>,
    order: Vec<String>,
}

/// In-memory roadmap store
pub struct MemoryRoadmapStore {
    inner: RwLock<RoadmapsInner>,
}

impl MemoryRoadmapStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RoadmapsInner {
                roadmaps: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryRoadmapStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoadmapStore for MemoryRoadmapStore {
    async fn create_roadmap(&self, roadmap: Roadmap) -> Result<String> {
        let mut inner = self.inner.write().await;
        let id = roadmap.id.clone();
        inner.roadmaps.insert(id.clone(), roadmap);
        inner.order.push(id.clone());
        Ok(id)
    }

    async fn get_roadmap(&self, roadmap_id: &str) -> Result<Option<Roadmap>> {
        Ok(self.inner.read().await.roadmaps.get(roadmap_id).cloned())
    }

    async fn update_roadmap(&self, mut roadmap: Roadmap) -> Result<()> {
        let mut inner = self.inner.write().await;

        match inner.roadmaps.get(&roadmap.id) {
            Some(existing) => {
                roadmap.created_at = existing.created_at;
                roadmap.updated_at = Utc::now();
                inner.roadmaps.insert(roadmap.id.clone(), roadmap);
                Ok(())
            }
            None => Err(FinLearnError::NotFound(format!("roadmap {}", roadmap.id))),
        }
    }

    async fn delete_roadmap(&self, roadmap_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;

        if inner.roadmaps.remove(roadmap_id).is_none() {
            return Err(FinLearnError::NotFound(format!("roadmap {}", roadmap_id)));
        }
        inner.order.retain(|id| id != roadmap_id);
        Ok(())
    }

    async fn list_roadmaps(&self) -> Result<Vec<Roadmap>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.roadmaps.get(id))
            .cloned()
            .collect())
    }
}

/// Complete in-memory backend bundling all stores
pub struct MemoryStore {
    users: MemoryUserStore,
    content: MemoryContentStore,
    roadmaps: MemoryRoadmapStore,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: MemoryUserStore::new(),
            content: MemoryContentStore::new(),
            roadmaps: MemoryRoadmapStore::new(),
        }
    }

    /// Seed a development admin account. Only called in development mode;
    /// production deployments provision admins out of band.
    pub async fn seed_admin(&self, email: &str, password: &str) -> Result<String> {
        let hash = hash_password(password)?;
        let admin = StoredUser::new("Administrator".to_string(), email.to_string(), hash, Role::Admin);
        let id = self.users.create_user(admin).await?;
        log::info!("Seeded development admin account: {}", email);
        Ok(id)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreProvider for MemoryStore {
    fn users(&self) -> &dyn UserStore {
        &self.users
    }

    fn content(&self) -> &dyn ContentStore {
        &self.content
    }

    fn roadmaps(&self) -> &dyn RoadmapStore {
        &self.roadmaps
    }
}
