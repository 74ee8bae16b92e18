//! Process-local repositories backed by a shared in-memory table set.
//!
//! Used when no database URL is configured and by the integration suites.
//! Users and content share one lock so content inserts can check that the
//! author exists, mirroring the foreign key the SQL schema enforces.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ContentPersistenceError, ContentRepository, UserCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    ContentId, ContentItem, Email, PasswordDigest, SearchTerm, User, UserId, Visibility,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, UserCredentials>,
    content: HashMap<ContentId, ContentItem>,
}

impl Tables {
    fn visible<'a>(
        &'a self,
        visibility: &'a Visibility,
    ) -> impl Iterator<Item = &'a ContentItem> + 'a {
        self.content
            .values()
            .filter(move |item| visibility.permits(item))
    }
}

fn ordered(mut items: Vec<ContentItem>) -> Vec<ContentItem> {
    items.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
    items
}

/// Handle to the shared tables. Cloning shares state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// User directory view over these tables.
    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: self.clone(),
        }
    }

    /// Content store view over these tables.
    pub fn content(&self) -> InMemoryContentRepository {
        InMemoryContentRepository {
            store: self.clone(),
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, Tables>> {
        self.tables.lock().ok()
    }
}

/// In-memory `UserRepository`.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, UserPersistenceError> {
        self.store
            .lock()
            .ok_or_else(|| UserPersistenceError::connection("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordDigest,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables()?;
        let taken = tables
            .users
            .values()
            .any(|existing| existing.user.email() == user.email());
        if taken {
            return Err(UserPersistenceError::duplicate_email());
        }
        if tables.users.contains_key(user.id()) {
            return Err(UserPersistenceError::query("duplicate user id"));
        }
        tables.users.insert(
            *user.id(),
            UserCredentials {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables()?;
        Ok(tables.users.get(id).map(|found| found.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let tables = self.tables()?;
        Ok(tables
            .users
            .values()
            .find(|found| found.user.email() == email)
            .cloned())
    }
}

/// In-memory `ContentRepository`.
#[derive(Debug, Clone)]
pub struct InMemoryContentRepository {
    store: InMemoryStore,
}

impl InMemoryContentRepository {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, ContentPersistenceError> {
        self.store
            .lock()
            .ok_or_else(|| ContentPersistenceError::connection("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn insert(&self, item: &ContentItem) -> Result<(), ContentPersistenceError> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&item.author_id) {
            return Err(ContentPersistenceError::missing_author());
        }
        if tables.content.contains_key(&item.id) {
            return Err(ContentPersistenceError::query("duplicate content id"));
        }
        tables.content.insert(item.id, item.clone());
        Ok(())
    }

    async fn update(&self, item: &ContentItem) -> Result<bool, ContentPersistenceError> {
        let mut tables = self.tables()?;
        let Some(stored) = tables.content.get_mut(&item.id) else {
            return Ok(false);
        };
        stored.draft = item.draft.clone();
        stored.updated_at = item.updated_at;
        Ok(true)
    }

    async fn delete(&self, id: &ContentId) -> Result<bool, ContentPersistenceError> {
        let mut tables = self.tables()?;
        Ok(tables.content.remove(id).is_some())
    }

    async fn find_by_id(
        &self,
        id: &ContentId,
    ) -> Result<Option<ContentItem>, ContentPersistenceError> {
        let tables = self.tables()?;
        Ok(tables.content.get(id).cloned())
    }

    async fn list(
        &self,
        visibility: &Visibility,
    ) -> Result<Vec<ContentItem>, ContentPersistenceError> {
        let tables = self.tables()?;
        Ok(ordered(tables.visible(visibility).cloned().collect()))
    }

    async fn search(
        &self,
        term: &SearchTerm,
        visibility: &Visibility,
    ) -> Result<Vec<ContentItem>, ContentPersistenceError> {
        let tables = self.tables()?;
        Ok(ordered(
            tables
                .visible(visibility)
                .filter(|item| term.matches(&item.draft))
                .cloned()
                .collect(),
        ))
    }
}
