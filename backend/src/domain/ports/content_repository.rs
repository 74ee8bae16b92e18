//! Port for content item persistence.

use async_trait::async_trait;

use crate::domain::{ContentId, ContentItem, SearchTerm, Visibility};

use super::define_port_error;

define_port_error! {
    /// Errors raised by content repository adapters.
    pub enum ContentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "content repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "content repository query failed: {message}",
        /// The referenced author does not exist.
        MissingAuthor => "content author does not exist",
    }
}

/// Port for reading and writing content items.
///
/// Listing and search results are ordered by `created_at`, then id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Persist a new item.
    async fn insert(&self, item: &ContentItem) -> Result<(), ContentPersistenceError>;

    /// Overwrite the editable fields and `updated_at` of an existing item.
    ///
    /// Returns `false` when no row with the item's id exists.
    async fn update(&self, item: &ContentItem) -> Result<bool, ContentPersistenceError>;

    /// Remove an item. Returns `false` when it did not exist.
    async fn delete(&self, id: &ContentId) -> Result<bool, ContentPersistenceError>;

    /// Find an item by id.
    async fn find_by_id(&self, id: &ContentId)
    -> Result<Option<ContentItem>, ContentPersistenceError>;

    /// List every item visible under `visibility`.
    async fn list(
        &self,
        visibility: &Visibility,
    ) -> Result<Vec<ContentItem>, ContentPersistenceError>;

    /// Items visible under `visibility` whose title, body, or summary contains `term`.
    async fn search(
        &self,
        term: &SearchTerm,
        visibility: &Visibility,
    ) -> Result<Vec<ContentItem>, ContentPersistenceError>;
}
