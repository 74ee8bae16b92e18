//! Driving port for content reads.

use async_trait::async_trait;

use crate::domain::{ContentId, ContentItem, Error, Principal, SearchTerm};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentQuery: Send + Sync {
    /// Items visible to the caller.
    async fn list(&self, principal: &Principal) -> Result<Vec<ContentItem>, Error>;

    /// Every item. Admin only.
    async fn list_all(&self, principal: &Principal) -> Result<Vec<ContentItem>, Error>;

    /// One item, after the existence and ownership checks.
    async fn get(&self, principal: &Principal, id: ContentId) -> Result<ContentItem, Error>;

    /// Visible items matching `term`.
    async fn search(
        &self,
        principal: &Principal,
        term: &SearchTerm,
    ) -> Result<Vec<ContentItem>, Error>;
}
