//! Driving port for content mutations.

use async_trait::async_trait;

use crate::domain::{ContentId, ContentInput, ContentItem, Error, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentCommand: Send + Sync {
    /// Create an item. Authors always become the item's author; admins may
    /// name another existing user through `input.author_id`.
    async fn create(&self, principal: &Principal, input: ContentInput)
    -> Result<ContentItem, Error>;

    /// Replace the editable fields of an item. The author never changes.
    async fn update(
        &self,
        principal: &Principal,
        id: ContentId,
        input: ContentInput,
    ) -> Result<ContentItem, Error>;

    /// Delete an item.
    async fn delete(&self, principal: &Principal, id: ContentId) -> Result<(), Error>;
}
