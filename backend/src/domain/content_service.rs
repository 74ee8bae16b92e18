//! Content store services.
//!
//! Every operation consults [`authorize`] before reading or writing. Item
//! operations fetch the item first so a missing id reports not-found before
//! any ownership decision.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    ContentCommand, ContentPersistenceError, ContentQuery, ContentRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    ContentAction, ContentDraft, ContentId, ContentInput, ContentItem, Error, Principal, Scope,
    SearchTerm, UserId, Visibility, authorize,
};

fn map_repository_error(error: ContentPersistenceError) -> Error {
    match error {
        ContentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("content store unavailable: {message}"))
        }
        ContentPersistenceError::Query { message } => {
            Error::internal(format!("content store error: {message}"))
        }
        ContentPersistenceError::MissingAuthor => unknown_author(None),
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        other => Error::internal(format!("user directory error: {other}")),
    }
}

fn unknown_author(raw: Option<&str>) -> Error {
    let message = match raw {
        Some(pk) => format!("Invalid pk \"{pk}\" - object does not exist."),
        None => "Invalid pk - object does not exist.".to_owned(),
    };
    Error::invalid_request("validation failed")
        .with_details(json!({ "fields": { "author_id": [message] } }))
}

fn not_found(id: &ContentId) -> Error {
    Error::not_found(format!("content item {id} not found"))
}

/// Content service implementing the command and query driving ports.
#[derive(Clone)]
pub struct ContentService<C, U> {
    content: Arc<C>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<C, U> ContentService<C, U> {
    pub fn new(content: Arc<C>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            content,
            users,
            clock,
        }
    }
}

impl<C, U> ContentService<C, U>
where
    C: ContentRepository,
    U: UserRepository,
{
    /// Current time at the microsecond precision the store keeps.
    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(6)
    }

    async fn fetch(&self, id: &ContentId) -> Result<ContentItem, Error> {
        self.content
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    /// Resolve the author of a new item from the granted scope.
    async fn author_for(
        &self,
        principal: &Principal,
        scope: Scope,
        requested: Option<&str>,
    ) -> Result<UserId, Error> {
        let Scope::All = scope else {
            return Ok(principal.user_id);
        };
        let Some(raw) = requested.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(principal.user_id);
        };
        let id = UserId::new(raw).map_err(|_| unknown_author(Some(raw)))?;
        if id == principal.user_id {
            return Ok(id);
        }
        match self.users.find_by_id(&id).await.map_err(map_user_error)? {
            Some(_) => Ok(id),
            None => Err(unknown_author(Some(raw))),
        }
    }

    async fn visible(&self, visibility: Visibility) -> Result<Vec<ContentItem>, Error> {
        self.content
            .list(&visibility)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<C, U> ContentCommand for ContentService<C, U>
where
    C: ContentRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        principal: &Principal,
        input: ContentInput,
    ) -> Result<ContentItem, Error> {
        let scope = authorize(principal, ContentAction::Create)?;
        let draft = ContentDraft::try_from_input(&input)?;
        let author_id = self
            .author_for(principal, scope, input.author_id.as_deref())
            .await?;

        let now = self.now();
        let item = ContentItem {
            id: ContentId::random(),
            author_id,
            draft,
            created_at: now,
            updated_at: now,
        };
        self.content
            .insert(&item)
            .await
            .map_err(map_repository_error)?;

        info!(content_id = %item.id, author_id = %item.author_id, "content created");
        Ok(item)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: ContentId,
        input: ContentInput,
    ) -> Result<ContentItem, Error> {
        let current = self.fetch(&id).await?;
        authorize(
            principal,
            ContentAction::Update {
                owner: &current.author_id,
            },
        )?;
        let draft = ContentDraft::try_from_input(&input)?;

        let revised = current.revise(draft, self.now());
        let updated = self
            .content
            .update(&revised)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(not_found(&id));
        }

        info!(content_id = %id, "content updated");
        Ok(revised)
    }

    async fn delete(&self, principal: &Principal, id: ContentId) -> Result<(), Error> {
        let current = self.fetch(&id).await?;
        authorize(
            principal,
            ContentAction::Delete {
                owner: &current.author_id,
            },
        )?;
        let deleted = self
            .content
            .delete(&id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(not_found(&id));
        }

        info!(content_id = %id, "content deleted");
        Ok(())
    }
}

#[async_trait]
impl<C, U> ContentQuery for ContentService<C, U>
where
    C: ContentRepository,
    U: UserRepository,
{
    async fn list(&self, principal: &Principal) -> Result<Vec<ContentItem>, Error> {
        let scope = authorize(principal, ContentAction::List)?;
        self.visible(scope.into()).await
    }

    async fn list_all(&self, principal: &Principal) -> Result<Vec<ContentItem>, Error> {
        authorize(principal, ContentAction::AdminList)?;
        self.visible(Visibility::All).await
    }

    async fn get(&self, principal: &Principal, id: ContentId) -> Result<ContentItem, Error> {
        let item = self.fetch(&id).await?;
        authorize(
            principal,
            ContentAction::Read {
                owner: &item.author_id,
            },
        )?;
        Ok(item)
    }

    async fn search(
        &self,
        principal: &Principal,
        term: &SearchTerm,
    ) -> Result<Vec<ContentItem>, Error> {
        let scope = authorize(principal, ContentAction::Search)?;
        self.content
            .search(term, &scope.into())
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "content_service_tests.rs"]
mod tests;
