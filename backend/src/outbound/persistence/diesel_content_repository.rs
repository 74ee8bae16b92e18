//! PostgreSQL-backed `ContentRepository` implementation using Diesel ORM.
//!
//! Search uses `ILIKE` over title, body, and summary; the term's wildcards
//! are escaped by [`SearchTerm::like_pattern`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContentPersistenceError, ContentRepository};
use crate::domain::{
    Body, ContentDraft, ContentId, ContentItem, ContentValidationError, DocumentRef, SearchTerm,
    Summary, Title, UserId, Visibility,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{ContentRow, ContentUpdate, NewContentRow};
use super::pool::{DbPool, PoolError};
use super::schema::content_items;

/// Diesel-backed content store.
#[derive(Clone)]
pub struct DieselContentRepository {
    pool: DbPool,
}

impl DieselContentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_connection_error(error: PoolError) -> ContentPersistenceError {
    map_pool_error(error, |message| ContentPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ContentPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ContentPersistenceError::connection(message),
        DieselFailure::ForeignKeyViolation => ContentPersistenceError::missing_author(),
        DieselFailure::UniqueViolation => ContentPersistenceError::query("duplicate content id"),
        DieselFailure::Query(message) => ContentPersistenceError::query(message),
    }
}

fn corrupt_row(field: &str, error: ContentValidationError) -> ContentPersistenceError {
    ContentPersistenceError::query(format!("stored content has invalid {field}: {error}"))
}

fn row_to_item(row: ContentRow) -> Result<ContentItem, ContentPersistenceError> {
    let draft = ContentDraft {
        title: Title::new(&row.title).map_err(|err| corrupt_row("title", err))?,
        body: Body::new(&row.body).map_err(|err| corrupt_row("body", err))?,
        summary: Summary::new(&row.summary).map_err(|err| corrupt_row("summary", err))?,
        document: DocumentRef::new(&row.document).map_err(|err| corrupt_row("document", err))?,
    };
    Ok(ContentItem {
        id: ContentId::from(row.id),
        author_id: UserId::from(row.author_id),
        draft,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_items(rows: Vec<ContentRow>) -> Result<Vec<ContentItem>, ContentPersistenceError> {
    rows.into_iter().map(row_to_item).collect()
}

#[async_trait]
impl ContentRepository for DieselContentRepository {
    async fn insert(&self, item: &ContentItem) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_connection_error)?;
        let row = NewContentRow {
            id: *item.id.as_uuid(),
            author_id: *item.author_id.as_uuid(),
            title: item.draft.title.as_str(),
            body: item.draft.body.as_str(),
            summary: item.draft.summary.as_str(),
            document: item.draft.document.as_str(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        };

        diesel::insert_into(content_items::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, item: &ContentItem) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_connection_error)?;
        let changes = ContentUpdate {
            title: item.draft.title.as_str(),
            body: item.draft.body.as_str(),
            summary: item.draft.summary.as_str(),
            document: item.draft.document.as_str(),
            updated_at: item.updated_at,
        };

        let affected = diesel::update(content_items::table.find(*item.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &ContentId) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_connection_error)?;
        let affected = diesel::delete(content_items::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn find_by_id(
        &self,
        id: &ContentId,
    ) -> Result<Option<ContentItem>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_connection_error)?;
        let row = content_items::table
            .find(*id.as_uuid())
            .select(ContentRow::as_select())
            .first::<ContentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_item).transpose()
    }

    async fn list(
        &self,
        visibility: &Visibility,
    ) -> Result<Vec<ContentItem>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_connection_error)?;
        let mut query = content_items::table
            .select(ContentRow::as_select())
            .into_boxed();
        if let Visibility::OwnedBy(owner) = visibility {
            query = query.filter(content_items::author_id.eq(*owner.as_uuid()));
        }

        let rows = query
            .order((content_items::created_at.asc(), content_items::id.asc()))
            .load::<ContentRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_items(rows)
    }

    async fn search(
        &self,
        term: &SearchTerm,
        visibility: &Visibility,
    ) -> Result<Vec<ContentItem>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_connection_error)?;
        let pattern = term.like_pattern();
        let mut query = content_items::table
            .select(ContentRow::as_select())
            .filter(
                content_items::title
                    .ilike(pattern.clone())
                    .or(content_items::body.ilike(pattern.clone()))
                    .or(content_items::summary.ilike(pattern)),
            )
            .into_boxed();
        if let Visibility::OwnedBy(owner) = visibility {
            query = query.filter(content_items::author_id.eq(*owner.as_uuid()));
        }

        let rows = query
            .order((content_items::created_at.asc(), content_items::id.asc()))
            .load::<ContentRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_items(rows)
    }
}
