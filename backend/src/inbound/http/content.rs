//! Content store HTTP handlers.
//!
//! ```text
//! GET    /api/v1/content
//! POST   /api/v1/content {"title":"Monthly Report","body":"...","summary":"...","document":"march.pdf"}
//! GET    /api/v1/content/search?q=report
//! GET    /api/v1/content/{id}
//! PUT    /api/v1/content/{id}
//! DELETE /api/v1/content/{id}
//! GET    /api/v1/admin/content
//! ```
//!
//! Every handler requires a bearer token; the decoded [`Principal`] is passed
//! explicitly to the content ports.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ContentId, ContentInput, ContentItem, Error, SearchTerm};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Create or full-replacement update body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ContentRequest {
    #[schema(example = "Monthly Report")]
    pub title: Option<String>,
    #[schema(example = "Figures for March")]
    pub body: Option<String>,
    #[schema(example = "March numbers")]
    pub summary: Option<String>,
    #[schema(example = "march.pdf")]
    pub document: Option<String>,
    /// Author to attribute a new item to. Honoured for admins only.
    #[serde(alias = "author")]
    pub author_id: Option<String>,
}

impl From<ContentRequest> for ContentInput {
    fn from(value: ContentRequest) -> Self {
        Self {
            title: value.title,
            body: value.body,
            summary: value.summary,
            document: value.document,
            author_id: value.author_id,
        }
    }
}

/// Content item as returned to clients.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ContentItemResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub title: String,
    pub body: String,
    pub summary: String,
    pub document: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentItem> for ContentItemResponse {
    fn from(item: ContentItem) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.draft.title.as_str().to_owned(),
            body: item.draft.body.as_str().to_owned(),
            summary: item.draft.summary.as_str().to_owned(),
            document: item.draft.document.as_str().to_owned(),
            author_id: item.author_id.to_string(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

fn to_responses(items: Vec<ContentItem>) -> Vec<ContentItemResponse> {
    items.into_iter().map(ContentItemResponse::from).collect()
}

/// Query string for `GET /api/v1/content/search`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive text matched against title, body, and summary.
    pub q: Option<String>,
}

fn parse_content_id(raw: &str) -> Result<ContentId, Error> {
    ContentId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "id", "code": "invalid_id" }))
    })
}

/// List the items visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/content",
    responses(
        (status = 200, description = "Visible items", body = [ContentItemResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Role not permitted", body = ErrorSchema)
    ),
    tags = ["content"],
    operation_id = "listContent",
    security(("bearerToken" = []))
)]
#[get("/content")]
pub async fn list_content(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<ContentItemResponse>>> {
    let items = state.content_query.list(caller.principal()).await?;
    Ok(web::Json(to_responses(items)))
}

/// Create an item owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/content",
    request_body = ContentRequest,
    responses(
        (status = 201, description = "Created", body = ContentItemResponse),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Role not permitted", body = ErrorSchema)
    ),
    tags = ["content"],
    operation_id = "createContent",
    security(("bearerToken" = []))
)]
#[post("/content")]
pub async fn create_content(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<ContentRequest>,
) -> ApiResult<HttpResponse> {
    let item = state
        .content
        .create(caller.principal(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ContentItemResponse::from(item)))
}

/// Search the items visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/content/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching items", body = [ContentItemResponse]),
        (status = 400, description = "Missing or blank query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Role not permitted", body = ErrorSchema)
    ),
    tags = ["content"],
    operation_id = "searchContent",
    security(("bearerToken" = []))
)]
#[get("/content/search")]
pub async fn search_content(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<ContentItemResponse>>> {
    let term = SearchTerm::new(params.q.as_deref()).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "q", "code": "empty_query" }))
    })?;
    let items = state
        .content_query
        .search(caller.principal(), &term)
        .await?;
    Ok(web::Json(to_responses(items)))
}

/// Fetch one item.
#[utoipa::path(
    get,
    path = "/api/v1/content/{id}",
    params(("id" = String, Path, description = "Content item id")),
    responses(
        (status = 200, description = "Item", body = ContentItemResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["content"],
    operation_id = "getContent",
    security(("bearerToken" = []))
)]
#[get("/content/{id}")]
pub async fn get_content(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ContentItemResponse>> {
    let id = parse_content_id(&path)?;
    let item = state.content_query.get(caller.principal(), id).await?;
    Ok(web::Json(item.into()))
}

/// Replace the editable fields of an item.
#[utoipa::path(
    put,
    path = "/api/v1/content/{id}",
    params(("id" = String, Path, description = "Content item id")),
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Updated", body = ContentItemResponse),
        (status = 400, description = "Malformed id or invalid fields", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["content"],
    operation_id = "updateContent",
    security(("bearerToken" = []))
)]
#[put("/content/{id}")]
pub async fn update_content(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<web::Json<ContentItemResponse>> {
    let id = parse_content_id(&path)?;
    let item = state
        .content
        .update(caller.principal(), id, payload.into_inner().into())
        .await?;
    Ok(web::Json(item.into()))
}

/// Delete an item.
#[utoipa::path(
    delete,
    path = "/api/v1/content/{id}",
    params(("id" = String, Path, description = "Content item id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Owned by another user", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["content"],
    operation_id = "deleteContent",
    security(("bearerToken" = []))
)]
#[delete("/content/{id}")]
pub async fn delete_content(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_content_id(&path)?;
    state.content.delete(caller.principal(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List every item. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/admin/content",
    responses(
        (status = 200, description = "All items", body = [ContentItemResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema)
    ),
    tags = ["content"],
    operation_id = "adminListContent",
    security(("bearerToken" = []))
)]
#[get("/admin/content")]
pub async fn admin_list_content(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<ContentItemResponse>>> {
    let items = state.content_query.list_all(caller.principal()).await?;
    Ok(web::Json(to_responses(items)))
}
