use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiPath, RowId, ValidatedJson};
use crate::schemas::{AppState, CreatedResponse, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::{author, book};
use model::store;
use sea_orm::{Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new author
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateAuthorRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorResponse {
    pub id: i32,
    pub name: String,
}

impl From<author::Model> for AuthorResponse {
    fn from(model: author::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// A book as listed under its author (the author id is implied)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorBookResponse {
    pub id: i32,
    pub title: String,
}

impl From<book::Model> for AuthorBookResponse {
    fn from(model: book::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
        }
    }
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthorRequest,
    responses(
        (status = 201, description = "Author created successfully", body = CreatedResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_author(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateAuthorRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    debug!("Creating author with name: {}", request.name);

    let new_author = author::ActiveModel {
        name: Set(request.name),
        ..Default::default()
    };
    let id = store::insert(&state.db, new_author).await?;

    info!("Author created successfully with ID: {}", id);
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Author added".to_string(),
            id,
        }),
    ))
}

/// Get all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Authors retrieved successfully", body = Vec<AuthorResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_authors(State(state): State<AppState>) -> ApiResult<Json<Vec<AuthorResponse>>> {
    let authors = store::list_all::<author::Entity, _>(&state.db).await?;
    info!("Successfully retrieved {} authors", authors.len());

    Ok(Json(authors.into_iter().map(AuthorResponse::from).collect()))
}

/// Get the books written by an author
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID"),
    ),
    responses(
        (status = 200, description = "Books of the author", body = Vec<AuthorBookResponse>),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_author_books(
    ApiPath(author_id): ApiPath<RowId>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AuthorBookResponse>>> {
    let author_id = author_id.or_not_found("Author")?;
    trace!("Entering get_author_books function for author_id: {}", author_id);

    let txn = state.db.begin().await?;
    if store::get_by_id::<author::Entity, _>(&txn, author_id).await?.is_none() {
        warn!("Author with ID {} not found", author_id);
        return Err(ApiError::not_found("Author"));
    }
    let books = store::filter_by_field::<book::Entity, _, _>(&txn, book::Column::AuthorId, author_id)
        .await?;
    txn.commit().await?;

    info!("Found {} books for author {}", books.len(), author_id);
    Ok(Json(books.into_iter().map(AuthorBookResponse::from).collect()))
}
