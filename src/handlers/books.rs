use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiPath, RowId, ValidatedJson};
use crate::schemas::{AppState, CreatedResponse, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::book;
use model::store::{self, StoreError};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new book
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Must reference an existing author
    pub author_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
}

impl From<book::Model> for BookResponse {
    fn from(model: book::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author_id: model.author_id,
        }
    }
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created successfully", body = CreatedResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 409, description = "Author does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBookRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    trace!("Entering create_book function");
    debug!("Creating book '{}' for author {}", request.title, request.author_id);

    let author_id = request.author_id;
    let new_book = book::ActiveModel {
        title: Set(request.title),
        author_id: Set(author_id),
        ..Default::default()
    };

    match store::insert(&state.db, new_book).await {
        Ok(id) => {
            info!("Book created successfully with ID: {}", id);
            Ok((
                StatusCode::CREATED,
                Json(CreatedResponse {
                    message: "Book added".to_string(),
                    id,
                }),
            ))
        }
        Err(StoreError::ConstraintViolation(detail)) => {
            warn!("Author {} does not exist: {}", author_id, detail);
            Err(ApiError::ConstraintViolation(format!(
                "author {} does not exist",
                author_id
            )))
        }
        Err(e) => {
            error!("Failed to create book: {}", e);
            Err(e.into())
        }
    }
}

/// Get all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Books retrieved successfully", body = Vec<BookResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_books(State(state): State<AppState>) -> ApiResult<Json<Vec<BookResponse>>> {
    let books = store::list_all::<book::Entity, _>(&state.db).await?;
    info!("Successfully retrieved {} books", books.len());

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Get books by author
///
/// Unlike `/authors/{id}/books`, an unknown author simply yields an empty list.
#[utoipa::path(
    get,
    path = "/books/author/{author_id}",
    tag = "books",
    params(
        ("author_id" = i32, Path, description = "Author ID"),
    ),
    responses(
        (status = 200, description = "Books of the author", body = Vec<BookResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_books_by_author(
    ApiPath(author_id): ApiPath<RowId>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<BookResponse>>> {
    let Some(author_id) = author_id.get() else {
        debug!("Author id is out of range, no books can match");
        return Ok(Json(Vec::new()));
    };
    let books =
        store::filter_by_field::<book::Entity, _, _>(&state.db, book::Column::AuthorId, author_id)
            .await?;
    info!("Found {} books for author {}", books.len(), author_id);

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID"),
    ),
    responses(
        (status = 204, description = "Book deleted successfully"),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "Book still referenced by borrow records", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_book(
    ApiPath(book_id): ApiPath<RowId>,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    let book_id = book_id.or_not_found("Book")?;
    trace!("Entering delete_book function for book_id: {}", book_id);

    match store::delete_by_id::<book::Entity, _>(&state.db, book_id).await {
        Ok(true) => {
            info!("Book with ID {} deleted successfully", book_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => {
            warn!("Book with ID {} not found for deletion", book_id);
            Err(ApiError::not_found("Book"))
        }
        Err(StoreError::ConstraintViolation(detail)) => {
            warn!("Book with ID {} is still referenced: {}", book_id, detail);
            Err(ApiError::ConstraintViolation(format!(
                "book {} still has borrow records",
                book_id
            )))
        }
        Err(e) => {
            error!("Failed to delete book with ID {}: {}", book_id, e);
            Err(e.into())
        }
    }
}
