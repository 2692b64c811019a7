use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiPath, RowId, ValidatedJson};
use crate::schemas::{AppState, CreatedResponse, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use model::entities::{book, borrow, user};
use model::store::{self, StoreError};
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for borrowing a book
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateBorrowRequest {
    /// Must reference an existing user
    pub user_id: i32,
    /// Must reference an existing book
    pub book_id: i32,
}

/// A borrow as seen from the user's side
#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowedBookResponse {
    pub book_id: i32,
    /// RFC 3339 timestamp
    pub borrow_date: DateTime<Utc>,
}

impl From<borrow::Model> for BorrowedBookResponse {
    fn from(model: borrow::Model) -> Self {
        Self {
            book_id: model.book_id,
            borrow_date: model.borrow_date,
        }
    }
}

/// A borrow as seen from the book's side
#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowerResponse {
    pub user_id: i32,
    /// RFC 3339 timestamp
    pub borrow_date: DateTime<Utc>,
}

impl From<borrow::Model> for BorrowerResponse {
    fn from(model: borrow::Model) -> Self {
        Self {
            user_id: model.user_id,
            borrow_date: model.borrow_date,
        }
    }
}

/// Borrow a book
///
/// No availability rules apply: the same book may be borrowed any number of
/// times, by anyone.
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrows",
    request_body = CreateBorrowRequest,
    responses(
        (status = 201, description = "Borrow recorded", body = CreatedResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 409, description = "User or book does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_borrow(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBorrowRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    trace!("Entering create_borrow function");
    debug!("User {} borrowing book {}", request.user_id, request.book_id);

    let new_borrow = borrow::ActiveModel::new_now(request.user_id, request.book_id);

    match store::insert(&state.db, new_borrow).await {
        Ok(id) => {
            info!("Borrow recorded with ID: {}", id);
            Ok((
                StatusCode::CREATED,
                Json(CreatedResponse {
                    message: "Book borrowed".to_string(),
                    id,
                }),
            ))
        }
        Err(StoreError::ConstraintViolation(detail)) => {
            warn!(
                "Borrow references missing user {} or book {}: {}",
                request.user_id, request.book_id, detail
            );
            Err(ApiError::ConstraintViolation(format!(
                "user {} or book {} does not exist",
                request.user_id, request.book_id
            )))
        }
        Err(e) => {
            error!("Failed to record borrow: {}", e);
            Err(e.into())
        }
    }
}

/// Get the books a user has borrowed
#[utoipa::path(
    get,
    path = "/users/{id}/borrowed_books",
    tag = "borrows",
    params(
        ("id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Borrows of the user", body = Vec<BorrowedBookResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_borrowed_books(
    ApiPath(user_id): ApiPath<RowId>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<BorrowedBookResponse>>> {
    let user_id = user_id.or_not_found("User")?;
    trace!("Entering get_borrowed_books function for user_id: {}", user_id);

    let txn = state.db.begin().await?;
    if store::get_by_id::<user::Entity, _>(&txn, user_id).await?.is_none() {
        warn!("User with ID {} not found", user_id);
        return Err(ApiError::not_found("User"));
    }
    let borrows =
        store::filter_by_field::<borrow::Entity, _, _>(&txn, borrow::Column::UserId, user_id)
            .await?;
    txn.commit().await?;

    info!("User {} has {} borrows", user_id, borrows.len());
    Ok(Json(borrows.into_iter().map(BorrowedBookResponse::from).collect()))
}

/// Get the users who borrowed a book
#[utoipa::path(
    get,
    path = "/books/{id}/borrowers",
    tag = "borrows",
    params(
        ("id" = i32, Path, description = "Book ID"),
    ),
    responses(
        (status = 200, description = "Borrows of the book", body = Vec<BorrowerResponse>),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_book_borrowers(
    ApiPath(book_id): ApiPath<RowId>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<BorrowerResponse>>> {
    let book_id = book_id.or_not_found("Book")?;
    trace!("Entering get_book_borrowers function for book_id: {}", book_id);

    let txn = state.db.begin().await?;
    if store::get_by_id::<book::Entity, _>(&txn, book_id).await?.is_none() {
        warn!("Book with ID {} not found", book_id);
        return Err(ApiError::not_found("Book"));
    }
    let borrows =
        store::filter_by_field::<borrow::Entity, _, _>(&txn, borrow::Column::BookId, book_id)
            .await?;
    txn.commit().await?;

    info!("Book {} has {} borrows", book_id, borrows.len());
    Ok(Json(borrows.into_iter().map(BorrowerResponse::from).collect()))
}
