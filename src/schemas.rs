use crate::handlers::{
    authors::{AuthorBookResponse, AuthorResponse, CreateAuthorRequest},
    books::{BookResponse, CreateBookRequest},
    borrows::{BorrowedBookResponse, BorrowerResponse, CreateBorrowRequest},
    users::{CreateUserRequest, UserResponse},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
}

/// Body returned by every create endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    /// Human readable confirmation, e.g. "User added"
    pub message: String,
    /// Id assigned to the new record
    pub id: i32,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message, e.g. "User not found"
    pub message: String,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::delete_user,
        crate::handlers::books::create_book,
        crate::handlers::books::get_books,
        crate::handlers::books::get_books_by_author,
        crate::handlers::books::delete_book,
        crate::handlers::authors::create_author,
        crate::handlers::authors::get_authors,
        crate::handlers::authors::get_author_books,
        crate::handlers::borrows::create_borrow,
        crate::handlers::borrows::get_borrowed_books,
        crate::handlers::borrows::get_book_borrowers,
    ),
    components(
        schemas(
            CreatedResponse,
            ErrorResponse,
            HealthResponse,
            CreateUserRequest,
            UserResponse,
            CreateAuthorRequest,
            AuthorResponse,
            AuthorBookResponse,
            CreateBookRequest,
            BookResponse,
            CreateBorrowRequest,
            BorrowedBookResponse,
            BorrowerResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Library members"),
        (name = "authors", description = "Authors and their books"),
        (name = "books", description = "Book catalogue"),
        (name = "borrows", description = "Borrow records"),
    ),
    info(
        title = "Library API",
        description = "Record management for users, authors, books and borrows",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
