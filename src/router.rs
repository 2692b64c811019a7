use crate::handlers::{
    authors::{create_author, get_author_books, get_authors},
    books::{create_book, delete_book, get_books, get_books_by_author},
    borrows::{create_borrow, get_book_borrowers, get_borrowed_books},
    health::health_check,
    users::{create_user, delete_user, get_user, get_users},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Users
        .route("/users", post(create_user).get(get_users))
        .route("/users/:id", get(get_user).delete(delete_user))
        .route("/users/:id/borrowed_books", get(get_borrowed_books))
        // Books
        .route("/books", post(create_book).get(get_books))
        .route("/books/author/:author_id", get(get_books_by_author))
        .route("/books/:id", delete(delete_book))
        .route("/books/:id/borrowers", get(get_book_borrowers))
        // Authors
        .route("/authors", post(create_author).get(get_authors))
        .route("/authors/:id/books", get(get_author_books))
        // Borrows
        .route("/borrow", post(create_borrow))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
