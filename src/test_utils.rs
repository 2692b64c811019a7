#[cfg(test)]
pub mod test_utils {
    use crate::config::initialize_app_state_with_url;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create AppState backed by a migrated in-memory SQLite database
    pub async fn setup_test_app_state() -> AppState {
        initialize_app_state_with_url("sqlite::memory:")
            .await
            .expect("Failed to set up in-memory database")
    }

    /// Initialize tracing for tests, captured per test by the test harness.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set. Only the first call installs a subscriber.
    fn init_test_tracing() {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let _ = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Create a test server around a fresh app
    pub async fn setup_test_server() -> TestServer {
        TestServer::new(setup_test_app().await).expect("Failed to start test server")
    }

    /// POST a JSON body and return the id from the `{message, id}` reply
    pub async fn create(server: &TestServer, path: &str, body: Value) -> i64 {
        let response = server.post(path).json(&body).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: Value = response.json();
        body["id"].as_i64().expect("create response carries an id")
    }

    pub async fn create_user(server: &TestServer, name: &str, email: &str) -> i64 {
        create(server, "/users", json!({ "name": name, "email": email })).await
    }

    pub async fn create_author(server: &TestServer, name: &str) -> i64 {
        create(server, "/authors", json!({ "name": name })).await
    }

    pub async fn create_book(server: &TestServer, title: &str, author_id: i64) -> i64 {
        create(server, "/books", json!({ "title": title, "author_id": author_id })).await
    }

    pub async fn create_borrow(server: &TestServer, user_id: i64, book_id: i64) -> i64 {
        create(server, "/borrow", json!({ "user_id": user_id, "book_id": book_id })).await
    }
}
