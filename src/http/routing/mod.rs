pub mod todos;

use axum::{routing::get, Router};

/// Root router: health probe plus the versioned API.
pub fn app(todos: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api/v1", todos)
}
