//! API routes

use axum::{routing::get, Router};

use crate::extractors::AppState;
use crate::handlers::{books, health};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api", api_router())
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/books", books_router())
}

fn books_router() -> Router<AppState> {
    Router::new()
        .route("/", get(books::list_books).post(books::create_book))
        .route(
            "/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
}
