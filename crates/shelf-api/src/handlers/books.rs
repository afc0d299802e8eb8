//! Books API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use shelf_core::{parse_id, Id};
use shelf_models::Book;

use crate::error::{ApiError, ApiResult, BookAction};
use crate::extractors::{AppState, BookForm};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Ids that do not parse cannot match any book
fn book_id(raw: &str) -> ApiResult<Id> {
    parse_id(raw).ok_or_else(ApiError::book_not_found)
}

/// List all books
///
/// GET /api/books
pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    Json(state.books.list().await)
}

/// Get a single book
///
/// GET /api/books/:id
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Book>> {
    let id = book_id(&id)?;
    let book = state
        .books
        .get(id)
        .await
        .map_err(|e| ApiError::from_service(e, BookAction::Fetch))?;
    Ok(Json(book))
}

/// Create a book
///
/// POST /api/books
pub async fn create_book(
    State(state): State<AppState>,
    form: BookForm,
) -> ApiResult<impl IntoResponse> {
    let book = state
        .books
        .create(form.params, form.image)
        .await
        .map_err(|e| ApiError::from_service(e, BookAction::Create))?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
///
/// PUT /api/books/:id
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: BookForm,
) -> ApiResult<Json<Book>> {
    let id = book_id(&id)?;
    let book = state
        .books
        .update(id, form.params, form.image)
        .await
        .map_err(|e| ApiError::from_service(e, BookAction::Update))?;
    Ok(Json(book))
}

/// Delete a book
///
/// DELETE /api/books/:id
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = book_id(&id)?;
    state
        .books
        .delete(id)
        .await
        .map_err(|e| ApiError::from_service(e, BookAction::Delete))?;
    Ok(Json(MessageResponse {
        message: "Book deleted successfully".into(),
    }))
}
