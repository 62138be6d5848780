//! Book handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::response::{book_created, book_ok, books_ok, message_ok};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// Body rejections in the usual error shape instead of axum's plain text: 413 when
/// the body limit is hit, 400 for anything else.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let books = state.books.list_all().await?;
    Ok(books_ok(books))
}

pub async fn read(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book = state.books.get_by_isbn(&isbn).await?;
    Ok(book_ok(book))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(body)?;
    let book = state.books.create(&body).await?;
    Ok(book_created(book))
}

pub async fn update(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(body)?;
    let book = state.books.update(&isbn, &body).await?;
    Ok(book_ok(book))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.books.delete_by_isbn(&isbn).await?;
    Ok(message_ok("Book deleted"))
}
