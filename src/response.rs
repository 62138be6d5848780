//! Response envelopes: `{book}`, `{books}` and `{message}`.

use crate::model::Book;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct BookBody {
    pub book: Book,
}

#[derive(Serialize)]
pub struct BooksBody {
    pub books: Vec<Book>,
}

#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

pub fn book_created(book: Book) -> (StatusCode, Json<BookBody>) {
    (StatusCode::CREATED, Json(BookBody { book }))
}

pub fn book_ok(book: Book) -> (StatusCode, Json<BookBody>) {
    (StatusCode::OK, Json(BookBody { book }))
}

pub fn books_ok(books: Vec<Book>) -> (StatusCode, Json<BooksBody>) {
    (StatusCode::OK, Json(BooksBody { books }))
}

pub fn message_ok(message: &'static str) -> (StatusCode, Json<MessageBody>) {
    (StatusCode::OK, Json(MessageBody { message }))
}
