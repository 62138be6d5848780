use super::{duplicate_key, BookRepository};
use crate::error::AppError;
use crate::model::Book;
use async_trait::async_trait;
use std::sync::RwLock;

/// Process-local repository. Rows keep insertion order.
#[derive(Default)]
pub struct InMemoryBookRepository {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> AppError {
        AppError::Internal("in-memory book store lock poisoned".into())
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, AppError> {
        let books = self.books.read().map_err(|_| Self::poisoned())?;
        Ok(books.clone())
    }

    async fn find_by_key(&self, isbn: &str) -> Result<Option<Book>, AppError> {
        let books = self.books.read().map_err(|_| Self::poisoned())?;
        Ok(books.iter().find(|b| b.isbn == isbn).cloned())
    }

    async fn insert(&self, book: &Book) -> Result<Book, AppError> {
        let mut books = self.books.write().map_err(|_| Self::poisoned())?;
        if books.iter().any(|b| b.isbn == book.isbn) {
            return Err(duplicate_key(&book.isbn));
        }
        books.push(book.clone());
        Ok(book.clone())
    }

    async fn update_by_key(&self, isbn: &str, book: &Book) -> Result<Option<Book>, AppError> {
        let mut books = self.books.write().map_err(|_| Self::poisoned())?;
        let Some(pos) = books.iter().position(|b| b.isbn == isbn) else {
            return Ok(None);
        };
        if book.isbn != isbn && books.iter().any(|b| b.isbn == book.isbn) {
            return Err(duplicate_key(&book.isbn));
        }
        books[pos] = book.clone();
        Ok(Some(book.clone()))
    }

    async fn delete_by_key(&self, isbn: &str) -> Result<bool, AppError> {
        let mut books = self.books.write().map_err(|_| Self::poisoned())?;
        let before = books.len();
        books.retain(|b| b.isbn != isbn);
        Ok(books.len() != before)
    }
}
