use super::{duplicate_key, BookRepository};
use crate::error::AppError;
use crate::model::Book;
use async_trait::async_trait;
use sqlx::PgPool;

const COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

/// SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, isbn: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            duplicate_key(isbn)
        }
        _ => AppError::Db(e),
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, AppError> {
        let sql = format!("SELECT {} FROM books ORDER BY title", COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_key(&self, isbn: &str) -> Result<Option<Book>, AppError> {
        let sql = format!("SELECT {} FROM books WHERE isbn = $1", COLUMNS);
        tracing::debug!(sql = %sql, isbn, "query");
        let row = sqlx::query_as::<_, Book>(&sql)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, book: &Book) -> Result<Book, AppError> {
        let sql = format!(
            "INSERT INTO books ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            COLUMNS, COLUMNS
        );
        tracing::debug!(sql = %sql, isbn = %book.isbn, "query");
        sqlx::query_as::<_, Book>(&sql)
            .bind(&book.isbn)
            .bind(&book.amazon_url)
            .bind(&book.author)
            .bind(&book.language)
            .bind(book.pages)
            .bind(&book.publisher)
            .bind(&book.title)
            .bind(book.year)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &book.isbn))
    }

    async fn update_by_key(&self, isbn: &str, book: &Book) -> Result<Option<Book>, AppError> {
        let sql = format!(
            "UPDATE books SET isbn = $1, amazon_url = $2, author = $3, language = $4, pages = $5, \
             publisher = $6, title = $7, year = $8 WHERE isbn = $9 RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, isbn, "query");
        sqlx::query_as::<_, Book>(&sql)
            .bind(&book.isbn)
            .bind(&book.amazon_url)
            .bind(&book.author)
            .bind(&book.language)
            .bind(book.pages)
            .bind(&book.publisher)
            .bind(&book.title)
            .bind(book.year)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &book.isbn))
    }

    async fn delete_by_key(&self, isbn: &str) -> Result<bool, AppError> {
        tracing::debug!(isbn, "delete");
        let row: Option<(String,)> = sqlx::query_as("DELETE FROM books WHERE isbn = $1 RETURNING isbn")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
