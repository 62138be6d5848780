//! Book persistence. The service only sees `BookRepository`; the PostgreSQL and
//! in-memory implementations live in submodules.

mod memory;
mod postgres;

pub use memory::InMemoryBookRepository;
pub use postgres::PgBookRepository;

use crate::error::{AppError, ConfigError};
use crate::model::Book;
use async_trait::async_trait;
use sqlx::ConnectOptions;
use std::str::FromStr;

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Every row, in the order the store returns them.
    async fn find_all(&self) -> Result<Vec<Book>, AppError>;

    async fn find_by_key(&self, isbn: &str) -> Result<Option<Book>, AppError>;

    /// Insert and return the row as stored.
    async fn insert(&self, book: &Book) -> Result<Book, AppError>;

    /// Overwrite the row keyed by `isbn` with `book` (whose own `isbn` may differ).
    /// `None` when no row has that key.
    async fn update_by_key(&self, isbn: &str, book: &Book) -> Result<Option<Book>, AppError>;

    /// Returns false when no row has that key.
    async fn delete_by_key(&self, isbn: &str) -> Result<bool, AppError>;

    /// Cheap connectivity check used by the readiness route.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub(crate) fn duplicate_key(isbn: &str) -> AppError {
    AppError::Conflict(format!("A book with isbn '{}' already exists", isbn))
}

/// Create the database named in `database_url` if it is missing, by way of the
/// `postgres` admin database. A URL without a database path is left alone.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some(target) = admin_target(database_url)? else {
        return Ok(());
    };
    if target.database == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&target.admin_url)
        .map_err(|_| invalid_url(database_url))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&target.database)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        tracing::info!(database = %target.database, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&target.database)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
struct AdminTarget {
    admin_url: String,
    database: String,
}

fn invalid_url(url: &str) -> ConfigError {
    ConfigError::Invalid {
        key: "DATABASE_URL",
        value: url.to_string(),
    }
}

/// Splits `scheme://authority/database?query` into the database name and the same
/// URL pointed at `postgres`. `None` when there is no database segment.
fn admin_target(url: &str) -> Result<Option<AdminTarget>, ConfigError> {
    let (location, query) = match url.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (url, None),
    };
    let authority_start = location
        .find("://")
        .map(|i| i + 3)
        .ok_or_else(|| invalid_url(url))?;
    let Some(slash) = location[authority_start..].find('/') else {
        return Ok(None);
    };
    let path_start = authority_start + slash + 1;
    let database = location[path_start..].trim();
    if database.is_empty() {
        return Ok(None);
    }
    if database.contains('/') {
        return Err(invalid_url(url));
    }
    let mut admin_url = format!("{}postgres", &location[..path_start]);
    if let Some(query) = query {
        admin_url.push('?');
        admin_url.push_str(query);
    }
    Ok(Some(AdminTarget {
        admin_url,
        database: database.to_string(),
    }))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
