//! Bookstore: a validated REST backend for a single PostgreSQL `books` table.

pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::Book;
pub use routes::{app, book_routes, common_routes_with_ready};
pub use service::{BookService, BookValidator, Violations};
pub use settings::{Settings, StoreKind};
pub use state::AppState;
pub use store::{ensure_database_exists, BookRepository, InMemoryBookRepository, PgBookRepository};
