//! HTTP handlers for book CRUD.

pub mod book;
pub use book::*;
