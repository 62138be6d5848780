//! Shared application state for all routes.

use crate::service::BookService;
use crate::store::BookRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub books: BookService,
}

impl AppState {
    pub fn new(repo: Arc<dyn BookRepository>) -> Self {
        Self {
            books: BookService::new(repo),
        }
    }
}
