//! Router builders.

mod book;
mod common;

pub use book::book_routes;
pub use common::common_routes_with_ready;

use crate::settings::Settings;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

/// Full application router: common routes plus `/books`. The body limit is
/// enforced by the JSON extractor so oversized bodies get the standard error body.
pub fn app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(book_routes(state))
        .layer(DefaultBodyLimit::max(settings.body_limit))
        .layer(TraceLayer::new_for_http())
}
