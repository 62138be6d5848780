//! Server binary: reads settings, prepares the store, mounts the routes.

use bookstore::{
    app, apply_migrations, ensure_database_exists, AppState, BookRepository, InMemoryBookRepository,
    PgBookRepository, Settings, StoreKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bookstore=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(env = ?settings.environment, store = ?settings.store, "starting bookstore");

    let repo: Arc<dyn BookRepository> = match settings.store {
        StoreKind::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            apply_migrations(&pool).await?;
            Arc::new(PgBookRepository::new(pool))
        }
        StoreKind::Memory => Arc::new(InMemoryBookRepository::new()),
    };

    let router = app(AppState::new(repo), &settings);
    let listener = TcpListener::bind(&settings.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
