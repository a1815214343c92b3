//! API routes module

pub mod health;
pub mod index;
pub mod products;
pub mod students;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .route("/", get(index::root))
        .nest("/products", products::router(state))
        .nest("/students", students::router(state))
        .merge(health::router(state.clone()))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await?;
    students::init_indexes(state).await?;
    Ok(())
}
