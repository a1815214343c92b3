//! Students API routes

use axum::Router;
use domain_students::{handlers, MongoStudentRepository, StudentService};

use crate::state::AppState;

/// Create students router
pub fn router(state: &AppState) -> Router {
    let repository = MongoStudentRepository::new(&state.db);
    let service = StudentService::new(repository);
    handlers::router(service)
}

/// Initialize students indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoStudentRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}
