use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudentError {
    #[error("Student not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type StudentResult<T> = Result<T, StudentError>;

impl From<StudentError> for AppError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::NotFound => AppError::NotFound("Student not found".to_string()),
            StudentError::Validation(msg) => AppError::BadRequest(msg),
            StudentError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for StudentError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for StudentError {
    fn from(err: mongodb::error::Error) -> Self {
        StudentError::Database(err.to_string())
    }
}
