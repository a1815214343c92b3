use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::StudentResult;
use crate::models::{CreateStudent, Student, UpdateStudent};

/// Repository trait for Student persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Create a new student
    async fn create(&self, input: CreateStudent) -> StudentResult<Student>;

    /// Get a student by ID
    async fn get_by_id(&self, id: ObjectId) -> StudentResult<Option<Student>>;

    /// List all students, newest first
    async fn list_all(&self) -> StudentResult<Vec<Student>>;

    /// Apply a partial update to an existing student
    async fn update(&self, id: ObjectId, input: UpdateStudent) -> StudentResult<Student>;

    /// Delete a student by ID, returning the deleted document
    async fn delete(&self, id: ObjectId) -> StudentResult<Student>;
}
