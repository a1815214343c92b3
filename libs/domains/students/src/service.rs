//! Student Service - Business logic layer

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use crate::error::{StudentError, StudentResult};
use crate::models::{CreateStudent, Student, UpdateStudent};
use crate::repository::StudentRepository;

pub struct StudentService<R: StudentRepository> {
    repository: Arc<R>,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new student
    #[instrument(skip(self, input), fields(student_name = %input.name))]
    pub async fn create_student(&self, input: CreateStudent) -> StudentResult<Student> {
        input
            .validate()
            .map_err(|e| StudentError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// List all students, newest first
    #[instrument(skip(self))]
    pub async fn list_students(&self) -> StudentResult<Vec<Student>> {
        self.repository.list_all().await
    }

    /// Get a student by ID
    #[instrument(skip(self))]
    pub async fn get_student(&self, id: ObjectId) -> StudentResult<Student> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(StudentError::NotFound)
    }

    /// Update an existing student
    #[instrument(skip(self, input))]
    pub async fn update_student(&self, id: ObjectId, input: UpdateStudent) -> StudentResult<Student> {
        input
            .validate()
            .map_err(|e| StudentError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a student, returning the deleted document
    #[instrument(skip(self))]
    pub async fn delete_student(&self, id: ObjectId) -> StudentResult<Student> {
        self.repository.delete(id).await
    }
}

impl<R: StudentRepository> Clone for StudentService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockStudentRepository;
    use mockall::predicate::eq;

    fn sample_create() -> CreateStudent {
        CreateStudent {
            name: "Maya Chen".to_string(),
            age: 21,
            course: "Physics".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_student_delegates_to_repository() {
        let mut repo = MockStudentRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|input| Ok(Student::new(input)));

        let service = StudentService::new(repo);
        let student = service.create_student(sample_create()).await.expect("create");
        assert_eq!(student.name, "Maya Chen");
    }

    #[tokio::test]
    async fn test_create_student_rejects_zero_age() {
        let mut repo = MockStudentRepository::new();
        repo.expect_create().never();

        let service = StudentService::new(repo);
        let mut input = sample_create();
        input.age = 0;

        let err = service.create_student(input).await.expect_err("invalid");
        assert!(matches!(err, StudentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_student_maps_missing_to_not_found() {
        let id = ObjectId::new();
        let mut repo = MockStudentRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(None));

        let service = StudentService::new(repo);
        let err = service.get_student(id).await.expect_err("missing");
        assert!(matches!(err, StudentError::NotFound));
    }
}
