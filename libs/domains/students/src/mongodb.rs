//! MongoDB implementation of StudentRepository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::{StudentError, StudentResult};
use crate::models::{CreateStudent, Student, UpdateStudent};
use crate::repository::StudentRepository;

pub struct MongoStudentRepository {
    collection: Collection<Student>,
}

impl MongoStudentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Student>("students");
        Self { collection }
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Student>(collection_name);
        Self { collection }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> StudentResult<()> {
        let indexes = vec![IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("idx_created_at".to_string())
                    .build(),
            )
            .build()];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Student indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<Student> {
        &self.collection
    }
}

#[async_trait]
impl StudentRepository for MongoStudentRepository {
    #[instrument(skip(self, input), fields(student_name = %input.name))]
    async fn create(&self, input: CreateStudent) -> StudentResult<Student> {
        let student = Student::new(input);

        self.collection.insert_one(&student).await?;

        tracing::info!(student_id = %student.id, "Student created successfully");
        Ok(student)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> StudentResult<Option<Student>> {
        let student = self
            .collection
            .find_one(doc! { "_id": id.to_hex() })
            .await?;
        Ok(student)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> StudentResult<Vec<Student>> {
        use futures_util::TryStreamExt;

        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let students: Vec<Student> = cursor.try_collect().await?;

        Ok(students)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateStudent) -> StudentResult<Student> {
        let mut updated = self
            .collection
            .find_one(doc! { "_id": id.to_hex() })
            .await?
            .ok_or(StudentError::NotFound)?;
        updated.apply_update(input);

        self.collection
            .replace_one(doc! { "_id": id.to_hex() }, &updated)
            .await?;

        tracing::info!(student_id = %id, "Student updated successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> StudentResult<Student> {
        let deleted = self
            .collection
            .find_one_and_delete(doc! { "_id": id.to_hex() })
            .await?
            .ok_or(StudentError::NotFound)?;

        tracing::info!(student_id = %id, "Student deleted successfully");
        Ok(deleted)
    }
}
