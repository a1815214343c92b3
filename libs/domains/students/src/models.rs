use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Student entity - represents a student stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub age: i32,
    pub course: String,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new student. All fields are required.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudent {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub age: i32,
    #[validate(length(min = 1))]
    pub course: String,
}

/// DTO for partially updating a student
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudent {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub age: Option<i32>,
    #[validate(length(min = 1))]
    pub course: Option<String>,
}

impl Student {
    /// Create a new student from a CreateStudent DTO
    pub fn new(input: CreateStudent) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new().to_hex(),
            name: input.name.trim().to_string(),
            age: input.age,
            course: input.course.trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, leaving absent fields untouched
    pub fn apply_update(&mut self, update: UpdateStudent) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(course) = update.course {
            self.course = course.trim().to_string();
        }
        self.updated_at = Utc::now();
    }
}
