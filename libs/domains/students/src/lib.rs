//! Students Domain
//!
//! Domain implementation for managing students using MongoDB. Follows the
//! same layered layout as the products domain: handlers over a service over
//! a repository trait with a MongoDB implementation.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{StudentError, StudentResult};
pub use handlers::ApiDoc;
pub use models::{CreateStudent, Student, UpdateStudent};
pub use mongodb::MongoStudentRepository;
pub use repository::StudentRepository;
pub use service::StudentService;
