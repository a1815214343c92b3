//! HTTP handlers for the Students API

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    ObjectIdPath, ValidatedJson,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::StudentResult;
use crate::models::{CreateStudent, Student, UpdateStudent};
use crate::repository::StudentRepository;
use crate::service::StudentService;

/// OpenAPI documentation for Students API
#[derive(OpenApi)]
#[openapi(
    paths(list_students, create_student, get_student, update_student, delete_student),
    components(
        schemas(Student, CreateStudent, UpdateStudent, StudentEnvelope, StudentList),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Students", description = "Student management endpoints")
    )
)]
pub struct ApiDoc;

/// Mutation response carrying the affected student
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentEnvelope {
    pub message: String,
    pub student: Student,
}

/// Counted student listing
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentList {
    pub count: usize,
    pub students: Vec<Student>,
}

/// Create the students router with all HTTP endpoints
pub fn router<R: StudentRepository + 'static>(service: StudentService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .with_state(shared_service)
}

/// List all students, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Students",
    responses(
        (status = 200, description = "Counted student listing", body = StudentList),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_students<R: StudentRepository>(
    State(service): State<Arc<StudentService<R>>>,
) -> StudentResult<Json<StudentList>> {
    let students = service.list_students().await?;
    Ok(Json(StudentList {
        count: students.len(),
        students,
    }))
}

/// Create a new student
#[utoipa::path(
    post,
    path = "",
    tag = "Students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created successfully", body = StudentEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_student<R: StudentRepository>(
    State(service): State<Arc<StudentService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateStudent>,
) -> StudentResult<impl IntoResponse> {
    let student = service.create_student(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(StudentEnvelope {
            message: "Student created successfully".to_string(),
            student,
        }),
    ))
}

/// Get a student by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Students",
    params(
        ("id" = String, Path, description = "Student ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_student<R: StudentRepository>(
    State(service): State<Arc<StudentService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> StudentResult<Json<Student>> {
    let student = service.get_student(id).await?;
    Ok(Json(student))
}

/// Partially update a student
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Students",
    params(
        ("id" = String, Path, description = "Student ID (24-character hex)")
    ),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated successfully", body = StudentEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_student<R: StudentRepository>(
    State(service): State<Arc<StudentService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateStudent>,
) -> StudentResult<Json<StudentEnvelope>> {
    let student = service.update_student(id, input).await?;
    Ok(Json(StudentEnvelope {
        message: "Student updated successfully".to_string(),
        student,
    }))
}

/// Delete a student, returning the deleted document
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Students",
    params(
        ("id" = String, Path, description = "Student ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Student deleted successfully", body = StudentEnvelope),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_student<R: StudentRepository>(
    State(service): State<Arc<StudentService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> StudentResult<Json<StudentEnvelope>> {
    let student = service.delete_student(id).await?;
    Ok(Json(StudentEnvelope {
        message: "Student deleted successfully".to_string(),
        student,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockStudentRepository;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use http_body_util::BodyExt;
    use mockall::predicate::eq;
    use mongodb::bson::oid::ObjectId;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn json_body(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("valid json")
    }

    fn sample_student() -> Student {
        Student::new(CreateStudent {
            name: "Maya Chen".to_string(),
            age: 21,
            course: "Physics".to_string(),
        })
    }

    fn app(repo: MockStudentRepository) -> Router {
        router(StudentService::new(repo))
    }

    #[tokio::test]
    async fn test_create_student_returns_201_with_envelope() {
        let mut repo = MockStudentRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|input| Ok(Student::new(input)));

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"name": "Maya Chen", "age": 21, "course": "Physics"}).to_string(),
            ))
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Student created successfully");
        assert_eq!(body["student"]["name"], "Maya Chen");
    }

    #[tokio::test]
    async fn test_create_student_missing_course_returns_400() {
        let mut repo = MockStudentRepository::new();
        repo.expect_create().never();

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(json!({"name": "Maya Chen", "age": 21}).to_string()))
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_students_returns_counted_listing() {
        let mut repo = MockStudentRepository::new();
        repo.expect_list_all()
            .times(1)
            .returning(|| Ok(vec![sample_student()]));

        let request = Request::builder()
            .uri("/")
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_get_student_with_malformed_id_returns_400() {
        let mut repo = MockStudentRepository::new();
        repo.expect_get_by_id().never();

        let request = Request::builder()
            .uri("/zzz")
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_student_unknown_id_returns_404() {
        let id = ObjectId::new();
        let mut repo = MockStudentRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(None));

        let request = Request::builder()
            .uri(format!("/{}", id.to_hex()))
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_student_returns_envelope() {
        let id = ObjectId::new();
        let mut repo = MockStudentRepository::new();
        repo.expect_update().times(1).returning(|_, input| {
            let mut student = sample_student();
            student.apply_update(input);
            Ok(student)
        });

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/{}", id.to_hex()))
            .header("content-type", "application/json")
            .body(Body::from(json!({"course": "Astronomy"}).to_string()))
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Student updated successfully");
        assert_eq!(body["student"]["course"], "Astronomy");
    }

    #[tokio::test]
    async fn test_delete_student_returns_deleted_document() {
        let student = sample_student();
        let id = ObjectId::parse_str(&student.id).expect("hex id");
        let mut repo = MockStudentRepository::new();
        let returned = student.clone();
        repo.expect_delete()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/{}", student.id))
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Student deleted successfully");
        assert_eq!(body["student"]["_id"], student.id);
    }
}
