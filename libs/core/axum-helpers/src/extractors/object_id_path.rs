//! ObjectId path parameter extractor with automatic validation.

use crate::errors::{ErrorCode, ErrorResponse};
use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;

/// Extractor for ObjectId path parameters.
///
/// Parses the path parameter as a 24-character hexadecimal ObjectId and
/// rejects anything else with a 400 response, so malformed identifiers
/// never reach the store.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::ObjectIdPath;
///
/// async fn get_product(ObjectIdPath(id): ObjectIdPath) -> String {
///     format!("Product ID: {}", id)
/// }
///
/// let app = Router::new().route("/products/{id}", get(get_product));
/// ```
pub struct ObjectIdPath(pub ObjectId);

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        match ObjectId::parse_str(&id) {
            Ok(oid) => Ok(ObjectIdPath(oid)),
            Err(_) => {
                let body = Json(ErrorResponse::new(
                    ErrorCode::InvalidObjectId,
                    format!("Invalid id format: {}", id),
                ));
                Err((StatusCode::BAD_REQUEST, body).into_response())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use super::ObjectIdPath;

    fn app() -> Router {
        async fn handler(ObjectIdPath(id): ObjectIdPath) -> String {
            id.to_hex()
        }
        Router::new().route("/{id}", get(handler))
    }

    #[tokio::test]
    async fn test_accepts_valid_object_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/507f1f77bcf86cd799439011")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_accepts_uppercase_hex() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/507F1F77BCF86CD799439011")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_short_id() {
        let response = app()
            .oneshot(Request::builder().uri("/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_23_hex_chars() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/507f1f77bcf86cd79943901")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_non_hex_characters() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/507f1f77bcf86cd79943901z")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
