//! Root index endpoint

use axum::Json;
use serde_json::{json, Value};

/// Service banner listing the mounted route groups
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "API Server is running",
        "endpoints": {
            "students": "/students",
            "products": "/products",
        }
    }))
}
