/**
 * Error Conversion
 *
 * This module converts domain errors into HTTP responses. It is the only
 * place where domain failures meet HTTP status codes; services and db
 * modules never talk HTTP directly.
 *
 * # Response Format
 *
 * Error responses use the same envelope shape as successes, with `data`
 * set to null:
 *
 * ```json
 * {
 *   "code": 404,
 *   "data": null,
 *   "msg": "article not found",
 *   "timestamp": 1756250000000
 * }
 * ```
 */

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::types::DomainError;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let DomainError::Database(err) = &self {
            tracing::error!("Database error: {:?}", err);
        }

        let body = serde_json::json!({
            "code": status.as_u16(),
            "data": null,
            "msg": self.message(),
            "timestamp": chrono::Utc::now().timestamp_millis(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .unwrap()
            })
    }
}
