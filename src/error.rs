use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::forward::validate::ValidationError;

#[derive(Debug)]
pub enum ProxyError {
    RateLimited { retry_after_ms: i64 },
    Validation(ValidationError),
    Cache(redis::RedisError),
    Database(sqlx::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<i64>,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ProxyError::RateLimited { retry_after_ms } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse {
                    message: "You are being rate limited.".to_string(),
                    code: None,
                    retry_after: Some(retry_after_ms),
                },
            ),
            ProxyError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: err.message,
                    code: err.code,
                    retry_after: None,
                },
            ),
            ProxyError::Cache(err) => {
                tracing::error!("Redis operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: "Internal Server Error".to_string(),
                        code: None,
                        retry_after: None,
                    },
                )
            }
            ProxyError::Database(err) => {
                tracing::error!("Database operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: "Internal Server Error".to_string(),
                        code: None,
                        retry_after: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ProxyError {
    fn from(err: ValidationError) -> Self {
        ProxyError::Validation(err)
    }
}

impl From<redis::RedisError> for ProxyError {
    fn from(err: redis::RedisError) -> Self {
        ProxyError::Cache(err)
    }
}

impl From<sqlx::Error> for ProxyError {
    fn from(err: sqlx::Error) -> Self {
        ProxyError::Database(err)
    }
}
