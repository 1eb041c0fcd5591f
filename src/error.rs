use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("File upload error: {0}")]
    FileUpload(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    ValidatorError(#[from] validator::ValidationErrors),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::FileUpload(_)
            | AppError::ValidatorError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Serialization(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_message, error_code) = match &self {
            AppError::Authentication(msg) => (msg.clone(), "AUTHENTICATION_ERROR"),
            AppError::Authorization(msg) => (msg.clone(), "AUTHORIZATION_ERROR"),
            AppError::Validation(msg) => (msg.clone(), "VALIDATION_ERROR"),
            AppError::NotFound(msg) => (msg.clone(), "NOT_FOUND"),
            AppError::BadRequest(msg) => (msg.clone(), "BAD_REQUEST"),
            AppError::FileUpload(msg) => (msg.clone(), "FILE_UPLOAD_ERROR"),
            // Internal messages are written by us and never carry paths.
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (msg.clone(), "INTERNAL_ERROR")
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                ("Serialization error".to_string(), "SERIALIZATION_ERROR")
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                ("Internal server error".to_string(), "IO_ERROR")
            }
            AppError::ValidatorError(e) => {
                let validation_errors = e
                    .field_errors()
                    .iter()
                    .map(|(field, errors)| {
                        (
                            field.to_string(),
                            errors
                                .iter()
                                .map(|e| {
                                    e.message
                                        .as_ref()
                                        .map(|m| m.to_string())
                                        .unwrap_or_else(|| "Invalid value".to_string())
                                })
                                .collect::<Vec<_>>(),
                        )
                    })
                    .collect::<std::collections::HashMap<String, Vec<String>>>();

                return (
                    status,
                    Json(json!({
                        "error": "Validation failed",
                        "code": "VALIDATION_ERROR",
                        "details": validation_errors
                    })),
                )
                    .into_response();
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": error_code
        }));

        (status, body).into_response()
    }
}

// 便利函数，用于创建常见错误
impl AppError {
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(format!("{} not found", resource))
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::Authentication(msg.to_string())
    }

    pub fn forbidden(msg: &str) -> Self {
        Self::Authorization(msg.to_string())
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }

    pub fn internal(msg: &str) -> Self {
        Self::Internal(msg.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        Self::Validation(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::not_found("Post").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::forbidden("nope").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::unauthorized("who").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::bad_request("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::internal("disk").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found("Comment");
        assert_eq!(err.to_string(), "Not found: Comment not found");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err = AppError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "/var/secret/uploads/1_a.png",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("/var/secret"));
        assert!(text.contains("\"error\":\"Internal server error\""));
    }

    #[tokio::test]
    async fn test_internal_error_keeps_message() {
        let response = AppError::internal("Cannot save file").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Cannot save file");
        assert_eq!(value["code"], "INTERNAL_ERROR");
    }
}
