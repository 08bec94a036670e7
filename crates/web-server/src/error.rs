use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DbError;
use projection::ProjectionError;
use serde_json::json;
use thiserror::Error;

pub const NO_ASSUMPTIONS_MESSAGE: &str =
    "No assumptions configured yet. Set up your assumptions first.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Invalid tenant: {0}")]
    Tenant(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// The body is always `{ "error": message }`, plus `"field"` when a single
/// input can be blamed.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, field) = match self {
            AppError::Database(DbError::NotFound) => (
                StatusCode::NOT_FOUND,
                NO_ASSUMPTIONS_MESSAGE.to_string(),
                None,
            ),
            AppError::Database(DbError::Invalid(err)) => {
                tracing::warn!(error = %err, "Rejected assumptions.");
                let field = err.field().to_string();
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string(), Some(field))
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                    None,
                )
            }
            AppError::Projection(ProjectionError::Export(message)) => {
                tracing::error!(error = %message, "Export error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The projection could not be exported".to_string(),
                    None,
                )
            }
            AppError::Projection(err) => {
                tracing::warn!(error = %err, "Projection rejected.");
                let field = err.field().map(str::to_string);
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string(), field)
            }
            AppError::Config(config_err) => {
                tracing::error!(error = ?config_err, "Configuration error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A server configuration error occurred".to_string(),
                    None,
                )
            }
            AppError::Body(rejection) => {
                // Syntax and type errors alike are reported as unprocessable input.
                let status = match rejection {
                    JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    _ => rejection.status(),
                };
                (status, rejection.body_text(), None)
            }
            AppError::Tenant(message) => (StatusCode::BAD_REQUEST, message, None),
        };

        let body = match field {
            Some(field) => json!({ "error": error_message, "field": field }),
            None => json!({ "error": error_message }),
        };
        (status, Json(body)).into_response()
    }
}
