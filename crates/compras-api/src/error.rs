//! API error handling
//!
//! Every failure leaves the service as a JSON body `{code, msg}` with a
//! numeric error code and a matching HTTP status. Validation failures add
//! `errors`, the per-field messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use compras_ledger::{FieldErrors, LedgerError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Request Errors (-1100 to -1199)
    // =========================================================================
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    // =========================================================================
    // Resource Errors (-4000 to -4099)
    // =========================================================================
    #[error("Resource not found: {0}")]
    NotFound(String),

    // =========================================================================
    // Internal Errors (-5000 to -5099)
    // =========================================================================
    #[error("Database error")]
    DatabaseError,
}

impl ApiError {
    pub fn error_code(&self) -> i32 {
        match self {
            Self::BadRequest(_) => -1100,
            Self::InvalidParameter(_) => -1101,
            Self::Validation(_) => -1102,
            Self::NotFound(_) => -4000,
            Self::DatabaseError => -5002,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code
    pub code: i32,
    /// Human-readable error message
    pub msg: String,
    /// Field-level messages for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
    /// Request ID for tracking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let errors = match err {
            ApiError::Validation(fields) => serde_json::to_value(fields).ok(),
            _ => None,
        };

        Self {
            code: err.error_code(),
            msg: err.to_string(),
            errors,
            request_id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(fields) => Self::Validation(fields),
            LedgerError::PartidaNotFound { partida } => Self::NotFound(format!("partida {}", partida)),
            LedgerError::InvalidArgument(msg) => Self::InvalidParameter(msg),
            LedgerError::Persistence(e) => e.into(),
        }
    }
}

impl From<compras_db::DbError> for ApiError {
    fn from(err: compras_db::DbError) -> Self {
        tracing::error!(error = ?err, "Database error");
        Self::DatabaseError
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!("{}: {}", field, e.message.as_ref().map(|m| m.as_ref()).unwrap_or("invalid"))
                })
            })
            .collect();
        Self::InvalidParameter(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound("partida 999".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidParameter("fondo".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation(FieldErrors::new()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::DatabaseError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_ledger_errors_map_to_api_errors() {
        let err: ApiError = LedgerError::PartidaNotFound { partida: "999".into() }.into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = LedgerError::InvalidArgument("fondo must not be negative".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = LedgerError::Persistence(compras_db::DbError::Connection("closed".into())).into();
        assert!(matches!(err, ApiError::DatabaseError));
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let err = ApiError::Validation(FieldErrors::single("importe", "importe is required"));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, -1102);
        assert_eq!(body.errors, Some(serde_json::json!({ "importe": ["importe is required"] })));
    }

    #[test]
    fn test_storage_details_are_not_exposed() {
        let err: ApiError = compras_db::DbError::Connection("sqlite://secret/path".into()).into();
        assert_eq!(ErrorResponse::from(&err).msg, "Database error");
    }
}
