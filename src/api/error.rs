//! API error handling for the login service.
//!
//! Every non-200 response shares one body shape, `{ "success": false, "message": ... }`.
//! Messages are fixed per error class so that nothing about the cause leaks
//! to the client; details go to the log instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::crypto::PasswordError;
use crate::db::FailureBody;

pub const VALIDATION_FAILED_MESSAGE: &str = "Validación fallida: email inválido o password vacío";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email o contraseña incorrectos";
pub const LOGIN_FAILED_MESSAGE: &str = "Error procesando login";

/// Error codes for API responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Client errors (4xx)
    ValidationError,
    Unauthorized,

    // Server errors (5xx)
    InternalError,
    DatabaseError,
}

impl ErrorCode {
    /// Get the default HTTP status code for this error code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the string representation of the error code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "validation_error",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::InternalError => "internal_error",
            ErrorCode::DatabaseError => "database_error",
        }
    }
}

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create a new API error with a specific code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: code.status_code(),
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(FailureBody::new(self.message))).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// Why a login attempt did not produce a success response.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("request payload failed validation")]
    Validation,
    /// Unknown email and wrong password both end up here.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl LoginError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoginError::Validation => ErrorCode::ValidationError,
            LoginError::InvalidCredentials => ErrorCode::Unauthorized,
            LoginError::Database(_) => ErrorCode::DatabaseError,
            LoginError::Password(_) => ErrorCode::InternalError,
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        let code = err.code();
        match err {
            LoginError::Validation => ApiError::new(code, VALIDATION_FAILED_MESSAGE),
            LoginError::InvalidCredentials => ApiError::new(code, INVALID_CREDENTIALS_MESSAGE),
            LoginError::Database(_) | LoginError::Password(_) => {
                tracing::error!(code = code.as_str(), "Login processing failed: {}", err);
                ApiError::new(code, LOGIN_FAILED_MESSAGE)
            }
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
