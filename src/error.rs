use serde::{Deserialize, Serialize};
use std::fmt;

use crate::agents::DelegateError;

// ============================================================================
// Main Error Type
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    // Convenience constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    pub fn delegate(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DelegateError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

// ============================================================================
// Error Codes
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    // Client errors (4xx)
    BadRequest,
    ValidationError,

    // Server errors (5xx)
    Internal,
    ConfigurationError,
    DelegateError,
    DelegateTimeout,
}

impl ErrorCode {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::ValidationError => 400,
            Self::Internal => 500,
            Self::ConfigurationError => 500,
            Self::DelegateError => 500,
            Self::DelegateTimeout => 504,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }

    pub fn is_server_error(&self) -> bool {
        self.http_status() >= 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Internal => "INTERNAL_ERROR",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::DelegateError => "DELEGATE_ERROR",
            Self::DelegateTimeout => "DELEGATE_TIMEOUT",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

pub type Result<T> = std::result::Result<T, AppError>;

// ============================================================================
// Error Response for HTTP
// ============================================================================

/// Wire envelope for failures. Both endpoints (and the dashboard banner)
/// surface errors in exactly this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

impl From<&AppError> for ErrorEnvelope {
    fn from(err: &AppError) -> Self {
        Self::new(err.message.clone())
    }
}

// ============================================================================
// Error Conversion Implementations
// ============================================================================

impl From<DelegateError> for AppError {
    fn from(err: DelegateError) -> Self {
        match err {
            DelegateError::Timeout(secs) => Self::new(
                ErrorCode::DelegateTimeout,
                format!("Delegate call exceeded {} second timeout", secs),
            ),
            DelegateError::Cancelled => {
                Self::new(ErrorCode::DelegateError, "Delegate call cancelled")
            }
            DelegateError::Provider(message) => Self::new(ErrorCode::DelegateError, message),
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        Self::configuration(format!("Environment error: {}", err))
    }
}

// ============================================================================
// Backend-specific HTTP Response Conversion
// ============================================================================

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;

        let status = StatusCode::from_u16(self.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(ErrorEnvelope::from(&self))).into_response()
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn log_error(error: &AppError) {
    if error.code.is_server_error() {
        log::error!("{}", error);
    } else {
        log::warn!("{}", error);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AppError::validation("Missing 'stock_symbol' in request");
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("stock_symbol"));
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ValidationError.http_status(), 400);
        assert_eq!(ErrorCode::DelegateError.http_status(), 500);
        assert_eq!(ErrorCode::DelegateTimeout.http_status(), 504);
    }

    #[test]
    fn test_error_classification() {
        assert!(ErrorCode::BadRequest.is_client_error());
        assert!(ErrorCode::DelegateError.is_server_error());
        assert!(ErrorCode::ConfigurationError.is_server_error());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::delegate("provider unavailable");
        let display = format!("{}", err);
        assert!(display.contains("DELEGATE_ERROR"));
        assert!(display.contains("provider unavailable"));
    }

    #[test]
    fn test_envelope_shape() {
        let err = AppError::bad_request("Invalid JSON payload");
        let json = serde_json::to_value(ErrorEnvelope::from(&err)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Invalid JSON payload");
    }

    #[test]
    fn test_delegate_error_conversion() {
        let err: AppError = DelegateError::Timeout(120).into();
        assert_eq!(err.code, ErrorCode::DelegateTimeout);
        assert!(err.message.contains("120"));

        let err: AppError = DelegateError::Provider("rate limited".to_string()).into();
        assert_eq!(err.code, ErrorCode::DelegateError);
        assert_eq!(err.message, "rate limited");
    }
}
