use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::r2d2;
use diesel::result::DatabaseErrorKind;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidFormat,
    InvalidToken(String),
    InvalidApiKey,
    InvalidMagicLink(String),
    Forbidden,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Authorization header required"),
            AuthError::InvalidFormat => write!(f, "Invalid Authorization format"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AuthError::InvalidApiKey => write!(f, "Invalid or inactive merchant API key"),
            AuthError::InvalidMagicLink(msg) => write!(f, "Invalid magic link: {}", msg),
            AuthError::Forbidden => write!(f, "Insufficient permissions"),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Database(diesel::result::Error),
    DatabaseConnection(String),
    Validation(validator::ValidationErrors),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Auth(AuthError),
    Token(String),
    Email(String),
    Export(String),
    Corsair(String),
    Internal(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    #[schema(example = "not_found")]
    pub code: String,
    #[schema(example = "Merchant not found")]
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::DatabaseConnection(e) => write!(f, "Database connection error: {}", e),
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::BadRequest(e) => write!(f, "Bad request: {}", e),
            ApiError::NotFound(e) => write!(f, "Not found: {}", e),
            ApiError::Conflict(e) => write!(f, "Conflict: {}", e),
            ApiError::Auth(e) => write!(f, "Authentication error: {}", e),
            ApiError::Token(e) => write!(f, "Token error: {}", e),
            ApiError::Email(e) => write!(f, "Email error: {}", e),
            ApiError::Export(e) => write!(f, "Export error: {}", e),
            ApiError::Corsair(e) => write!(f, "Corsair error: {}", e),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Database(diesel::result::Error::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Database(diesel::result::Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _,
            )) => StatusCode::CONFLICT,
            ApiError::Database(diesel::result::Error::DatabaseError(
                DatabaseErrorKind::CheckViolation | DatabaseErrorKind::ForeignKeyViolation,
                _,
            )) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::InvalidFormat) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Email(_) | ApiError::Corsair(_) => StatusCode::BAD_GATEWAY,
            ApiError::Token(_) | ApiError::Export(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Database(diesel::result::Error::NotFound) | ApiError::NotFound(_) => {
                "not_found"
            }
            ApiError::Database(_) => "database_error",
            ApiError::DatabaseConnection(_) => "database_unavailable",
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::Auth(AuthError::Forbidden) => "forbidden",
            ApiError::Auth(_) => "unauthorized",
            ApiError::Token(_) => "token_error",
            ApiError::Email(_) => "email_error",
            ApiError::Export(_) => "export_error",
            ApiError::Corsair(_) => "corsair_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<r2d2::PoolError> for ApiError {
    fn from(err: r2d2::PoolError) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        ApiError::Database(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Corsair(err.to_string())
    }
}

impl From<lettre::error::Error> for ApiError {
    fn from(err: lettre::error::Error) -> Self {
        ApiError::Email(err.to_string())
    }
}

impl From<lettre::address::AddressError> for ApiError {
    fn from(err: lettre::address::AddressError) -> Self {
        ApiError::Email(format!("invalid address: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for ApiError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        ApiError::Email(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::Export(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Export(err.to_string())
    }
}

impl From<ApiError> for (StatusCode, ApiErrorResponse) {
    fn from(err: ApiError) -> Self {
        let status = err.status_code();

        // server-side details stay in the logs
        let message = if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
            match &err {
                ApiError::DatabaseConnection(_) => "Service temporarily unavailable".to_string(),
                ApiError::Email(_) => "Email delivery failed".to_string(),
                ApiError::Corsair(_) => "Corsair export failed".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            err.to_string()
        };

        (
            status,
            ApiErrorResponse {
                code: err.code().to_string(),
                message,
            },
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body): (StatusCode, ApiErrorResponse) = self.into();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(
            ApiError::NotFound("merchant".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Database(diesel::result::Error::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Auth(AuthError::Forbidden).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Auth(AuthError::MissingHeader).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Conflict("gift code already used".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Corsair("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn hides_internal_details() {
        let (status, body): (StatusCode, ApiErrorResponse) =
            ApiError::Internal("secret stack trace".into()).into();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "internal_error");
        assert!(!body.message.contains("secret"));

        let (status, body): (StatusCode, ApiErrorResponse) =
            ApiError::BadRequest("amount must be positive".into()).into();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.message.contains("amount must be positive"));
    }
}
