use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::r2d2;
use http::StatusCode;
use std::fmt;

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidFormat,
    InvalidToken(String),
    InvalidOtp,
    Forbidden,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Authorization header required"),
            AuthError::InvalidFormat => write!(f, "Invalid Authorization format"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AuthError::InvalidOtp => write!(f, "Invalid or expired OTP"),
            AuthError::Forbidden => write!(f, "Admin privileges required"),
        }
    }
}

impl std::error::Error for AuthError {}

#[derive(Debug)]
pub enum ApiError {
    Validation(validator::ValidationErrors),
    BadRequest(String),
    Auth(AuthError),
    Conflict(String),
    NotFound(String),
    Database(String),
    DatabaseConnection(String),
    Upstream(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::BadRequest(e) => write!(f, "Bad request: {}", e),
            ApiError::Auth(e) => write!(f, "Authentication error: {}", e),
            ApiError::Conflict(e) => write!(f, "Conflict: {}", e),
            ApiError::NotFound(e) => write!(f, "Not found: {}", e),
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::DatabaseConnection(e) => write!(f, "Database connection error: {}", e),
            ApiError::Upstream(e) => write!(f, "Upstream error: {}", e),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            ApiError::Auth(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<r2d2::PoolError> for ApiError {
    fn from(err: r2d2::PoolError) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => ApiError::NotFound("Record not found".into()),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::InvalidFormat) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) | ApiError::DatabaseConnection(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ApiError> for (StatusCode, String) {
    fn from(err: ApiError) -> Self {
        let status = err.status();
        let message = match err {
            // storage details stay in the logs
            ApiError::Database(_) | ApiError::DatabaseConnection(_) => {
                "Internal server error".to_string()
            }
            ApiError::Auth(e) => e.to_string(),
            ApiError::Validation(e) => format!("Validation error: {}", e),
            ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::NotFound(msg)
            | ApiError::Upstream(msg)
            | ApiError::Internal(msg) => msg,
        };
        (status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Database(_) | ApiError::DatabaseConnection(_)) {
            tracing::error!(error = %self, "storage failure");
        }
        let (status, message): (StatusCode, String) = self.into();
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_maps_to_403() {
        assert_eq!(
            ApiError::Auth(AuthError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn database_errors_hide_details() {
        let (status, body): (StatusCode, String) =
            ApiError::Database("relation \"users\" does not exist".into()).into();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
    }

    #[test]
    fn diesel_not_found_becomes_not_found() {
        let err = ApiError::from(diesel::result::Error::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
