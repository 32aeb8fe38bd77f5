use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;

/// Error taxonomy for every handler. Each variant maps to one HTTP status and
/// a JSON `{"error": ...}` body. All checks run before any store mutation, so
/// a rejected operation leaves every entity untouched.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input; recoverable by resubmission.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Expired token. Distinguished from other 401s so the client can force
    /// re-authentication instead of blindly retrying.
    #[error("token expired")]
    TokenExpired,

    /// Wrong role or non-owner actor; retrying cannot help.
    #[error("{0}")]
    Forbidden(String),

    /// Referenced gig/proposal/user is absent; may indicate a stale view.
    #[error("{0}")]
    NotFound(String),

    /// A precondition on current status or uniqueness failed. The caller must
    /// re-fetch before deciding whether to retry.
    #[error("{0}")]
    Conflict(String),

    /// Store failure; surfaced as "try again later".
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    /// Payment gateway failure; surfaced as "try again later".
    #[error("payment gateway error: {0}")]
    Gateway(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::TokenExpired => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self, ApiError::Database(_)) {
            tracing::error!("{self}");
        }
        let mut body = serde_json::json!({ "error": self.to_string() });
        if matches!(self, ApiError::TokenExpired) {
            body["code"] = serde_json::json!("token_expired");
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Gateway("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
