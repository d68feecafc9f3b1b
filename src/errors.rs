use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde::Serialize;

/// Request-boundary error taxonomy. Every store or validation failure is
/// mapped to one of these before it leaves a handler; database details are
/// logged server-side and never returned to the caller.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Authentication required")]
    Unauthenticated,
    #[display(fmt = "Insufficient permissions")]
    Forbidden,
    #[display(fmt = "{}", _0)]
    Validation(String),
    #[display(fmt = "Attendance already logged for this date")]
    DuplicateAttendance,
    #[display(fmt = "User with this email already exists")]
    DuplicateEmail,
    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),
    #[display(fmt = "Internal Server Error")]
    Internal(&'static str),
    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) | ApiError::DuplicateAttendance | ApiError::DuplicateEmail => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Database(e) => tracing::error!(error = %e, "Database error"),
            ApiError::Internal(detail) => tracing::error!(detail, "Internal error"),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

/// MySQL signals unique-key violations with SQLSTATE 23000. The store-level
/// unique constraints are the authoritative duplicate enforcement; this is
/// how their violations are recognized and mapped to 400s.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23000"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::DuplicateAttendance.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("leave request").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_detail_is_not_exposed() {
        let err = ApiError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), "Internal Server Error");
    }
}
