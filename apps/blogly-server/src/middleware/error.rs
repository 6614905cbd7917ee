//! Error handling - HTML error pages built from RFC 7807 problem details.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blogly_core::error::{DomainError, RepoError};
use blogly_shared::{ErrorResponse, FormError};
use std::fmt;

/// Application-level error type that converts to HTML error pages.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        }
    }
}

fn error_page(problem: &ErrorResponse) -> String {
    let title = tera::escape_html(&problem.title);
    let detail = problem
        .detail
        .as_deref()
        .map(|d| format!("    <p>{}</p>\n", tera::escape_html(d)))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"utf-8\">\n    \
         <title>{status} {title} | Blogly</title>\n</head>\n<body>\n    \
         <h1>{status} {title}</h1>\n{detail}    <p><a href=\"/users\">Back to users</a></p>\n\
         </body>\n</html>\n",
        status = problem.status,
    )
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(error_page(&self.problem()))
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_page_escapes_detail() {
        let page = error_page(&ErrorResponse::not_found("<script>"));
        assert!(page.contains("<h1>404 Not Found</h1>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn repo_errors_map_to_statuses() {
        let conflict = AppError::from(RepoError::Constraint("duplicate tag".into()));
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let internal = AppError::from(RepoError::Query("syntax error".into()));
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing = AppError::from(DomainError::not_found("Post", 3));
        assert_eq!(missing.to_string(), "Not found: Post with id 3 not found");

        let invalid = AppError::from(DomainError::Validation("name too long".into()));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
    }
}
