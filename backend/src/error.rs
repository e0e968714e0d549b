use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

pub type Result<T, E = MappingError> = std::result::Result<T, E>;

/// Failures that abort a request.
///
/// Validation problems met while walking the mapping wizard are reported
/// inside the wizard view instead; only the HTTP surface and the managers
/// return them as errors.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    SerDe(#[from] serde_json::Error),
    #[error("error reading source: {0}")]
    Csv(#[from] csv::Error),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ResponseError for MappingError {
    fn status_code(&self) -> StatusCode {
        match self {
            MappingError::Validation(_) => StatusCode::BAD_REQUEST,
            MappingError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            MappingError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MappingError::NotFound("birds".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(
            MappingError::from(io).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
