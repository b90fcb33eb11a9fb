use bookshelf_db::DbError;
use bookshelf_http::AppError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Failures raised by the book store, queries, and service.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("The book with {0} is not found!")]
    NotFound(Uuid),

    #[error("The storage is empty!")]
    EmptyCollection,

    #[error("No books found for author '{0}'")]
    NoMatch(String),

    #[error("A book with id {0} already exists")]
    DuplicateId(Uuid),

    #[error("An id is required to update a book")]
    MissingId,

    #[error(transparent)]
    Storage(#[from] DbError),
}

pub type BookResult<T> = Result<T, BookError>;

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        let message = err.to_string();
        match err {
            BookError::NotFound(_) => AppError::not_found(message),
            BookError::EmptyCollection => {
                AppError::not_found_with_code("empty_collection", message)
            }
            BookError::NoMatch(_) => AppError::not_found_with_code("no_match", message),
            BookError::DuplicateId(id) => {
                AppError::conflict(vec![json!({"field": "id", "value": id})], message)
            }
            BookError::MissingId => {
                AppError::validation(vec![json!({"field": "id", "error": "required"})], message)
            }
            BookError::Storage(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn maps_domain_errors_to_statuses() {
        let cases = [
            (BookError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (BookError::EmptyCollection, StatusCode::NOT_FOUND),
            (BookError::NoMatch("Lee".into()), StatusCode::NOT_FOUND),
            (BookError::DuplicateId(Uuid::nil()), StatusCode::CONFLICT),
            (BookError::MissingId, StatusCode::UNPROCESSABLE_ENTITY),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn storage_errors_are_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = BookError::Storage(DbError::Io {
            path: "Data/Book.json".into(),
            source: io,
        });
        assert_eq!(AppError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
