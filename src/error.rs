use thiserror::Error;

use crate::storage::StorageError;

pub type ServiceResult<T> = core::result::Result<T, ServiceError>;

/// Failure taxonomy of the CRUD service: a referenced record does not
/// exist, or the persistence write behind a mutation failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Course not found: {0}")]
    CourseNotFound(String),
    #[error("Post not found: {0}")]
    PostNotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
