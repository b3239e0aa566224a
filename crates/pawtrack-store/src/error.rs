use thiserror::Error;

/// Storage layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Row not found: {0}")]
    RowNotFound(uuid::Uuid),

    #[error(transparent)]
    CoreError(#[from] pawtrack_core::error::CoreError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
