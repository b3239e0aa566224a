use salvo::http::StatusCode;
use salvo::writing::Json;
use serde::Serialize;
use thiserror::Error;

use pawtrack_core::error::CoreError;
use pawtrack_service::error::ServiceError;
use pawtrack_store::error::StoreError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    StoreError(#[from] StoreError),

    #[error(transparent)]
    CoreError(#[from] CoreError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    /// Client-facing status: validation maps to 400, missing targets to
    /// 404, ownership and access failures to 403, conflicts to 409.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(err) => service_status(err),
            Self::StoreError(err) => store_status(err),
            Self::CoreError(err) => core_status(err),
        }
    }
}

fn service_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::StoreError(err) => store_status(err),
        ServiceError::CoreError(err) => core_status(err),
        ServiceError::InvalidConfiguration(_) | ServiceError::InvariantViolation(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::RowNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::CoreError(err) => core_status(err),
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::ValidationError(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        CoreError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        CoreError::Conflict(_) => StatusCode::CONFLICT,
        CoreError::InvalidConfiguration(_) | CoreError::InvariantViolation(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// ## Summary
/// Renders an error as a JSON payload with its mapped status code.
pub fn render_error(res: &mut salvo::Response, err: &AppError) {
    let status = err.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = ?err, "Request failed");
    }
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: err.to_string(),
    }));
}
