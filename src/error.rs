use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::page::LoadError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid username or password")]
    AuthFailure,

    #[error("Reserved page URL: {0:?}")]
    ReservedSlug(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Missing pages, failed logins and reserved slugs are client errors, not 500s.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Load(LoadError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::AuthFailure => StatusCode::UNAUTHORIZED,
            AppError::ReservedSlug(_) => StatusCode::BAD_REQUEST,
            AppError::Load(_) | AppError::Store(_) | AppError::Render(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Errors answer with the raw error text as a plain-text body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!(status = %status, "{}", self);
        }

        (status, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
