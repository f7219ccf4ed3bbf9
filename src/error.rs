use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::ErrorStatusMode;

/// Failures produced by catalog operations, independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid inventory value")]
    InvalidInventory,
    #[error("Invalid product type")]
    InvalidType,
    #[error("Product not found")]
    NotFound,
}

/// HTTP-facing error kinds.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Bind the error to the request it answers.
    pub fn at(self, path: impl Into<String>, mode: ErrorStatusMode) -> ApiError {
        ApiError {
            error: self,
            path: path.into(),
            mode,
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidInventory | CatalogError::InvalidType => {
                Self::BadRequest(err.to_string())
            }
            CatalogError::NotFound => Self::NotFound(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON body of every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponseBody {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub path: String,
}

/// An [`AppError`] plus the request path and reporting mode needed to render it.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub path: String,
    pub mode: ErrorStatusMode,
}

impl ApiError {
    pub fn body(&self) -> ErrorResponseBody {
        let status = match self.mode {
            ErrorStatusMode::Actual => self.error.status(),
            ErrorStatusMode::Legacy => StatusCode::BAD_REQUEST,
        };
        ErrorResponseBody {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            status: status.as_u16(),
            error: self.error.to_string(),
            path: self.path.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        tracing::warn!(
            status = status.as_u16(),
            path = %self.path,
            error = %self.error,
            "Request failed"
        );
        (status, Json(self.body())).into_response()
    }
}

pub type AppResult<T> = Result<T, ApiError>;
