use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use recruit_shared::bsd::CrmError;
use recruit_shared::store::StoreError;
use thiserror::Error;

use crate::identity::IdentityError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Http { status: StatusCode, message: String },

    #[error("External sync failed: {0}")]
    ExternalSync(#[from] CrmError),

    #[error("Identity generation failed: {0}")]
    Identity(#[from] IdentityError),

    #[error("Persistence failed: {0}")]
    Persistence(StoreError),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn not_found(message: String) -> Self {
        Self::Http {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => AppError::not_found(message),
            other => AppError::Persistence(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "field": err.field, "error": err.error })),
            )
                .into_response(),
            AppError::Http { status, message } if !status.is_server_error() => {
                (status, Json(serde_json::json!({ "error": message }))).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Something went wrong" })),
                )
                    .into_response()
            }
        }
    }
}
