use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::errors::{RepoError, ValidationError, WorkerError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Error fetching workers")]
    Search(#[source] RepoError),

    #[error(transparent)]
    Create(#[from] WorkerError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedPayload => StatusCode::BAD_REQUEST,
            ApiError::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Create(WorkerError::Validation(_) | WorkerError::NoSkills) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Create(WorkerError::Conflict { .. }) => StatusCode::CONFLICT,
            ApiError::Create(WorkerError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::MalformedPayload => json!({ "message": "Malformed payload" }),
            ApiError::Search(err) => {
                error!("GET /api/workers error: {err}");
                json!({ "message": "Error fetching workers" })
            }
            ApiError::Create(WorkerError::Validation(ValidationError { issues })) => json!({ "errors": issues }),
            ApiError::Create(WorkerError::NoSkills) => json!({ "message": "At least one skill required" }),
            ApiError::Create(WorkerError::Conflict { .. }) => json!({ "message": "Duplicate key error" }),
            ApiError::Create(WorkerError::Store(err)) => {
                error!("POST /api/workers error: {err}");
                json!({ "message": "Error creating worker" })
            }
        };

        (status, Json(body)).into_response()
    }
}
