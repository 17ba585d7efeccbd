use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
};
use log::debug;

use super::{error::ApiError, state::AppState};
use crate::{
    model::{WorkerRecord, WorkerSubmission},
    store::{self, WorkerStore},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Search terms accepted by `GET /api/workers`. Repeated keys keep their first value.
#[derive(Debug, Default, PartialEq)]
pub struct WorkerSearchQuery {
    pub name: Option<String>,
    pub skill: Option<String>,
    pub city: Option<String>,
}

impl WorkerSearchQuery {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let pairs: Vec<(String, String)> = raw
            .and_then(|raw| serde_urlencoded::from_str(raw).ok())
            .unwrap_or_default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "skill" => &mut query.skill,
                "city" => &mut query.city,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

pub async fn list_workers<S: WorkerStore>(
    State(state): State<Arc<AppState<S>>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<WorkerRecord>>, ApiError> {
    let query = WorkerSearchQuery::parse(raw.as_deref());
    let workers = store::search_workers(
        &state.store,
        query.name.as_deref(),
        query.skill.as_deref(),
        query.city.as_deref(),
    )
    .await
    .map_err(ApiError::Search)?;

    Ok(Json(workers))
}

pub async fn create_worker<S: WorkerStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let submission = parse_submission(&headers, &body)?;
    let worker = store::create_worker(&state.store, submission).await?;

    Ok((StatusCode::CREATED, Json(worker)))
}

pub async fn health() -> &'static str {
    "ok"
}

/// Decodes a create body as a url-encoded form or, for anything else, as a JSON object.
pub fn parse_submission(headers: &HeaderMap, body: &[u8]) -> Result<WorkerSubmission, ApiError> {
    let is_form = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

    if is_form {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).map_err(|err| {
            debug!("rejecting form body: {err}");
            ApiError::MalformedPayload
        })?;
        return Ok(WorkerSubmission::from_form_pairs(pairs));
    }

    serde_json::from_slice(body).map_err(|err| {
        debug!("rejecting JSON body: {err}");
        ApiError::MalformedPayload
    })
}
