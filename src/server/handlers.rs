use super::error::RequestError;
use super::response::OpenResponse;
use super::AppState;
use crate::browser::{self, UrlOpener};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

/// GET `<any path>?url=<value>`
pub async fn open_from_query<O: UrlOpener + 'static>(
    State(state): State<Arc<AppState<O>>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<OpenResponse>, RequestError> {
    let url = url_from_query(&params)?;
    launch(&state, url).await
}

/// POST `<any path>` with `{"url": "<value>"}`
pub async fn open_from_body<O: UrlOpener + 'static>(
    State(state): State<Arc<AppState<O>>>,
    body: Bytes,
) -> Result<Json<OpenResponse>, RequestError> {
    let url = url_from_body(&body)?;
    launch(&state, &url).await
}

/// HEAD on any path
pub async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

async fn launch<O: UrlOpener>(
    state: &AppState<O>,
    url: &str,
) -> Result<Json<OpenResponse>, RequestError> {
    // One open operation at a time
    let _guard = state.launch_lock.lock().await;
    let url = browser::open_url(&state.opener, url).await?;
    Ok(Json(OpenResponse::success(url)))
}

/// First non-empty `url` parameter. A blank `url=` counts as missing.
pub(crate) fn url_from_query(params: &[(String, String)]) -> Result<&str, RequestError> {
    params
        .iter()
        .find(|(key, value)| key == "url" && !value.is_empty())
        .map(|(_, value)| value.as_str())
        .ok_or(RequestError::MissingQueryUrl)
}

pub(crate) fn url_from_body(body: &[u8]) -> Result<String, RequestError> {
    let data: Value = serde_json::from_slice(body).map_err(|_| RequestError::InvalidJson)?;

    // Non-object bodies have no `url` key either
    match data.get("url") {
        None | Some(Value::Null) => Err(RequestError::MissingBodyUrl),
        Some(Value::String(url)) if url.is_empty() => Err(RequestError::MissingBodyUrl),
        Some(Value::String(url)) => Ok(url.clone()),
        Some(_) => Err(RequestError::UrlNotString),
    }
}
