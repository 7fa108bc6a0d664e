use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use pfp_core::client::PersonApi;
use pfp_core::model::{SearchResult, SourceDetail};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/persons", get(persons))
        .route("/api/v1/detail", get(detail))
}

#[derive(Debug, Deserialize)]
pub struct PersonsParams {
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    uuid: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PersonsResponse {
    /// `"ok"` or `"not_found"`.
    pub status: &'static str,
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    /// `"ok"` or `"empty"`.
    pub status: &'static str,
    pub sources: Vec<SourceDetail>,
}

async fn persons(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PersonsParams>,
) -> Result<Json<PersonsResponse>, ApiError> {
    let label = params
        .label
        .ok_or_else(|| ApiError::bad_request("missing query parameter: label"))?;
    let items = state.client.search(&state.client.query(&label)).await?;
    tracing::info!(label, items = items.len(), "api person search");

    Ok(Json(PersonsResponse {
        status: if items.is_empty() { "not_found" } else { "ok" },
        items,
    }))
}

async fn detail(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DetailParams>,
) -> Result<Json<DetailResponse>, ApiError> {
    let identifier = params
        .uuid
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing query parameter: uuid"))?;
    let sources = state.client.fetch_detail(&identifier).await?;

    Ok(Json(DetailResponse {
        status: if sources.is_empty() { "empty" } else { "ok" },
        sources,
    }))
}
