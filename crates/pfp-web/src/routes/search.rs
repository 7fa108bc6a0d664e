use std::sync::Arc;

use askama::Template;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use pfp_core::display::{ResultView, NO_RESULTS};
use pfp_core::search::{run_search, try_search, SearchOutcome};
use serde::Deserialize;

use crate::error::AppError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/search", get(search))
}

/// Everything the result list needs to render one search.
pub struct ResultsPanel {
    pub results: Vec<ResultView>,
    pub not_found: bool,
    pub failure: Option<String>,
}

impl ResultsPanel {
    fn idle() -> Self {
        Self {
            results: Vec::new(),
            not_found: false,
            failure: None,
        }
    }

    fn from_outcome(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(items) => Self {
                results: items.iter().map(ResultView::from).collect(),
                ..Self::idle()
            },
            SearchOutcome::NotFound => Self {
                not_found: true,
                ..Self::idle()
            },
            SearchOutcome::Failed(msg) => Self {
                failure: Some(msg),
                ..Self::idle()
            },
        }
    }

    fn no_results_text(&self) -> &'static str {
        NO_RESULTS
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    label: String,
    panel: ResultsPanel,
}

#[derive(Template)]
#[template(path = "_results.html")]
struct ResultsTemplate {
    panel: ResultsPanel,
}

#[derive(Template)]
#[template(path = "_search_failed.html")]
struct SearchFailedTemplate {
    message: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    label: Option<String>,
}

async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let panel = match params.label.as_deref() {
        None => ResultsPanel::idle(),
        Some(label) => match try_search(&state.client, &state.client.query(label)).await {
            Ok(outcome) => ResultsPanel::from_outcome(outcome),
            // Without a running page there is nothing to keep, so an
            // unreachable API gets the full-page treatment.
            Err(e) if e.is_unreachable() => return Err(e.into()),
            Err(e) => ResultsPanel::from_outcome(SearchOutcome::Failed(e.to_string())),
        },
    };

    let tmpl = IndexTemplate {
        label: params.label.unwrap_or_default(),
        panel,
    };
    Ok(Html(tmpl.render()?))
}

/// htmx fragment for `#results`. A failed search is retargeted to the
/// status line so the results already on the page stay visible.
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let Some(label) = params.label else {
        let tmpl = ResultsTemplate {
            panel: ResultsPanel::idle(),
        };
        return Ok(Html(tmpl.render()?).into_response());
    };

    let outcome = run_search(&state.client, &state.client.query(&label)).await;
    if let SearchOutcome::Failed(message) = outcome {
        let tmpl = SearchFailedTemplate { message };
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("hx-retarget"),
            HeaderValue::from_static("#search-status"),
        );
        headers.insert(
            HeaderName::from_static("hx-reswap"),
            HeaderValue::from_static("innerHTML"),
        );
        return Ok((headers, Html(tmpl.render()?)).into_response());
    }

    let tmpl = ResultsTemplate {
        panel: ResultsPanel::from_outcome(outcome),
    };
    Ok(Html(tmpl.render()?).into_response())
}
