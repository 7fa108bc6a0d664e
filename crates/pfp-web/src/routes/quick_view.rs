use std::sync::Arc;

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use pfp_core::detail::{fetch_detail, DetailOutcome};
use pfp_core::display::{QuickView, EVENTS_HEADING, NO_EVENTS};
use serde::Deserialize;

use crate::error::AppError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/quick-view", get(quick_view))
}

#[derive(Template)]
#[template(path = "quick_view.html")]
struct QuickViewTemplate {
    view: QuickView,
    empty: bool,
    failure: Option<String>,
    events_heading: &'static str,
    no_events: &'static str,
}

#[derive(Deserialize)]
pub struct QuickViewParams {
    uuid: Option<String>,
}

/// Body of the shared Quick View dialog for one identity.
async fn quick_view(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuickViewParams>,
) -> Result<Html<String>, AppError> {
    let identifier = params.uuid.unwrap_or_default();
    if identifier.is_empty() {
        return Ok(Html(String::new()));
    }

    let outcome = fetch_detail(&state.client, &identifier).await;
    let (sources, empty, failure) = match outcome {
        DetailOutcome::Loaded(sources) => (sources, false, None),
        DetailOutcome::Empty => (Vec::new(), true, None),
        DetailOutcome::Failed(msg) => (Vec::new(), false, Some(msg)),
    };

    let tmpl = QuickViewTemplate {
        view: QuickView::build(&sources, &state.registry, &state.config.map),
        empty,
        failure,
        events_heading: EVENTS_HEADING,
        no_events: NO_EVENTS,
    };
    Ok(Html(tmpl.render()?))
}
