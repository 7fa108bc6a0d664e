pub mod api;
pub mod quick_view;
pub mod search;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(search::routes())
        .merge(quick_view::routes())
        .merge(api::routes())
        .fallback(not_found)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "api_url": state.client.search_url(),
        "sources": state.registry.entries().len(),
    }))
}

async fn not_found() -> (StatusCode, Html<String>) {
    let body = r#"<!doctype html>
<html><head><title>404 | PFP</title>
<style>body{font-family:system-ui;background:#f6f4ef;color:#2b2b2b;display:flex;justify-content:center;align-items:center;height:100vh;margin:0}
.box{text-align:center}
h1{font-size:4rem;color:#1d5fb5;margin:0}
p{color:#666;margin:0.5rem 0 1.5rem}
a{color:#1d5fb5;text-decoration:none;padding:0.5rem 1rem;border:1px solid #ccc;border-radius:8px}
a:hover{border-color:#1d5fb5}</style>
</head><body><div class="box"><h1>404</h1><p>This page doesn't exist.</p><a href="/">Back to search</a></div></body></html>"#;
    (StatusCode::NOT_FOUND, Html(body.to_string()))
}
