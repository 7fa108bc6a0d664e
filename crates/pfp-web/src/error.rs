use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use pfp_core::error::PfpError;

/// Application error type that renders as an HTML error page.
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Whether the error chain says the PFP API could not be reached.
    fn is_api_unavailable(&self) -> bool {
        if self
            .0
            .chain()
            .filter_map(|e| e.downcast_ref::<PfpError>())
            .any(PfpError::is_unreachable)
        {
            return true;
        }
        let msg = format!("{:#}", self.0).to_lowercase();
        msg.contains("connection refused") || msg.contains("dns error") || msg.contains("timed out")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("web error: {:#}", self.0);

        if self.is_api_unavailable() {
            let body = r#"<!doctype html>
<html><head><title>PFP API unavailable</title>
<style>body{font-family:system-ui;background:#f6f4ef;color:#2b2b2b;display:flex;justify-content:center;align-items:center;height:100vh;margin:0}
.box{text-align:center;max-width:500px}
h1{font-size:2.2rem;color:#b5651d;margin:0}
p{color:#666;margin:0.5rem 0}
.retry{margin-top:1.5rem}
a{color:#1d5fb5;text-decoration:none;padding:0.5rem 1rem;border:1px solid #ccc;border-radius:8px}
a:hover{border-color:#1d5fb5}</style>
</head><body><div class="box"><h1>PFP API unavailable</h1>
<p>The person search service did not respond. Check <code>api.search_url</code> in your config.</p>
<div class="retry"><a href="javascript:location.reload()">Retry</a></div>
</div></body></html>"#;
            return (StatusCode::SERVICE_UNAVAILABLE, Html(body.to_string())).into_response();
        }

        let body = format!(
            r#"<!doctype html>
<html><head><title>Error</title>
<style>body{{font-family:system-ui;background:#f6f4ef;color:#2b2b2b;display:flex;justify-content:center;align-items:center;height:100vh;margin:0}}
.err{{background:#fff;padding:2rem;border-radius:8px;border-left:4px solid #c0392b;max-width:600px}}
h1{{color:#c0392b;margin-top:0}}pre{{white-space:pre-wrap;color:#555}}</style>
</head><body><div class="err"><h1>Something went wrong</h1><pre>{}</pre>
<p><a href="/" style="color:#1d5fb5">Back to search</a></p></div></body></html>"#,
            html_escape(&format!("{:#}", self.0))
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// JSON API error type for REST endpoints.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<PfpError> for ApiError {
    fn from(err: PfpError) -> Self {
        tracing::warn!("api error: {}", err);
        if err.is_unreachable() {
            return Self::unavailable(err.to_string());
        }
        match &err {
            PfpError::InvalidUrl(_) | PfpError::InvalidInput(_) => Self::bad_request(err.to_string()),
            _ => Self::bad_gateway(err.to_string()),
        }
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
