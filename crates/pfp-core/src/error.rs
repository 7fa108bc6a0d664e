use thiserror::Error;

/// Maximum number of body bytes quoted in an error message.
const BODY_PREVIEW_LEN: usize = 300;

#[derive(Debug, Error)]
pub enum PfpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PFP API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PfpError {
    /// Returns `true` when the PFP API could not be reached at all
    /// (connection refused, DNS failure, timeout).
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// Truncate a response body for inclusion in an error message.
pub(crate) fn body_preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

pub type Result<T> = std::result::Result<T, PfpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_preview_short() {
        assert_eq!(body_preview("not found"), "not found");
    }

    #[test]
    fn test_body_preview_truncates() {
        let body = "x".repeat(1000);
        assert_eq!(body_preview(&body).len(), BODY_PREVIEW_LEN);
    }

    #[test]
    fn test_body_preview_respects_char_boundary() {
        // 'ä' is two bytes, so byte 300 falls inside a character
        let body = format!("a{}", "ä".repeat(400));
        let preview = body_preview(&body);
        assert!(preview.len() <= BODY_PREVIEW_LEN);
        assert!(preview.starts_with('a'));
    }

    #[test]
    fn test_api_error_display() {
        let err = PfpError::Api {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "PFP API returned 502: bad gateway");
    }

    #[test]
    fn test_non_http_errors_are_reachable() {
        assert!(!PfpError::Decode("eof".into()).is_unreachable());
        assert!(!PfpError::InvalidInput("empty".into()).is_unreachable());
    }
}
