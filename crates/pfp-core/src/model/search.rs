use serde::{Deserialize, Serialize};

/// One person identity returned by the search endpoint, aggregating
/// the registries that describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Opaque identifier. The API delivers the detail document URL here.
    #[serde(rename = "uuid")]
    pub identifier: String,
    #[serde(default)]
    pub sources: Vec<SourceBrief>,
}

impl SearchResult {
    /// Source labels joined with `" / "`, in delivery order.
    pub fn header_text(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Summary of a single registry record, used in the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBrief {
    pub label: String,
    pub source: String,
}

/// Response body of the person search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

/// Parameters of one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub label: String,
    pub page: u32,
    pub size: u32,
}

impl SearchQuery {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_SIZE: u32 = 100;

    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            page: Self::DEFAULT_PAGE,
            size: Self::DEFAULT_SIZE,
        }
    }

    pub fn with_paging(mut self, page: u32, size: u32) -> Self {
        self.page = page;
        self.size = size;
        self
    }
}
