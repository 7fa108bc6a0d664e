use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use super::PersonApi;
use crate::config::ApiConfig;
use crate::error::{body_preview, PfpError, Result};
use crate::model::{DetailDocument, SearchPage, SearchQuery, SearchResult, SourceDetail};

/// HTTP client for the PFP API.
///
/// Search requests go to the configured `search_url`; detail requests go
/// to whatever URL the search response put in a result's `uuid`, resolved
/// against `search_url` when relative.
#[derive(Debug, Clone)]
pub struct PfpClient {
    search_url: Url,
    page: u32,
    page_size: u32,
    http: reqwest::Client,
}

impl PfpClient {
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let search_url = Url::parse(&config.search_url)
            .map_err(|e| PfpError::InvalidUrl(format!("{}: {e}", config.search_url)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            search_url,
            page: config.page,
            page_size: config.page_size,
            http,
        })
    }

    pub fn search_url(&self) -> &str {
        self.search_url.as_str()
    }

    /// Query for `label` using the configured paging.
    pub fn query(&self, label: &str) -> SearchQuery {
        SearchQuery::new(label).with_paging(self.page, self.page_size)
    }

    /// Resolve a result identifier to the URL its detail document lives at.
    /// Only URLs on the API's own origin (scheme, host and port of
    /// `search_url`) are accepted.
    pub fn detail_url(&self, identifier: &str) -> Result<Url> {
        let url = self
            .search_url
            .join(identifier)
            .map_err(|e| PfpError::InvalidUrl(format!("{identifier}: {e}")))?;
        if url.origin() != self.search_url.origin() {
            return Err(PfpError::InvalidUrl(format!(
                "{identifier}: not on the PFP API origin {}",
                self.search_url.origin().ascii_serialization()
            )));
        }
        Ok(url)
    }

    fn search_request_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("page", &query.page.to_string())
            .append_pair("size", &query.size.to_string())
            .append_pair("label", &query.label);
        url
    }

    async fn get_json<R: DeserializeOwned>(&self, url: Url) -> Result<R> {
        tracing::debug!(%url, "GET");
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(PfpError::Api {
                status: status.as_u16(),
                body: body_preview(&body).to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PfpError::Decode(format!(
                "{url}: {e}\nBody: {}",
                body_preview(&body)
            ))
        })
    }
}

impl PersonApi for PfpClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let page: SearchPage = self.get_json(self.search_request_url(query)).await?;
        Ok(page.items)
    }

    async fn fetch_detail(&self, identifier: &str) -> Result<Vec<SourceDetail>> {
        let url = self.detail_url(identifier)?;
        let doc: DetailDocument = self.get_json(url).await?;
        Ok(doc.sources)
    }
}
