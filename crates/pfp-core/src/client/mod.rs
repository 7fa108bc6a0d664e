mod http;

pub use http::PfpClient;

use crate::error::Result;
use crate::model::{SearchQuery, SearchResult, SourceDetail};

/// Read access to the PFP person API. `PfpClient` talks HTTP; tests
/// substitute in-memory implementations.
pub trait PersonApi: Send + Sync {
    /// Search persons by label. Returns the page's items in delivery order.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>>> + Send;

    /// Fetch the source bundle behind a search result's identifier.
    fn fetch_detail(
        &self,
        identifier: &str,
    ) -> impl std::future::Future<Output = Result<Vec<SourceDetail>>> + Send;
}
