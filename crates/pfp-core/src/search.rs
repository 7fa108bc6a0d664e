//! Person search: one request per submitted label, with the result set
//! held in a single-writer state container.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::PersonApi;
use crate::error::Result;
use crate::inflight::{Inflight, Ticket};
use crate::model::{SearchQuery, SearchResult};

/// Classified result of a single search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<SearchResult>),
    NotFound,
    Failed(String),
}

/// Run one search and classify a successful response. Failures are logged
/// here and handed back with the underlying error, for callers that treat
/// some failures differently.
pub async fn try_search<A: PersonApi>(api: &A, query: &SearchQuery) -> Result<SearchOutcome> {
    match api.search(query).await {
        Ok(items) if items.is_empty() => {
            tracing::info!(label = %query.label, "no persons found");
            Ok(SearchOutcome::NotFound)
        }
        Ok(items) => {
            tracing::info!(label = %query.label, items = items.len(), "person search");
            Ok(SearchOutcome::Found(items))
        }
        Err(e) => {
            tracing::warn!(label = %query.label, error = %e, "person search failed");
            Err(e)
        }
    }
}

/// Run one search and classify the response. Failures are reported as
/// `Failed`, never as an empty result.
pub async fn run_search<A: PersonApi>(api: &A, query: &SearchQuery) -> SearchOutcome {
    try_search(api, query)
        .await
        .unwrap_or_else(|e| SearchOutcome::Failed(e.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchStatus {
    /// Nothing submitted yet, or a request is running.
    #[default]
    Idle,
    Loaded,
    NotFound,
    Failed(String),
}

/// Immutable view of the search state, published on every transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub query: Option<String>,
    pub loading: bool,
    pub results: Arc<Vec<SearchResult>>,
    pub status: SearchStatus,
}

impl SearchSnapshot {
    pub fn not_found(&self) -> bool {
        self.status == SearchStatus::NotFound
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.status {
            SearchStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Owns the active result set. Each `submit` supersedes the previous one:
/// its request is cancelled and its response, if it still arrives, is
/// dropped.
pub struct SearchController<A> {
    api: Arc<A>,
    page: u32,
    size: u32,
    state: watch::Sender<SearchSnapshot>,
    inflight: Inflight,
}

impl<A: PersonApi> SearchController<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (state, _) = watch::channel(SearchSnapshot::default());
        Self {
            api,
            page: SearchQuery::DEFAULT_PAGE,
            size: SearchQuery::DEFAULT_SIZE,
            state,
            inflight: Inflight::default(),
        }
    }

    pub fn with_paging(mut self, page: u32, size: u32) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Search for `label` and publish the outcome. Results from a failed
    /// request leave the previous result set in place.
    pub async fn submit(&self, label: &str) {
        let ticket = self.start(label);
        self.finish(ticket, label).await;
    }

    fn start(&self, label: &str) -> Ticket {
        self.inflight.begin(|| {
            self.state.send_modify(|s| {
                s.query = Some(label.to_string());
                s.loading = true;
                s.status = SearchStatus::Idle;
            });
        })
    }

    async fn finish(&self, ticket: Ticket, label: &str) {
        let query = SearchQuery::new(label).with_paging(self.page, self.size);
        let outcome = tokio::select! {
            _ = ticket.token().cancelled() => {
                tracing::debug!(label, "search superseded");
                return;
            }
            outcome = run_search(self.api.as_ref(), &query) => outcome,
        };

        let committed = self.inflight.commit(&ticket, || {
            self.state.send_modify(|s| {
                s.loading = false;
                match outcome {
                    SearchOutcome::Found(items) => {
                        s.results = Arc::new(items);
                        s.status = SearchStatus::Loaded;
                    }
                    SearchOutcome::NotFound => {
                        s.results = Arc::new(Vec::new());
                        s.status = SearchStatus::NotFound;
                    }
                    SearchOutcome::Failed(msg) => {
                        s.status = SearchStatus::Failed(msg);
                    }
                }
            });
        });
        if !committed {
            tracing::debug!(label, "dropping stale search response");
        }
    }
}

impl<A: PersonApi + 'static> SearchController<A> {
    /// Start a search right away and finish it on a background task.
    /// Calls made in sequence supersede each other in that order.
    pub fn spawn_submit(self: &Arc<Self>, label: String) -> JoinHandle<()> {
        let ticket = self.start(&label);
        let this = Arc::clone(self);
        tokio::spawn(async move { this.finish(ticket, &label).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PfpError;
    use crate::testing::{brief, person, MockApi};

    #[tokio::test]
    async fn test_run_search_found() {
        let api = MockApi::new().with_search("Smith", vec![person("u-1", &["Smith"])]);
        let outcome = run_search(&api, &SearchQuery::new("Smith")).await;
        assert!(matches!(outcome, SearchOutcome::Found(ref items) if items.len() == 1));
    }

    #[tokio::test]
    async fn test_run_search_failure_is_not_empty() {
        let api = MockApi::new().with_search_error("Smith", "eof");
        let outcome = run_search(&api, &SearchQuery::new("Smith")).await;
        assert!(matches!(outcome, SearchOutcome::Failed(ref msg) if msg.contains("eof")));
    }

    #[tokio::test]
    async fn test_try_search_keeps_error() {
        let api = MockApi::new()
            .with_search("Smith", vec![])
            .with_search_error("Jones", "eof");
        let empty = try_search(&api, &SearchQuery::new("Smith")).await.unwrap();
        assert_eq!(empty, SearchOutcome::NotFound);

        let err = try_search(&api, &SearchQuery::new("Jones")).await.unwrap_err();
        assert!(matches!(err, PfpError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_submit_zero_items_sets_not_found() {
        let api = Arc::new(MockApi::new().with_search("Smith", vec![]));
        let controller = SearchController::new(api.clone());
        controller.submit("Smith").await;

        let snap = controller.snapshot();
        assert!(snap.not_found());
        assert!(snap.results.is_empty());
        assert!(!snap.loading);
        assert_eq!(snap.query.as_deref(), Some("Smith"));
    }

    #[tokio::test]
    async fn test_submit_keeps_response_order() {
        let items = vec![
            person("u-3", &["Smith, Anna"]),
            person("u-1", &["Smith, John", "John Smith"]),
            person("u-2", &["Smith"]),
        ];
        let api = Arc::new(MockApi::new().with_search("Smith", items.clone()));
        let controller = SearchController::new(api.clone());
        controller.submit("Smith").await;

        let snap = controller.snapshot();
        assert!(!snap.not_found());
        assert_eq!(snap.status, SearchStatus::Loaded);
        assert_eq!(*snap.results, items);
    }

    #[tokio::test]
    async fn test_submit_uses_fixed_paging() {
        let api = Arc::new(MockApi::new().with_search("Smith", vec![]));
        let controller = SearchController::new(api.clone());
        controller.submit("Smith").await;
        assert_eq!(api.search_calls(), vec![SearchQuery::new("Smith")]);
        assert_eq!(api.search_calls()[0].size, 100);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_results() {
        let api = Arc::new(
            MockApi::new()
                .with_search("Smith", vec![person("u-1", &["Smith"])])
                .with_search_error("Jones", "bad json"),
        );
        let controller = SearchController::new(api.clone());
        controller.submit("Smith").await;
        controller.submit("Jones").await;

        let snap = controller.snapshot();
        assert!(!snap.loading);
        assert!(!snap.not_found());
        assert!(snap.failure().is_some());
        assert_eq!(snap.results.len(), 1);
        assert_eq!(snap.results[0].sources, vec![brief("Smith")]);
    }

    #[tokio::test]
    async fn test_loading_while_pending() {
        let api = Arc::new(MockApi::new().with_search("Smith", vec![]));
        let gate = api.gate_search("Smith");
        let controller = Arc::new(SearchController::new(api.clone()));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("Smith").await })
        };
        api.wait_for_search_calls(1).await;
        assert!(controller.snapshot().loading);

        gate.notify_one();
        task.await.unwrap();
        assert!(!controller.snapshot().loading);
    }

    #[tokio::test]
    async fn test_superseded_search_does_not_commit() {
        let api = Arc::new(
            MockApi::new()
                .with_search("Smith", vec![person("u-1", &["Smith"])])
                .with_search("Jones", vec![person("u-2", &["Jones"])]),
        );
        let _gate = api.gate_search("Smith");
        let controller = Arc::new(SearchController::new(api.clone()));

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("Smith").await })
        };
        api.wait_for_search_calls(1).await;

        controller.submit("Jones").await;
        // The slow request was cancelled, so its task finishes without committing.
        slow.await.unwrap();

        let snap = controller.snapshot();
        assert_eq!(snap.query.as_deref(), Some("Jones"));
        assert_eq!(snap.results[0].identifier, "u-2");
        assert!(!snap.loading);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let api = Arc::new(MockApi::new().with_search("Smith", vec![]));
        let controller = SearchController::new(api);
        let mut rx = controller.subscribe();
        assert!(!rx.borrow_and_update().loading);

        controller.submit("Smith").await;
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().not_found());
    }

    #[tokio::test]
    async fn test_spawned_submits_supersede_in_call_order() {
        let api = Arc::new(
            MockApi::new()
                .with_search("Smith", vec![person("u-1", &["Smith"])])
                .with_search("Jones", vec![person("u-2", &["Jones"])]),
        );
        let _gate = api.gate_search("Smith");
        let controller = Arc::new(SearchController::new(api.clone()));

        let first = controller.spawn_submit("Smith".into());
        let second = controller.spawn_submit("Jones".into());
        second.await.unwrap();
        first.await.unwrap();

        let snap = controller.snapshot();
        assert_eq!(snap.query.as_deref(), Some("Jones"));
        assert_eq!(snap.results[0].identifier, "u-2");
        assert!(!snap.loading);
    }
}
