//! Quick View data: the per-source breakdown of one person, loaded on
//! demand and discarded when the view closes.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::PersonApi;
use crate::inflight::{Inflight, Ticket};
use crate::model::SourceDetail;

/// Classified result of a single detail fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Loaded(Vec<SourceDetail>),
    /// The document was fetched but lists no sources.
    Empty,
    Failed(String),
}

pub async fn fetch_detail<A: PersonApi>(api: &A, identifier: &str) -> DetailOutcome {
    match api.fetch_detail(identifier).await {
        Ok(sources) if sources.is_empty() => DetailOutcome::Empty,
        Ok(sources) => {
            tracing::debug!(identifier, sources = sources.len(), "detail loaded");
            DetailOutcome::Loaded(sources)
        }
        Err(e) => {
            tracing::warn!(identifier, error = %e, "detail fetch failed");
            DetailOutcome::Failed(e.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailStatus {
    #[default]
    Idle,
    Loaded,
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailSnapshot {
    /// Identity the view is open for; `None` when closed.
    pub identifier: Option<String>,
    pub loading: bool,
    pub sources: Arc<Vec<SourceDetail>>,
    pub status: DetailStatus,
}

impl DetailSnapshot {
    pub fn is_open(&self) -> bool {
        self.identifier.is_some()
    }

    /// Dialog title: source labels joined with `" / "`. `None` while
    /// loading or when there are no sources to name.
    pub fn title(&self) -> Option<String> {
        if self.loading || self.sources.is_empty() {
            return None;
        }
        Some(
            self.sources
                .iter()
                .map(|s| s.label.as_str())
                .collect::<Vec<_>>()
                .join(" / "),
        )
    }

    /// Key of the tab shown first.
    pub fn initial_tab(&self) -> Option<&str> {
        self.sources.first().map(|s| s.subject_uri.as_str())
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.status {
            DetailStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// State behind the single Quick View dialog.
pub struct DetailFetcher<A> {
    api: Arc<A>,
    state: watch::Sender<DetailSnapshot>,
    inflight: Inflight,
}

impl<A: PersonApi> DetailFetcher<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (state, _) = watch::channel(DetailSnapshot::default());
        Self {
            api,
            state,
            inflight: Inflight::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        self.state.borrow().clone()
    }

    /// Open the view for `identifier` and load its sources. Opening another
    /// identity while a load is running cancels that load. An empty
    /// identifier does nothing.
    pub async fn open(&self, identifier: &str) {
        if let Some(ticket) = self.start(identifier) {
            self.finish(ticket, identifier).await;
        }
    }

    /// Same as [`open`](Self::open). Loading the identity already shown
    /// fetches it again.
    pub async fn load(&self, identifier: &str) {
        self.open(identifier).await;
    }

    fn start(&self, identifier: &str) -> Option<Ticket> {
        if identifier.is_empty() {
            return None;
        }
        Some(self.inflight.begin(|| {
            self.state.send_replace(DetailSnapshot {
                identifier: Some(identifier.to_string()),
                loading: true,
                sources: Arc::new(Vec::new()),
                status: DetailStatus::Idle,
            });
        }))
    }

    async fn finish(&self, ticket: Ticket, identifier: &str) {
        let outcome = tokio::select! {
            _ = ticket.token().cancelled() => {
                tracing::debug!(identifier, "detail load superseded");
                return;
            }
            outcome = fetch_detail(self.api.as_ref(), identifier) => outcome,
        };

        let committed = self.inflight.commit(&ticket, || {
            self.state.send_modify(|s| {
                s.loading = false;
                match outcome {
                    DetailOutcome::Loaded(sources) => {
                        s.sources = Arc::new(sources);
                        s.status = DetailStatus::Loaded;
                    }
                    DetailOutcome::Empty => {
                        s.sources = Arc::new(Vec::new());
                        s.status = DetailStatus::Empty;
                    }
                    DetailOutcome::Failed(msg) => {
                        s.sources = Arc::new(Vec::new());
                        s.status = DetailStatus::Failed(msg);
                    }
                }
            });
        });
        if !committed {
            tracing::debug!(identifier, "dropping stale detail response");
        }
    }

    /// Close the view, cancelling any running load and discarding sources.
    pub fn close(&self) {
        self.inflight.cancel(|| {
            self.state.send_replace(DetailSnapshot::default());
        });
    }
}

impl<A: PersonApi + 'static> DetailFetcher<A> {
    /// Like [`open`](Self::open), but the load continues on a background
    /// task. The view switches to `identifier` before this returns.
    pub fn spawn_open(self: &Arc<Self>, identifier: String) -> Option<JoinHandle<()>> {
        let ticket = self.start(&identifier)?;
        let this = Arc::clone(self);
        Some(tokio::spawn(async move {
            this.finish(ticket, &identifier).await
        }))
    }
}
