//! In-memory `PersonApi` for controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::client::PersonApi;
use crate::error::{PfpError, Result};
use crate::model::*;

type Canned<T> = std::result::Result<T, String>;

#[derive(Default)]
pub(crate) struct MockApi {
    searches: HashMap<String, Canned<Vec<SearchResult>>>,
    details: HashMap<String, Canned<Vec<SourceDetail>>>,
    search_gates: Mutex<HashMap<String, Arc<Notify>>>,
    detail_gates: Mutex<HashMap<String, Arc<Notify>>>,
    search_calls: Mutex<Vec<SearchQuery>>,
    detail_calls: Mutex<Vec<String>>,
    calls_changed: Notify,
}

impl MockApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_search(mut self, label: &str, items: Vec<SearchResult>) -> Self {
        self.searches.insert(label.to_string(), Ok(items));
        self
    }

    pub(crate) fn with_search_error(mut self, label: &str, message: &str) -> Self {
        self.searches
            .insert(label.to_string(), Err(message.to_string()));
        self
    }

    pub(crate) fn with_detail(mut self, identifier: &str, sources: Vec<SourceDetail>) -> Self {
        self.details.insert(identifier.to_string(), Ok(sources));
        self
    }

    pub(crate) fn with_detail_error(mut self, identifier: &str, message: &str) -> Self {
        self.details
            .insert(identifier.to_string(), Err(message.to_string()));
        self
    }

    /// Hold responses for `label` until the returned `Notify` fires.
    pub(crate) fn gate_search(&self, label: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.search_gates
            .lock()
            .unwrap()
            .insert(label.to_string(), gate.clone());
        gate
    }

    pub(crate) fn gate_detail(&self, identifier: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.detail_gates
            .lock()
            .unwrap()
            .insert(identifier.to_string(), gate.clone());
        gate
    }

    pub(crate) fn search_calls(&self) -> Vec<SearchQuery> {
        self.search_calls.lock().unwrap().clone()
    }

    pub(crate) fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }

    pub(crate) async fn wait_for_search_calls(&self, n: usize) {
        loop {
            let notified = self.calls_changed.notified();
            if self.search_calls.lock().unwrap().len() >= n {
                return;
            }
            notified.await;
        }
    }

    pub(crate) async fn wait_for_detail_calls(&self, n: usize) {
        loop {
            let notified = self.calls_changed.notified();
            if self.detail_calls.lock().unwrap().len() >= n {
                return;
            }
            notified.await;
        }
    }
}

fn canned<T: Clone>(entry: Option<&Canned<T>>, key: &str) -> Result<T> {
    match entry {
        Some(Ok(value)) => Ok(value.clone()),
        Some(Err(message)) => Err(PfpError::Api {
            status: 503,
            body: message.clone(),
        }),
        None => Err(PfpError::Api {
            status: 404,
            body: format!("no canned response for {key}"),
        }),
    }
}

impl PersonApi for MockApi {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        self.search_calls.lock().unwrap().push(query.clone());
        self.calls_changed.notify_waiters();
        let gate = self.search_gates.lock().unwrap().get(&query.label).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        canned(self.searches.get(&query.label), &query.label)
    }

    async fn fetch_detail(&self, identifier: &str) -> Result<Vec<SourceDetail>> {
        self.detail_calls.lock().unwrap().push(identifier.to_string());
        self.calls_changed.notify_waiters();
        let gate = self.detail_gates.lock().unwrap().get(identifier).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        canned(self.details.get(identifier), identifier)
    }
}

pub(crate) fn brief(label: &str) -> SourceBrief {
    SourceBrief {
        label: label.to_string(),
        source: format!("https://pmb.acdh.oeaw.ac.at/entity/{}", label.replace(' ', "_")),
    }
}

pub(crate) fn person(identifier: &str, labels: &[&str]) -> SearchResult {
    SearchResult {
        identifier: identifier.to_string(),
        sources: labels.iter().map(|l| brief(l)).collect(),
    }
}

pub(crate) fn event(id: &str, label: &str, start: Option<&str>, end: Option<&str>) -> Event {
    Event {
        id: id.to_string(),
        label: label.to_string(),
        start_date: start.map(String::from),
        end_date: end.map(String::from),
        related_place: None,
    }
}

pub(crate) fn source(label: &str, subject: &str, events: Vec<Event>) -> SourceDetail {
    SourceDetail {
        label: label.to_string(),
        subject_uri: subject.to_string(),
        graph: None,
        events,
    }
}
