//! Render-ready views shared by the web and terminal front-ends.

use serde::Serialize;

use crate::config::MapConfig;
use crate::map::{event_preview, MapPreview};
use crate::model::{Event, SearchResult, SourceDetail};
use crate::sources::SourceRegistry;

pub const NO_RESULTS: &str = "No results found!";
pub const NO_EVENTS: &str = "No event information from this source!";
pub const EVENTS_HEADING: &str = "Recorded Events";

/// One row of the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub header: String,
    pub identifier: String,
    /// `(label, url)` pairs in delivery order.
    pub rows: Vec<(String, String)>,
}

impl From<&SearchResult> for ResultView {
    fn from(result: &SearchResult) -> Self {
        Self {
            header: result.header_text(),
            identifier: result.identifier.clone(),
            rows: result
                .sources
                .iter()
                .map(|s| (s.label.clone(), s.source.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    pub label: String,
    pub dates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapPreview>,
}

impl EventView {
    pub fn new(event: &Event, map: &MapConfig) -> Self {
        Self {
            label: event.label.clone(),
            dates: event.date_text(),
            map: event_preview(map, event),
        }
    }

    /// `label: dates`, or just the label when the event is undated.
    pub fn text(&self) -> String {
        match &self.dates {
            Some(dates) => format!("{}: {dates}", self.label),
            None => self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabView {
    /// Subject URI of the source.
    pub key: String,
    /// Registry name resolved from the subject URI.
    pub title: String,
    pub recorded_name: String,
    pub source_uri: String,
    pub events: Vec<EventView>,
}

impl TabView {
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Tabbed breakdown of one person, one tab per source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickView {
    pub title: String,
    pub tabs: Vec<TabView>,
    pub active_tab: Option<String>,
}

impl QuickView {
    pub fn build(sources: &[SourceDetail], registry: &SourceRegistry, map: &MapConfig) -> Self {
        let tabs: Vec<TabView> = sources
            .iter()
            .map(|s| TabView {
                key: s.subject_uri.clone(),
                title: registry.resolve(&s.subject_uri).to_string(),
                recorded_name: s.label.clone(),
                source_uri: s.subject_uri.clone(),
                events: s.events.iter().map(|e| EventView::new(e, map)).collect(),
            })
            .collect();

        Self {
            title: sources
                .iter()
                .map(|s| s.label.as_str())
                .collect::<Vec<_>>()
                .join(" / "),
            active_tab: tabs.first().map(|t| t.key.clone()),
            tabs,
        }
    }

    pub fn tab(&self, key: &str) -> Option<&TabView> {
        self.tabs.iter().find(|t| t.key == key)
    }
}
