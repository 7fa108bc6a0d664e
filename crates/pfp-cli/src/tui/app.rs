use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pfp_core::config::MapConfig;
use pfp_core::detail::DetailSnapshot;
use pfp_core::display::QuickView;
use pfp_core::model::SearchResult;
use pfp_core::search::SearchSnapshot;
use pfp_core::sources::SourceRegistry;

use super::event::AsyncAction;

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    /// Quick View overlay on top of the list.
    QuickView,
}

/// Input mode within the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Central application state.
pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub should_quit: bool,

    // -- List state --
    pub search: SearchSnapshot,
    pub search_input: String,
    /// Byte offset into `search_input`, always on a char boundary.
    pub search_cursor: usize,
    pub selected: usize,
    /// Identifiers of expanded results.
    pub expanded: HashSet<String>,

    // -- Quick View state --
    pub detail: DetailSnapshot,
    pub quick_view: Option<QuickView>,
    pub active_tab: usize,
    pub detail_scroll: u16,

    registry: SourceRegistry,
    map: MapConfig,
}

impl App {
    pub fn new(registry: SourceRegistry, map: MapConfig) -> Self {
        Self {
            screen: Screen::List,
            input_mode: InputMode::Normal,
            should_quit: false,

            search: SearchSnapshot::default(),
            search_input: String::new(),
            search_cursor: 0,
            selected: 0,
            expanded: HashSet::new(),

            detail: DetailSnapshot::default(),
            quick_view: None,
            active_tab: 0,
            detail_scroll: 0,

            registry,
            map,
        }
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.search.results
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results().get(self.selected)
    }

    pub fn is_expanded(&self, identifier: &str) -> bool {
        self.expanded.contains(identifier)
    }

    /// Apply a newly published search state.
    pub fn handle_search(&mut self, snapshot: SearchSnapshot) {
        if snapshot.query != self.search.query {
            self.selected = 0;
            self.expanded.clear();
        }
        self.search = snapshot;
        let len = self.results().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Apply a newly published Quick View state.
    pub fn handle_detail(&mut self, snapshot: DetailSnapshot) {
        let identity_changed = snapshot.identifier != self.detail.identifier;
        self.quick_view = if snapshot.is_open() && !snapshot.loading {
            Some(QuickView::build(&snapshot.sources, &self.registry, &self.map))
        } else {
            None
        };
        if identity_changed || snapshot.loading {
            self.active_tab = 0;
            self.detail_scroll = 0;
        }
        self.detail = snapshot;
    }

    /// Handle a key event. Returns an optional async action to dispatch.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match (&self.screen, &self.input_mode) {
            (Screen::List, InputMode::Normal) => self.handle_list_normal(key),
            (Screen::List, InputMode::Search) => self.handle_list_search(key),
            (Screen::QuickView, _) => self.handle_quick_view(key),
        }
    }

    fn handle_list_normal(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('G') => {
                self.selected = self.results().len().saturating_sub(1);
                None
            }
            KeyCode::Char('g') => {
                self.selected = 0;
                None
            }
            KeyCode::PageDown => {
                self.move_selection(10);
                None
            }
            KeyCode::PageUp => {
                self.move_selection(-10);
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.toggle_selected();
                None
            }
            KeyCode::Char('v') => self.open_quick_view(),
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.search_cursor = self.search_input.len();
                None
            }
            _ => None,
        }
    }

    fn handle_list_search(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                None
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let label = self.search_input.trim();
                if label.is_empty() {
                    return None;
                }
                let label = label.to_string();
                self.reset_selection();
                Some(AsyncAction::Search { label })
            }
            KeyCode::Backspace => {
                if let Some((idx, _)) = self.search_input[..self.search_cursor].char_indices().last() {
                    self.search_input.remove(idx);
                    self.search_cursor = idx;
                }
                None
            }
            KeyCode::Left => {
                if let Some((idx, _)) = self.search_input[..self.search_cursor].char_indices().last() {
                    self.search_cursor = idx;
                }
                None
            }
            KeyCode::Right => {
                if let Some(c) = self.search_input[self.search_cursor..].chars().next() {
                    self.search_cursor += c.len_utf8();
                }
                None
            }
            KeyCode::Char(c) => {
                self.search_input.insert(self.search_cursor, c);
                self.search_cursor += c.len_utf8();
                None
            }
            _ => None,
        }
    }

    fn handle_quick_view(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('v') => {
                self.screen = Screen::List;
                self.quick_view = None;
                Some(AsyncAction::CloseDetail)
            }
            KeyCode::Char('/') => {
                self.screen = Screen::List;
                self.quick_view = None;
                self.input_mode = InputMode::Search;
                self.search_cursor = self.search_input.len();
                Some(AsyncAction::CloseDetail)
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.cycle_tab(1);
                None
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                self.cycle_tab(-1);
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
                None
            }
            _ => None,
        }
    }

    fn open_quick_view(&mut self) -> Option<AsyncAction> {
        let identifier = self.selected_result()?.identifier.clone();
        if identifier.is_empty() {
            return None;
        }
        self.screen = Screen::QuickView;
        self.quick_view = None;
        self.active_tab = 0;
        self.detail_scroll = 0;
        Some(AsyncAction::OpenDetail { identifier })
    }

    /// A new query closes the Quick View and forgets the selection.
    fn reset_selection(&mut self) {
        self.screen = Screen::List;
        self.quick_view = None;
        self.detail = DetailSnapshot::default();
        self.selected = 0;
        self.expanded.clear();
    }

    fn toggle_selected(&mut self) {
        let Some(identifier) = self.selected_result().map(|r| r.identifier.clone()) else {
            return;
        };
        if !self.expanded.remove(&identifier) {
            self.expanded.insert(identifier);
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.results().len();
        if len == 0 {
            return;
        }
        let new = self.selected as i64 + delta as i64;
        self.selected = new.clamp(0, len as i64 - 1) as usize;
    }

    fn cycle_tab(&mut self, delta: i32) {
        let Some(count) = self.quick_view.as_ref().map(|v| v.tabs.len()) else {
            return;
        };
        if count == 0 {
            return;
        }
        self.active_tab = (self.active_tab as i64 + delta as i64).rem_euclid(count as i64) as usize;
        self.detail_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pfp_core::detail::DetailStatus;
    use pfp_core::model::{SourceBrief, SourceDetail};
    use pfp_core::search::SearchStatus;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(SourceRegistry::builtin(), MapConfig::default())
    }

    fn result(identifier: &str, label: &str) -> SearchResult {
        SearchResult {
            identifier: identifier.into(),
            sources: vec![SourceBrief {
                label: label.into(),
                source: format!("https://pmb.acdh.oeaw.ac.at/entity/{identifier}"),
            }],
        }
    }

    fn loaded(query: &str, results: Vec<SearchResult>) -> SearchSnapshot {
        SearchSnapshot {
            query: Some(query.into()),
            loading: false,
            results: Arc::new(results),
            status: SearchStatus::Loaded,
        }
    }

    fn detail_loaded(identifier: &str, subjects: &[&str]) -> DetailSnapshot {
        DetailSnapshot {
            identifier: Some(identifier.into()),
            loading: false,
            sources: Arc::new(
                subjects
                    .iter()
                    .map(|s| SourceDetail {
                        label: "Smith".into(),
                        subject_uri: s.to_string(),
                        graph: None,
                        events: vec![],
                    })
                    .collect(),
            ),
            status: DetailStatus::Loaded,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_initial_state() {
        let app = app();
        assert_eq!(app.screen, Screen::List);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
        assert!(app.results().is_empty());
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_search_submit() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);
        type_text(&mut app, "Smith");
        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            Some(AsyncAction::Search {
                label: "Smith".into()
            })
        );
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_blank_search_is_not_submitted() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "   ");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_search_input_handles_multibyte() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "Müller");
        assert_eq!(app.search_cursor, "Müller".len());

        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.search_input, "Mller");
        assert_eq!(app.search_cursor, 1);

        app.handle_key(key(KeyCode::Char('ü')));
        assert_eq!(app.search_input, "Müller");
    }

    #[test]
    fn test_selection_navigation() {
        let mut app = app();
        app.handle_search(loaded(
            "Smith",
            (0..3).map(|i| result(&format!("u-{i}"), "Smith")).collect(),
        ));

        assert_eq!(app.selected, 0);
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected, 2);
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.selected, 1);
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_toggle_expansion() {
        let mut app = app();
        app.handle_search(loaded("Smith", vec![result("u-1", "Smith")]));
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.is_expanded("u-1"));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.is_expanded("u-1"));
    }

    #[test]
    fn test_new_query_resets_selection_and_expansion() {
        let mut app = app();
        app.handle_search(loaded(
            "Smith",
            vec![result("u-1", "Smith"), result("u-2", "Smith")],
        ));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.selected, 1);

        app.handle_search(loaded("Jones", vec![result("u-3", "Jones")]));
        assert_eq!(app.selected, 0);
        assert!(app.expanded.is_empty());
    }

    #[test]
    fn test_failed_search_keeps_results() {
        let mut app = app();
        app.handle_search(loaded("Smith", vec![result("u-1", "Smith")]));
        let mut failed = app.search.clone();
        failed.query = Some("Jones".into());
        failed.status = SearchStatus::Failed("timeout".into());
        app.handle_search(failed);
        assert_eq!(app.results().len(), 1);
        assert_eq!(app.search.failure(), Some("timeout"));
    }

    #[test]
    fn test_open_and_close_quick_view() {
        let mut app = app();
        app.handle_search(loaded("Smith", vec![result("u-1", "Smith")]));

        let action = app.handle_key(key(KeyCode::Char('v')));
        assert_eq!(
            action,
            Some(AsyncAction::OpenDetail {
                identifier: "u-1".into()
            })
        );
        assert_eq!(app.screen, Screen::QuickView);

        let action = app.handle_key(key(KeyCode::Esc));
        assert_eq!(action, Some(AsyncAction::CloseDetail));
        assert_eq!(app.screen, Screen::List);
    }

    #[test]
    fn test_quick_view_needs_a_selection() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Char('v'))), None);
        assert_eq!(app.screen, Screen::List);
    }

    #[test]
    fn test_new_search_closes_quick_view() {
        let mut app = app();
        app.handle_search(loaded("Smith", vec![result("u-1", "Smith")]));
        app.handle_key(key(KeyCode::Char('v')));
        app.handle_detail(detail_loaded("u-1", &["https://pmb.acdh.oeaw.ac.at/entity/1"]));
        assert!(app.quick_view.is_some());

        assert_eq!(
            app.handle_key(key(KeyCode::Char('/'))),
            Some(AsyncAction::CloseDetail)
        );
        type_text(&mut app, "Jones");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::List);
        assert!(app.quick_view.is_none());
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_detail_builds_tabs_and_cycles() {
        let mut app = app();
        app.screen = Screen::QuickView;
        app.handle_detail(DetailSnapshot {
            identifier: Some("u-1".into()),
            loading: true,
            ..DetailSnapshot::default()
        });
        assert!(app.quick_view.is_none());

        app.handle_detail(detail_loaded(
            "u-1",
            &[
                "https://pmb.acdh.oeaw.ac.at/entity/1",
                "https://hanslick.acdh.oeaw.ac.at/person/7",
            ],
        ));
        let view = app.quick_view.as_ref().unwrap();
        assert_eq!(view.tabs[0].title, "PMB");
        assert_eq!(view.tabs[1].title, "Hanslick Project");
        assert_eq!(app.active_tab, 0);

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.active_tab, 1);
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.active_tab, 0);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.active_tab, 1);
    }
}
