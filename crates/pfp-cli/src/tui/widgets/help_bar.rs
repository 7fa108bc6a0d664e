use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::tui::app::{InputMode, Screen};

/// Bottom help bar showing context-sensitive key bindings.
pub struct HelpBar<'a> {
    pub screen: &'a Screen,
    pub input_mode: &'a InputMode,
}

impl HelpBar<'_> {
    fn bindings(&self) -> &'static [(&'static str, &'static str)] {
        match (self.screen, self.input_mode) {
            (Screen::List, InputMode::Normal) => &[
                ("j/k", "navigate"),
                ("Space", "expand"),
                ("v", "quick view"),
                ("/", "search"),
                ("q", "quit"),
            ],
            (Screen::List, InputMode::Search) => &[("Enter", "search"), ("Esc", "cancel")],
            (Screen::QuickView, _) => &[
                ("←/→", "source"),
                ("j/k", "scroll"),
                ("/", "new search"),
                ("Esc", "close"),
                ("q", "quit"),
            ],
        }
    }
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::DarkGray);
        let key_style = Style::default().fg(Color::Cyan);

        let spans: Vec<Span> = self
            .bindings()
            .iter()
            .flat_map(|(key, action)| {
                [
                    Span::styled(*key, key_style),
                    Span::styled(format!(" {action}  "), style),
                ]
            })
            .collect();

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
