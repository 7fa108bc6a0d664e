use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

const HINT: &str = "name or part of a name, e.g. Hanslick";
const PROMPT: &str = "❯ ";

/// Person-name input. Shows the last submitted label in the title and
/// scrolls horizontally so the cursor stays in view.
pub struct SearchInput<'a> {
    pub text: &'a str,
    /// Byte offset of the cursor; must be on a char boundary.
    pub cursor: usize,
    pub focused: bool,
    /// Label of the search whose results are on screen.
    pub last_query: Option<&'a str>,
}

impl SearchInput<'_> {
    fn title(&self) -> String {
        if self.focused {
            return " Person name (Enter to search, Esc to cancel) ".to_string();
        }
        match self.last_query {
            Some(q) if !q.is_empty() => format!(" Results for \"{q}\" (press / to search again) "),
            _ => " Search persons (press /) ".to_string(),
        }
    }

    /// The input line for a box `width` cells wide.
    fn line(&self, width: usize) -> Line<'_> {
        let prompt = Span::styled(PROMPT, Style::default().fg(Color::Cyan));
        if self.text.is_empty() {
            let mut spans = vec![prompt];
            if self.focused {
                spans.push(cursor_span(' '));
            }
            spans.push(Span::styled(HINT, Style::default().fg(Color::DarkGray)));
            return Line::from(spans);
        }

        let cursor = self.cursor.min(self.text.len());
        let (before, after) = self.text.split_at(cursor);

        // Drop leading chars until the text before the cursor, the cursor
        // cell and the prompt fit.
        let room = width.saturating_sub(PROMPT.chars().count() + 1);
        let skip = before.chars().count().saturating_sub(room);
        let before = match before.char_indices().nth(skip) {
            Some((idx, _)) => &before[idx..],
            None => "",
        };

        let mut spans = vec![prompt, Span::raw(before)];
        if self.focused {
            let cursor_char = after.chars().next().unwrap_or(' ');
            spans.push(cursor_span(cursor_char));
            if after.len() > cursor_char.len_utf8() {
                spans.push(Span::raw(&after[cursor_char.len_utf8()..]));
            }
        } else {
            spans.push(Span::raw(after));
        }
        Line::from(spans)
    }
}

fn cursor_span(c: char) -> Span<'static> {
    Span::styled(
        c.to_string(),
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(self.title());

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let line = self.line(inner.width as usize);
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}
