use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use pfp_core::display::{ResultView, NO_RESULTS};

use crate::tui::{
    app::{App, InputMode},
    widgets::{help_bar::HelpBar, search_input::SearchInput},
};

pub fn render(frame: &mut Frame, app: &App, area: Rect, api_url: &str) {
    let layout = Layout::vertical([
        Constraint::Length(3), // search bar
        Constraint::Length(1), // status line
        Constraint::Min(5),    // results
        Constraint::Length(1), // help bar
    ])
    .split(area);

    frame.render_widget(
        SearchInput {
            text: &app.search_input,
            cursor: app.search_cursor,
            focused: app.input_mode == InputMode::Search,
            last_query: app.search.query.as_deref(),
        },
        layout[0],
    );

    frame.render_widget(status_line(app, api_url), layout[1]);

    render_results(frame, app, layout[2]);

    frame.render_widget(
        HelpBar {
            screen: &app.screen,
            input_mode: &app.input_mode,
        },
        layout[3],
    );
}

/// Failure and not-found messages, independent of the list below.
fn status_line<'a>(app: &'a App, api_url: &'a str) -> Paragraph<'a> {
    let line = if let Some(msg) = app.search.failure() {
        Line::from(Span::styled(
            format!(" ✗ Search failed: {msg}"),
            Style::default().fg(Color::Red),
        ))
    } else if app.search.not_found() {
        Line::from(Span::styled(
            format!(" {NO_RESULTS}"),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            format!(" {api_url}"),
            Style::default().fg(Color::DarkGray),
        ))
    };
    Paragraph::new(line)
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.search.query {
        Some(ref q) => format!(" Results for \"{}\" ({}) ", q, app.results().len()),
        None => " Results ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);

    if app.search.loading {
        let loading = Paragraph::new(Line::from(Span::styled(
            "  Searching...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .block(block);
        frame.render_widget(loading, area);
        return;
    }

    let items: Vec<ListItem> = app
        .results()
        .iter()
        .map(|result| {
            let view = ResultView::from(result);
            let expanded = app.is_expanded(&view.identifier);
            result_item(view, expanded)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Indexed(236))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    if !app.results().is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn result_item(view: ResultView, expanded: bool) -> ListItem<'static> {
    let marker = if expanded { "▾ " } else { "▸ " };
    let mut lines = vec![Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::DarkGray)),
        Span::styled(view.header, Style::default().add_modifier(Modifier::BOLD)),
    ])];

    if expanded {
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(view.identifier, Style::default().fg(Color::Cyan)),
            Span::styled("  [v] Quick View", Style::default().fg(Color::DarkGray)),
        ]));
        for (label, url) in view.rows {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(label, Style::default().fg(Color::Magenta)),
                Span::raw("  "),
                Span::styled(url, Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    ListItem::new(Text::from(lines))
}
