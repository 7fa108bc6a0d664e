use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};
use pfp_core::display::{TabView, EVENTS_HEADING, NO_EVENTS};

use crate::tui::{app::App, widgets::help_bar::HelpBar};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [overlay] = Layout::horizontal([Constraint::Percentage(85)])
        .flex(Flex::Center)
        .areas(area);
    let [overlay] = Layout::vertical([Constraint::Percentage(85)])
        .flex(Flex::Center)
        .areas(overlay);

    frame.render_widget(Clear, overlay);

    let title = app
        .detail
        .title()
        .map(|t| format!(" {t} "))
        .unwrap_or_else(|| " Quick View ".to_string());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let layout = Layout::vertical([
        Constraint::Length(2), // tabs
        Constraint::Min(3),    // tab content
        Constraint::Length(1), // help bar
    ])
    .split(inner);

    frame.render_widget(
        HelpBar {
            screen: &app.screen,
            input_mode: &app.input_mode,
        },
        layout[2],
    );

    if app.detail.loading {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "  Loading...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            layout[1],
        );
        return;
    }

    if let Some(msg) = app.detail.failure() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "  Could not load details",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {msg}"),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .wrap(Wrap { trim: false }),
            layout[1],
        );
        return;
    }

    let Some(view) = app.quick_view.as_ref().filter(|v| !v.tabs.is_empty()) else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "  No sources recorded for this person.",
                Style::default().fg(Color::DarkGray),
            )),
            layout[1],
        );
        return;
    };

    let tabs = Tabs::new(view.tabs.iter().map(|t| t.title.clone()))
        .select(app.active_tab)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(tabs, layout[0]);

    if let Some(tab) = view.tabs.get(app.active_tab) {
        let content = Paragraph::new(tab_lines(tab))
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll, 0));
        frame.render_widget(content, layout[1]);
    }
}

fn tab_lines(tab: &TabView) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(
            tab.recorded_name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            tab.source_uri.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
        )),
        Line::default(),
    ];

    if !tab.has_events() {
        lines.push(Line::from(Span::styled(
            NO_EVENTS,
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }

    lines.push(Line::from(Span::styled(
        format!("─── {EVENTS_HEADING} ───"),
        Style::default().fg(Color::DarkGray),
    )));
    for event in &tab.events {
        lines.push(Line::from(vec![Span::raw("• "), Span::raw(event.text())]));
        if let Some(ref map) = event.map {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{} ", map.caption),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(map.url.as_str(), Style::default().fg(Color::DarkGray)),
            ]));
        }
    }
    lines
}
