pub mod app;
pub mod event;
mod views;
mod widgets;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self as ct_event, Event};
use pfp_core::client::PfpClient;
use pfp_core::config::PfpConfig;
use pfp_core::detail::{DetailFetcher, DetailSnapshot};
use pfp_core::search::{SearchController, SearchSnapshot};
use pfp_core::sources::SourceRegistry;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::{mpsc, watch};

use self::app::{App, Screen};
use self::event::AsyncAction;

/// Entry point for the interactive TUI mode.
pub async fn run_tui(config: &PfpConfig) -> Result<()> {
    let client = Arc::new(
        PfpClient::from_config(&config.api).context("failed to create PFP API client")?,
    );
    let search = Arc::new(
        SearchController::new(client.clone()).with_paging(config.api.page, config.api.page_size),
    );
    let details = Arc::new(DetailFetcher::new(client));

    let mut search_rx = search.subscribe();
    let mut detail_rx = details.subscribe();

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AsyncAction>();
    tokio::spawn(async move {
        worker_loop(search, details, &mut action_rx).await;
    });

    let registry = SourceRegistry::with_extra(&config.sources.extra);
    let mut app = App::new(registry, config.map.clone());

    let mut terminal = ratatui::init();
    let result = run_loop(
        &mut terminal,
        &mut app,
        &action_tx,
        &mut search_rx,
        &mut detail_rx,
        &config.api.search_url,
    );
    ratatui::restore();

    result
}

fn run_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    action_tx: &mpsc::UnboundedSender<AsyncAction>,
    search_rx: &mut watch::Receiver<SearchSnapshot>,
    detail_rx: &mut watch::Receiver<DetailSnapshot>,
    api_url: &str,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app, api_url))?;

        // Pick up published state (non-blocking)
        if search_rx.has_changed().unwrap_or(false) {
            let snapshot = search_rx.borrow_and_update().clone();
            app.handle_search(snapshot);
        }
        if detail_rx.has_changed().unwrap_or(false) {
            let snapshot = detail_rx.borrow_and_update().clone();
            app.handle_detail(snapshot);
        }

        // 50ms poll keeps spinners and results responsive
        if ct_event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = ct_event::read()? {
                if let Some(action) = app.handle_key(key) {
                    let _ = action_tx.send(action);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn render(frame: &mut Frame, app: &App, api_url: &str) {
    let area = frame.area();
    views::list::render(frame, app, area, api_url);
    if app.screen == Screen::QuickView {
        views::quick_view::render(frame, app, area);
    }
}

/// Routes UI actions to the state containers. Requests start in the order
/// the actions arrive and finish on their own tasks, so a newer one can
/// supersede an older one that is still running.
async fn worker_loop(
    search: Arc<SearchController<PfpClient>>,
    details: Arc<DetailFetcher<PfpClient>>,
    action_rx: &mut mpsc::UnboundedReceiver<AsyncAction>,
) {
    while let Some(action) = action_rx.recv().await {
        match action {
            AsyncAction::Search { label } => {
                details.close();
                search.spawn_submit(label);
            }
            AsyncAction::OpenDetail { identifier } => {
                details.spawn_open(identifier);
            }
            AsyncAction::CloseDetail => details.close(),
        }
    }
}
