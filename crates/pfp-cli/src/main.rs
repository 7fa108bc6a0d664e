mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use pfp_core::client::{PersonApi, PfpClient};
use pfp_core::config::PfpConfig;
use pfp_core::display::{QuickView, ResultView, EVENTS_HEADING, NO_EVENTS};
use pfp_core::error::PfpError;
use pfp_core::sources::SourceRegistry;

#[derive(Parser)]
#[command(name = "pfp", about = "PFP: search persons across prosopographical registries", version)]
enum Cli {
    /// Search persons by name
    Search {
        /// Name or part of a name
        label: String,
        /// Output raw JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the per-source breakdown of one person
    Show {
        /// Identifier from a search result (its `uuid`)
        uuid: String,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// List the registries source URIs are resolved against
    Sources {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration after merging files and environment
    Config,
    /// Interactive terminal UI
    Tui,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal; log lines would corrupt the screen.
    if !matches!(cli, Cli::Tui) {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .compact()
            .init();
    }

    let config = PfpConfig::load(Some(&std::env::current_dir()?))
        .unwrap_or_else(|_| PfpConfig::default_config());

    let result = run(cli, &config).await;
    if let Err(ref err) = result {
        if let Some(friendly) = format_api_error(err, &config) {
            eprintln!("{friendly}");
            std::process::exit(1);
        }
    }
    result
}

async fn run(cli: Cli, config: &PfpConfig) -> Result<()> {
    match cli {
        Cli::Search { label, json } => {
            let client = PfpClient::from_config(&config.api)?;
            cmd_search(&client, &label, json).await
        }
        Cli::Show { uuid, json } => {
            let client = PfpClient::from_config(&config.api)?;
            cmd_show(&client, config, &uuid, json).await
        }
        Cli::Sources { json } => cmd_sources(config, json),
        Cli::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Cli::Tui => tui::run_tui(config).await,
    }
}

/// A readable message for an unreachable API, or `None` for other errors.
fn format_api_error(err: &anyhow::Error, config: &PfpConfig) -> Option<String> {
    let unreachable = err
        .chain()
        .filter_map(|e| e.downcast_ref::<PfpError>())
        .any(PfpError::is_unreachable);
    if !unreachable {
        return None;
    }
    Some(format!(
        "{} Cannot reach the PFP API at {}\n  Check {} in .pfp/config.toml or set {}.",
        "error:".red().bold(),
        config.api.search_url.cyan(),
        "api.search_url".bold(),
        "PFP_API__SEARCH_URL".bold()
    ))
}

async fn cmd_search(client: &PfpClient, label: &str, json: bool) -> Result<()> {
    let items = client
        .search(&client.query(label))
        .await
        .with_context(|| format!("search for {label:?} failed"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("{}", "No results found.".dimmed());
        return Ok(());
    }

    for view in items.iter().map(ResultView::from) {
        println!("{}", view.header.bold());
        println!("  {}", view.identifier.cyan());
        for (label, url) in &view.rows {
            println!("    {}  {}", label, url.dimmed());
        }
    }
    println!();
    println!(
        "{} result{}",
        items.len().to_string().cyan(),
        if items.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

async fn cmd_show(client: &PfpClient, config: &PfpConfig, uuid: &str, json: bool) -> Result<()> {
    if uuid.trim().is_empty() {
        anyhow::bail!(PfpError::InvalidInput("identifier must not be empty".into()));
    }

    let sources = client
        .fetch_detail(uuid)
        .await
        .with_context(|| format!("could not load details for {uuid}"))?;
    let registry = SourceRegistry::with_extra(&config.sources.extra);
    let view = QuickView::build(&sources, &registry, &config.map);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.tabs.is_empty() {
        println!("{}", "No sources recorded for this person.".dimmed());
        return Ok(());
    }

    println!("{}", view.title.bold());
    for tab in &view.tabs {
        println!();
        println!("{} {}", "───".dimmed(), tab.title.magenta().bold());
        println!("  {}", tab.recorded_name);
        println!("  {}", tab.source_uri.cyan());
        if !tab.has_events() {
            println!("  {}", NO_EVENTS.dimmed());
            continue;
        }
        println!("  {}", EVENTS_HEADING.dimmed());
        for event in &tab.events {
            println!("    • {}", event.text());
            if let Some(ref map) = event.map {
                println!("      {} {}", map.caption.dimmed(), map.url.dimmed());
            }
        }
    }
    Ok(())
}

fn cmd_sources(config: &PfpConfig, json: bool) -> Result<()> {
    let registry = SourceRegistry::with_extra(&config.sources.extra);

    if json {
        println!("{}", serde_json::to_string_pretty(registry.entries())?);
        return Ok(());
    }

    let width = registry
        .entries()
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    for entry in registry.entries() {
        println!("{:<width$}  {}", entry.label.bold(), entry.prefix.dimmed());
    }
    Ok(())
}
