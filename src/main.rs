//! newsgrab server and CLI
//!
//! `newsgrab serve` runs the HTTP scrape API; `newsgrab scrape <URL>...`
//! extracts articles from one or more pages and prints them as JSON.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use newsgrab::config::{ScrapeConfig, ServerConfig};
use newsgrab::handlers::{router, AppState};
use newsgrab::ScrapeReport;
use tracing_subscriber::EnvFilter;

/// Heuristic news article extraction
#[derive(Parser, Debug)]
#[command(name = "newsgrab")]
#[command(version)]
#[command(about = "Extract article listings from arbitrary news pages")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve(ServerConfig),

    /// Scrape pages and print the extracted articles as JSON
    Scrape {
        /// Pages to scrape
        #[arg(required = true)]
        urls: Vec<String>,

        /// Pages fetched at the same time
        #[arg(long, default_value_t = 4)]
        concurrency: usize,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        config: ScrapeConfig,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve(config) => serve(config).await,
        Command::Scrape {
            urls,
            concurrency,
            pretty,
            config,
        } => scrape(urls, concurrency, pretty, config).await,
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;
    let addr = config.socket_addr()?;
    let service = config
        .scrape
        .build_service()
        .context("failed to build scrape service")?;

    let state = Arc::new(AppState::new(service));
    let app = router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, cors = ?config.cors, "newsgrab listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn scrape(
    urls: Vec<String>,
    concurrency: usize,
    pretty: bool,
    config: ScrapeConfig,
) -> anyhow::Result<()> {
    let service = config
        .build_service()
        .context("failed to build scrape service")?;

    let results: Vec<(String, newsgrab::Result<ScrapeReport>)> = stream::iter(urls)
        .map(|url| {
            let service = service.clone();
            async move {
                let result = service.scrape(&url).await;
                (url, result)
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = 0usize;
    for (url, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                failures += 1;
                tracing::error!(%url, error = %e, "Scrape failed");
            }
        }
    }

    let json = if pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    println!("{json}");

    if failures > 0 && reports.is_empty() {
        anyhow::bail!("all {failures} scrape(s) failed");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
