//! wikigraph server binary
//!
//! Serves a directory of markdown files as a wiki: wikilink parsing,
//! backlinks on every page, in-browser editing with rename propagation, a
//! `/today` diary page, and optional automatic reload when wiki files change
//! on disk.

use clap::Parser;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use wikigraph::{
    config::WikiConfig, graph::WikiGraph, server, watch::WatchService, WikiError,
};

#[derive(Parser)]
#[command(name = "wikigraph")]
#[command(author, version, about = "A wiki server for a directory of markdown files", long_about = None)]
struct Cli {
    /// Directory containing markdown files (overrides the config file)
    #[arg(long)]
    wiki: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Watch the wiki directory and reload automatically on changes
    #[arg(long)]
    watch: bool,

    /// Print debug output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path (default: ./wiki.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from("wiki.toml"));
    let config = WikiConfig::load(&config_path)?.unwrap_or_default();

    let dir = cli.wiki.unwrap_or(config.dir);
    let port = cli.port.unwrap_or(config.port);
    let watch = cli.watch || config.watch;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let graph = Arc::new(WikiGraph::open(&dir).await?);
        tracing::info!("Loaded wiki from {:?}", dir);

        let watcher = if watch {
            let service =
                WatchService::new(graph.clone(), tokio::runtime::Handle::current());
            service.enable()?;
            Some(service)
        } else {
            None
        };

        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        ctrlc::set_handler(move || {
            tracing::info!("Shutting down...");
            r.store(false, Ordering::SeqCst);
        })
        .map_err(|e| WikiError::Service(format!("Failed to set Ctrl-C handler: {e}")))?;

        let shutdown = {
            let running = running.clone();
            async move {
                while running.load(Ordering::SeqCst) {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        };

        server::serve(graph, port, shutdown).await?;

        if let Some(service) = watcher {
            service.disable()?;
        }
        Ok::<(), WikiError>(())
    })?;

    tracing::info!("Shutdown complete");
    Ok(())
}
