use std::fs::File;
use std::io::{self, BufRead, BufWriter};

use clap::Parser;
use foundation::SystemClock;
use streaming::{FilesystemSource, HttpSource, Loader, ResourceSource};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use viewer::config::ViewerConfig;
use viewer::{
    JsonLinesRenderer, Renderer, SummaryRenderer, TerminalControls, UiEvent, Viewer, ViewerState,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ViewerConfig::parse();
    let source_root = config.source();
    let source: Box<dyn ResourceSource> =
        if source_root.starts_with("http://") || source_root.starts_with("https://") {
            Box::new(HttpSource::new(source_root.as_str()))
        } else {
            Box::new(FilesystemSource::new(&source_root))
        };
    info!(source = %source.describe(), "starting viewer");

    let renderer: Box<dyn Renderer> = match &config.out {
        Some(path) => Box::new(JsonLinesRenderer::new(BufWriter::new(File::create(path)?))),
        None => Box::new(SummaryRenderer::default()),
    };

    let state = ViewerState::new(
        config.camera(),
        config.chunk_resolution,
        config.initial_time(&SystemClock)?,
    );
    let mut app = Viewer::new(state, config.style()?, renderer, TerminalControls::default());
    let loader = Loader::new(source, config.layout());

    let (tx, rx) = mpsc::channel(16);
    // Plain thread: a blocked stdin read must not keep the runtime alive after `run` returns.
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<UiEvent>() {
                Ok(event) => {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(err) => warn!("{err}"),
            }
        }
    });

    let summary = viewer::run(&mut app, &loader, rx).await?;
    info!(
        requested = summary.requested,
        loaded = summary.loaded,
        failed = summary.failed,
        passes = summary.render_passes,
        "viewer finished"
    );
    Ok(())
}
