//! Event loop tying the loader, the control surface and the viewer together.
//!
//! Everything runs on the calling task: chunk completions and UI events are
//! taken one at a time, so each handler sees a consistent state and every
//! mutation is followed by exactly one render pass.

use foundation::Clock;
use futures_util::StreamExt;
use streaming::{LoadError, Loader, ResourceSource};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::controls::{Controls, UiEvent};
use crate::renderer::Renderer;
use crate::viewer::{Flow, Viewer};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub requested: usize,
    pub loaded: usize,
    pub failed: usize,
    pub render_passes: u64,
}

/// Render once, load the index, then issue every chunk fetch and service
/// completions and UI events until both run dry or the user quits.
///
/// A failed index load is fatal and is reported on the controls before it is
/// returned. Failed chunks are counted and skipped.
pub async fn run<R, C, K, S>(
    viewer: &mut Viewer<R, C, K>,
    loader: &Loader<S>,
    mut ui: mpsc::Receiver<UiEvent>,
) -> Result<RunSummary, LoadError>
where
    R: Renderer,
    C: Controls,
    K: Clock,
    S: ResourceSource,
{
    viewer.render_pass();

    let cells = match loader.load_index().await {
        Ok(cells) => cells,
        Err(err) => {
            viewer.show_load_error(&err);
            return Err(err);
        }
    };
    info!(
        source = %loader.source().describe(),
        chunks = cells.len(),
        "index loaded"
    );

    let mut summary = RunSummary {
        requested: cells.len(),
        ..RunSummary::default()
    };
    let mut pending = loader.load_chunks(cells);
    let mut ui_open = true;

    loop {
        tokio::select! {
            Some(arrival) = pending.next(), if !pending.is_empty() => {
                match viewer.on_chunk(arrival) {
                    Some(_) => summary.loaded += 1,
                    None => summary.failed += 1,
                }
                if pending.is_empty() {
                    info!(loaded = summary.loaded, failed = summary.failed, "all chunks settled");
                }
            }
            event = ui.recv(), if ui_open => match event {
                Some(event) => {
                    if viewer.handle_ui(event) == Flow::Quit {
                        break;
                    }
                }
                None => ui_open = false,
            },
            else => break,
        }
    }

    if !pending.is_empty() {
        warn!(outstanding = pending.len(), "exiting with chunk fetches in flight");
    }
    summary.render_passes = viewer.render_passes();
    Ok(summary)
}
