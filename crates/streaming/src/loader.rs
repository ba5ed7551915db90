use foundation::Cell;
use futures_util::stream::FuturesUnordered;
use tracing::debug;

use crate::error::LoadError;
use crate::protocol::{Chunk, ChunkLayout, decode_chunk, decode_index};
use crate::source::{BoxFuture, ResourceSource};

/// Outcome of one chunk fetch, tagged with the coarse cell it was issued for.
#[derive(Debug)]
pub struct ChunkArrival {
    pub cell: Cell,
    pub result: Result<Chunk, LoadError>,
}

/// Fetches the index and the per-cell chunk documents from a source.
///
/// No batching, no ordering and no retries: each chunk fetch stands on its own.
#[derive(Debug)]
pub struct Loader<S> {
    source: S,
    layout: ChunkLayout,
}

impl<S: ResourceSource> Loader<S> {
    pub fn new(source: S, layout: ChunkLayout) -> Self {
        Self { source, layout }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    pub async fn load_index(&self) -> Result<Vec<Cell>, LoadError> {
        let path = self.layout.index_path.as_str();
        let bytes = self.source.fetch(path).await?;
        let cells = decode_index(path, &bytes)?;
        debug!(path, cells = cells.len(), "index loaded");
        Ok(cells)
    }

    pub async fn load_chunk(&self, cell: Cell) -> Result<Chunk, LoadError> {
        let path = self.layout.chunk_path(cell);
        let bytes = self.source.fetch(&path).await?;
        let chunk = decode_chunk(&path, self.layout.format, &bytes)?;
        debug!(%cell, records = chunk.len(), "chunk loaded");
        Ok(chunk)
    }

    /// Issue every chunk fetch at once; arrivals come out in completion order.
    pub fn load_chunks(
        &self,
        cells: impl IntoIterator<Item = Cell>,
    ) -> FuturesUnordered<BoxFuture<'_, ChunkArrival>> {
        cells.into_iter().map(|cell| self.arrival(cell)).collect()
    }

    fn arrival(&self, cell: Cell) -> BoxFuture<'_, ChunkArrival> {
        Box::pin(async move {
            ChunkArrival {
                cell,
                result: self.load_chunk(cell).await,
            }
        })
    }
}
