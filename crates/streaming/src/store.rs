use std::collections::BTreeMap;

use foundation::Cell;

use crate::protocol::Chunk;

/// Append-only list of loaded chunks plus a coarse-cell lookup.
///
/// Indices are assigned in arrival order and never reused. Appending the same
/// coarse cell twice keeps both chunks; the lookup then resolves to the most
/// recent one.
#[derive(Debug, Default)]
pub struct ChunkStore {
    chunks: Vec<Chunk>,
    by_cell: BTreeMap<Cell, usize>,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, cell: Cell, chunk: Chunk) -> usize {
        let index = self.chunks.len();
        self.chunks.push(chunk);
        self.by_cell.insert(cell, index);
        index
    }

    pub fn lookup(&self, cell: Cell) -> Option<usize> {
        self.by_cell.get(&cell).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Distinct coarse cells currently mapped.
    pub fn mapped_cells(&self) -> usize {
        self.by_cell.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Chunk)> {
        self.chunks.iter().enumerate()
    }

    /// Total number of cell records across all chunks.
    pub fn record_count(&self) -> usize {
        self.chunks.iter().map(Chunk::len).sum()
    }
}
