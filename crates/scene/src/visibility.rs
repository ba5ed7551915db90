use foundation::{Cell, Viewport};
use streaming::ChunkStore;
use tracing::trace;

use crate::grid::HexGrid;

/// Neighborhood radius (in coarse cells) indexed by integer zoom level.
///
/// Zoom levels past the end of the table use radius 0.
pub const VISIBILITY_RADII: [u32; 13] = [6, 6, 6, 6, 6, 6, 5, 4, 3, 2, 1, 1, 1];

pub fn visibility_radius(zoom_level: u32) -> u32 {
    VISIBILITY_RADII
        .get(zoom_level as usize)
        .copied()
        .unwrap_or(0)
}

/// One visible flag per loaded chunk, parallel to `ChunkStore`.
///
/// Entry `i` reflects chunk `i` as of the last `recompute`; chunks that
/// arrive afterwards start out hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityIndex {
    flags: Vec<bool>,
    resolution: u8,
}

impl VisibilityIndex {
    /// `resolution` is the coarse grid level the chunks are keyed by.
    pub fn new(resolution: u8) -> Self {
        Self {
            flags: Vec::new(),
            resolution,
        }
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// Extend to cover `len` chunks; new entries are hidden.
    pub fn grow(&mut self, len: usize) {
        if self.flags.len() < len {
            self.flags.resize(len, false);
        }
    }

    pub fn recompute(&mut self, viewport: &Viewport, store: &ChunkStore, grid: &impl HexGrid) {
        self.grow(store.len());
        self.flags.iter_mut().for_each(|f| *f = false);

        if !viewport.is_finite() {
            return;
        }
        let Some(center) = grid.cell_at(viewport.latitude, viewport.longitude, self.resolution)
        else {
            return;
        };

        let radius = visibility_radius(viewport.zoom_level());
        for cell in grid.neighborhood(center, radius) {
            // Cells whose chunk has not arrived yet are skipped.
            if let Some(index) = store.lookup(cell) {
                self.flags[index] = true;
            }
        }
        trace!(%center, radius, visible = self.visible_count(), "visibility recomputed");
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Visibility of the chunk owning `cell`; `false` if none is loaded.
    pub fn is_cell_visible(&self, cell: Cell, store: &ChunkStore) -> bool {
        store.lookup(cell).is_some_and(|i| self.is_visible(i))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }
}
