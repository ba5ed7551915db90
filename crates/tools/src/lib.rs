//! Offline preparation of viewer data: fine cell records are grouped by
//! their coarse ancestor into one chunk document each, plus the index.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::Cell;
use streaming::{CellRecord, Chunk, ChunkFormat, ChunkLayout, LoadError, decode_chunk};
use streaming::{encode_chunk_json, encode_index};

#[derive(Debug)]
pub enum BakeError {
    CellTooCoarse { cell: Cell, chunk_resolution: u8 },
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    Load(LoadError),
}

impl fmt::Display for BakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BakeError::CellTooCoarse {
                cell,
                chunk_resolution,
            } => write!(
                f,
                "cell {cell} (res {}) is coarser than chunk resolution {chunk_resolution}",
                cell.resolution()
            ),
            BakeError::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
            BakeError::Json(e) => write!(f, "json encode failed: {e}"),
            BakeError::Load(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BakeError::Io { source, .. } => Some(source),
            BakeError::Json(e) => Some(e),
            BakeError::Load(e) => Some(e),
            BakeError::CellTooCoarse { .. } => None,
        }
    }
}

impl From<serde_json::Error> for BakeError {
    fn from(e: serde_json::Error) -> Self {
        BakeError::Json(e)
    }
}

impl From<LoadError> for BakeError {
    fn from(e: LoadError) -> Self {
        BakeError::Load(e)
    }
}

/// Chunks keyed by coarse cell, ready to be written out.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Bake {
    pub chunk_resolution: u8,
    pub chunks: BTreeMap<Cell, Chunk>,
}

impl Bake {
    pub fn record_count(&self) -> usize {
        self.chunks.values().map(Chunk::len).sum()
    }

    /// Chunk cells grouped by their resolution-0 ancestor, for the index document.
    pub fn index_groups(&self) -> Vec<Vec<Cell>> {
        let mut groups: BTreeMap<Cell, Vec<Cell>> = BTreeMap::new();
        for cell in self.chunks.keys() {
            let base = cell.parent(0).unwrap_or(*cell);
            groups.entry(base).or_default().push(*cell);
        }
        groups.into_values().collect()
    }
}

pub fn bake(
    records: impl IntoIterator<Item = CellRecord>,
    chunk_resolution: u8,
) -> Result<Bake, BakeError> {
    let mut out = Bake {
        chunk_resolution,
        chunks: BTreeMap::new(),
    };
    for record in records {
        let parent = record
            .cell
            .parent(chunk_resolution)
            .ok_or(BakeError::CellTooCoarse {
                cell: record.cell,
                chunk_resolution,
            })?;
        out.chunks.entry(parent).or_default().records.push(record);
    }
    Ok(out)
}

fn io_at(path: &Path) -> impl FnOnce(std::io::Error) -> BakeError {
    let path = path.to_path_buf();
    move |source| BakeError::Io { path, source }
}

/// Read cell records from a JSON or CSV document on disk.
pub fn read_records(path: &Path, format: ChunkFormat) -> Result<Vec<CellRecord>, BakeError> {
    let bytes = fs::read(path).map_err(io_at(path))?;
    let chunk = decode_chunk(&path.display().to_string(), format, &bytes)?;
    Ok(chunk.records)
}

/// Write every chunk plus the index under `out_dir`, using the viewer's JSON layout.
pub fn write_bake(out_dir: &Path, bake: &Bake) -> Result<ChunkLayout, BakeError> {
    let layout = ChunkLayout::default();
    let chunk_dir = out_dir.join(&layout.chunk_dir);
    fs::create_dir_all(&chunk_dir).map_err(io_at(&chunk_dir))?;

    for (cell, chunk) in &bake.chunks {
        let path = out_dir.join(layout.chunk_path(*cell));
        fs::write(&path, encode_chunk_json(chunk)?).map_err(io_at(&path))?;
    }

    let index_path = out_dir.join(&layout.index_path);
    fs::write(&index_path, encode_index(&bake.index_groups())?)
        .map_err(io_at(&index_path))?;

    Ok(layout)
}
