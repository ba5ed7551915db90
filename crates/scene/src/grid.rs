use foundation::Cell;
use h3o::{LatLng, Resolution};

/// Hexagon-grid math needed by the viewer.
pub trait HexGrid {
    /// Cell containing the point at `resolution`, `None` for invalid input.
    fn cell_at(&self, latitude: f64, longitude: f64, resolution: u8) -> Option<Cell>;

    /// `center` plus every cell within `radius` grid steps of it.
    fn neighborhood(&self, center: Cell, radius: u32) -> Vec<Cell>;
}

/// `HexGrid` backed by H3.
#[derive(Debug, Default, Copy, Clone)]
pub struct H3Grid;

impl HexGrid for H3Grid {
    fn cell_at(&self, latitude: f64, longitude: f64, resolution: u8) -> Option<Cell> {
        let res = Resolution::try_from(resolution).ok()?;
        let point = LatLng::new(latitude, longitude).ok()?;
        Some(Cell::new(point.to_cell(res)))
    }

    fn neighborhood(&self, center: Cell, radius: u32) -> Vec<Cell> {
        center
            .index()
            .grid_disk::<Vec<_>>(radius)
            .into_iter()
            .map(Cell::new)
            .collect()
    }
}
