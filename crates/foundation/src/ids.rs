use std::fmt;
use std::str::FromStr;

use h3o::{CellIndex, Resolution};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of one hexagonal grid region at a fixed resolution.
///
/// Cells travel through the data files as lowercase hex H3 strings
/// (`"8a1f05a4e6dffff"`), so that is also the serde representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell(CellIndex);

impl Cell {
    pub fn new(index: CellIndex) -> Self {
        Cell(index)
    }

    pub fn index(self) -> CellIndex {
        self.0
    }

    pub fn resolution(self) -> u8 {
        u8::from(self.0.resolution())
    }

    /// Ancestor at a coarser resolution, `None` if `resolution` is finer than the cell.
    pub fn parent(self, resolution: u8) -> Option<Cell> {
        let res = Resolution::try_from(resolution).ok()?;
        self.0.parent(res).map(Cell)
    }
}

impl From<CellIndex> for Cell {
    fn from(index: CellIndex) -> Self {
        Cell(index)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCell(pub String);

impl fmt::Display for InvalidCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell identifier: {:?}", self.0)
    }
}

impl std::error::Error for InvalidCell {}

impl FromStr for Cell {
    type Err = InvalidCell;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<CellIndex>()
            .map(Cell)
            .map_err(|_| InvalidCell(s.to_string()))
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Cell;

    const COPENHAGEN_R10: &str = "8a1f05a4e6dffff";

    #[test]
    fn parses_and_prints_hex() {
        let cell: Cell = COPENHAGEN_R10.parse().expect("parse");
        assert_eq!(cell.to_string(), COPENHAGEN_R10);
        assert_eq!(cell.resolution(), 10);
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-a-cell".parse::<Cell>().is_err());
        assert!("".parse::<Cell>().is_err());
    }

    #[test]
    fn parent_is_coarser() {
        let cell: Cell = COPENHAGEN_R10.parse().unwrap();
        let parent = cell.parent(4).expect("parent");
        assert_eq!(parent.resolution(), 4);
        assert!(parent.parent(10).is_none());
    }

    #[test]
    fn serde_uses_hex_string() {
        let cell: Cell = COPENHAGEN_R10.parse().unwrap();
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, format!("\"{COPENHAGEN_R10}\""));
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }
}
