use std::fmt;

use foundation::Cell;
use serde::{Serialize, Serializer};

use crate::symbology::{ColorScheme, Rgba};

/// Layer identity; one layer per loaded chunk, so this is the chunk index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub usize);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk-{}", self.0)
    }
}

impl Serialize for LayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HexagonStyle {
    pub pickable: bool,
    pub filled: bool,
    pub extruded: bool,
    pub wireframe: bool,
    pub elevation_scale: f32,
    pub scheme: ColorScheme,
}

impl HexagonStyle {
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            scheme,
            ..Self::default()
        }
    }
}

impl Default for HexagonStyle {
    fn default() -> Self {
        Self {
            pickable: true,
            filled: true,
            extruded: true,
            wireframe: false,
            elevation_scale: 20.0,
            scheme: ColorScheme::default(),
        }
    }
}

/// One hexagon as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexagonInstance {
    #[serde(rename = "hexagon")]
    pub cell: Cell,
    pub fill_color: Rgba,
    pub elevation: f32,
    pub tooltip: String,
}

/// Renderable description of one chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexagonLayer {
    pub id: LayerId,
    pub visible: bool,
    pub pickable: bool,
    pub filled: bool,
    pub extruded: bool,
    pub wireframe: bool,
    pub elevation_scale: f32,
    pub data: Vec<HexagonInstance>,
}

impl HexagonLayer {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
