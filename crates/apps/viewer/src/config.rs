use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use foundation::{Clock, TimeRangeError, TimeState, Viewport};
use layers::{CategoryPalette, ColorScheme, GradientPalette, HexagonStyle, PaletteError, parse_hex};
use streaming::{ChunkFormat, ChunkLayout};

use crate::camera::Camera;

pub const SOURCE_ENV: &str = "HEXFLOW_SOURCE";
const DEFAULT_SOURCE: &str = "docs";

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SchemeKind {
    ByCategory,
    BySeries,
    CategoryGradient,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Weekly hex-cell frequency viewer")]
pub struct ViewerConfig {
    /// Data root: a directory or an http(s) base URL (env HEXFLOW_SOURCE, default "docs")
    #[arg(long)]
    pub source: Option<String>,

    /// Chunk document format
    #[arg(long, default_value = "json")]
    pub format: ChunkFormat,

    /// Index document path, relative to the source
    #[arg(long)]
    pub index_path: Option<String>,

    /// Chunk directory, relative to the source
    #[arg(long)]
    pub chunk_dir: Option<String>,

    /// Grid resolution of the chunk cells
    #[arg(long, default_value_t = 4)]
    pub chunk_resolution: u8,

    #[arg(long, default_value_t = 55.6, allow_negative_numbers = true)]
    pub latitude: f64,

    #[arg(long, default_value_t = 12.6, allow_negative_numbers = true)]
    pub longitude: f64,

    #[arg(long, default_value_t = 10.0)]
    pub zoom: f64,

    #[arg(long, default_value_t = 7.0)]
    pub min_zoom: f64,

    #[arg(long, default_value_t = 15.0)]
    pub max_zoom: f64,

    /// Initial hour of the week (0..=167); defaults to the local clock
    #[arg(long, allow_negative_numbers = true)]
    pub time: Option<i64>,

    #[arg(long, value_enum, default_value_t = SchemeKind::CategoryGradient)]
    pub colors: SchemeKind,

    #[arg(long, default_value = "#59bfd9")]
    pub gradient_from: String,

    #[arg(long, default_value = "#d9ae43")]
    pub gradient_to: String,

    #[arg(long, default_value_t = 10)]
    pub gradient_steps: usize,

    #[arg(long, default_value_t = 20.0)]
    pub elevation_scale: f32,

    /// Write every render pass as JSON lines to this file instead of logging a summary
    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl ViewerConfig {
    /// Source from the flag, then the environment, then the default directory.
    pub fn source(&self) -> String {
        self.source
            .clone()
            .or_else(|| std::env::var(SOURCE_ENV).ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
    }

    pub fn layout(&self) -> ChunkLayout {
        let mut layout = ChunkLayout::new(self.format);
        if let Some(p) = &self.index_path {
            layout.index_path = p.clone();
        }
        if let Some(d) = &self.chunk_dir {
            layout.chunk_dir = d.clone();
        }
        layout
    }

    pub fn camera(&self) -> Camera {
        Camera::new(
            Viewport::new(self.latitude, self.longitude, self.zoom),
            self.min_zoom,
            self.max_zoom,
        )
    }

    pub fn style(&self) -> Result<HexagonStyle, PaletteError> {
        let scheme = match self.colors {
            SchemeKind::ByCategory => ColorScheme::ByCategory(CategoryPalette::default()),
            SchemeKind::BySeries => ColorScheme::BySeries(self.gradient()?),
            SchemeKind::CategoryGradient => ColorScheme::CategoryGradient(self.gradient()?),
        };
        Ok(HexagonStyle {
            elevation_scale: self.elevation_scale,
            ..HexagonStyle::new(scheme)
        })
    }

    fn gradient(&self) -> Result<GradientPalette, PaletteError> {
        GradientPalette::lch(
            parse_hex(&self.gradient_from)?,
            parse_hex(&self.gradient_to)?,
            self.gradient_steps,
        )
    }

    pub fn initial_time(&self, clock: &impl Clock) -> Result<TimeState, TimeRangeError> {
        let mut state = TimeState::at_now(clock);
        if let Some(hour) = self.time {
            state.set(hour)?;
        }
        Ok(state)
    }
}
