//! Wire formats for the chunk index and chunk documents.
//!
//! - Index: JSON, nested arrays of hex cell strings at any depth.
//! - Chunk (JSON): `[{"h3": "...", "freq": [168 numbers], "type": 2}, ...]`.
//! - Chunk (CSV): header `h3,freq[,type]`, with `freq` a JSON-encoded array.

use std::fmt;
use std::str::FromStr;

use foundation::{Cell, HOURS_PER_WEEK, HourOfWeek};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Category of a record that carries none.
pub const NO_CATEGORY: i32 = -1;

fn no_category() -> i32 {
    NO_CATEGORY
}

/// One fine-resolution cell and its hour-of-week series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(rename = "h3")]
    pub cell: Cell,
    #[serde(rename = "freq")]
    pub series: Vec<f32>,
    #[serde(rename = "type", default = "no_category")]
    pub category: i32,
}

impl CellRecord {
    /// Series value at `time`; slots past the end of a short series read as 0.
    pub fn value_at(&self, time: HourOfWeek) -> f32 {
        self.series.get(time.as_index()).copied().unwrap_or(0.0)
    }
}

/// All records of one coarse grid region, fetched as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    pub records: Vec<CellRecord>,
}

impl Chunk {
    pub fn new(records: Vec<CellRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ChunkFormat {
    #[default]
    Json,
    Csv,
}

impl ChunkFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ChunkFormat::Json => "json",
            ChunkFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ChunkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ChunkFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ChunkFormat::Json),
            "csv" => Ok(ChunkFormat::Csv),
            other => Err(format!("unknown chunk format: {other}")),
        }
    }
}

/// Where the index and the chunk documents live relative to a source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkLayout {
    pub index_path: String,
    pub chunk_dir: String,
    pub format: ChunkFormat,
}

impl ChunkLayout {
    pub fn new(format: ChunkFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn chunk_path(&self, cell: Cell) -> String {
        let dir = self.chunk_dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("{cell}.{}", self.format.extension())
        } else {
            format!("{dir}/{cell}.{}", self.format.extension())
        }
    }
}

impl Default for ChunkLayout {
    fn default() -> Self {
        Self {
            index_path: "h3.json".to_string(),
            chunk_dir: "h3".to_string(),
            format: ChunkFormat::Json,
        }
    }
}

/// Decode the index document and flatten it, preserving document order.
pub fn decode_index(resource: &str, bytes: &[u8]) -> Result<Vec<Cell>, LoadError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| LoadError::parse(resource, format!("invalid json: {e}")))?;

    let mut out = Vec::new();
    flatten_index(resource, &value, &mut out)?;
    Ok(out)
}

fn flatten_index(
    resource: &str,
    value: &serde_json::Value,
    out: &mut Vec<Cell>,
) -> Result<(), LoadError> {
    match value {
        serde_json::Value::Array(items) => {
            for item in items {
                flatten_index(resource, item, out)?;
            }
            Ok(())
        }
        serde_json::Value::String(s) => {
            let cell = s
                .parse::<Cell>()
                .map_err(|e| LoadError::parse(resource, e.to_string()))?;
            out.push(cell);
            Ok(())
        }
        other => Err(LoadError::parse(
            resource,
            format!("expected cell string or array, found {other}"),
        )),
    }
}

pub fn decode_chunk(
    resource: &str,
    format: ChunkFormat,
    bytes: &[u8],
) -> Result<Chunk, LoadError> {
    let records = match format {
        ChunkFormat::Json => decode_json_records(resource, bytes)?,
        ChunkFormat::Csv => decode_csv_records(resource, bytes)?,
    };
    for record in &records {
        check_series(resource, record)?;
    }
    Ok(Chunk::new(records))
}

fn decode_json_records(resource: &str, bytes: &[u8]) -> Result<Vec<CellRecord>, LoadError> {
    serde_json::from_slice(bytes)
        .map_err(|e| LoadError::parse(resource, format!("invalid chunk json: {e}")))
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    h3: String,
    freq: String,
    #[serde(rename = "type", default)]
    category: Option<i32>,
}

fn decode_csv_records(resource: &str, bytes: &[u8]) -> Result<Vec<CellRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut records = Vec::new();
    for (row_i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| LoadError::parse(resource, format!("row {row_i}: {e}")))?;
        let cell = row
            .h3
            .parse::<Cell>()
            .map_err(|e| LoadError::parse(resource, format!("row {row_i}: {e}")))?;
        // The series is stored as a JSON string inside the tabular field.
        let series: Vec<f32> = serde_json::from_str(&row.freq)
            .map_err(|e| LoadError::parse(resource, format!("row {row_i} freq: {e}")))?;
        records.push(CellRecord {
            cell,
            series,
            category: row.category.unwrap_or(NO_CATEGORY),
        });
    }
    Ok(records)
}

fn check_series(resource: &str, record: &CellRecord) -> Result<(), LoadError> {
    if record.series.len() != HOURS_PER_WEEK {
        return Err(LoadError::parse(
            resource,
            format!(
                "cell {} has {} series values, expected {HOURS_PER_WEEK}",
                record.cell,
                record.series.len()
            ),
        ));
    }
    Ok(())
}

pub fn encode_chunk_json(chunk: &Chunk) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&chunk.records)
}

pub fn encode_index(groups: &[Vec<Cell>]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(groups)
}

#[cfg(test)]
mod tests {
    use super::{CellRecord, ChunkFormat, ChunkLayout, NO_CATEGORY, decode_chunk, decode_index};
    use foundation::{Cell, HourOfWeek};
    use pretty_assertions::assert_eq;

    const A: &str = "841f05bffffffff";
    const FINE: &str = "8a1f05a4e6dffff";

    fn series_json(fill: f32) -> String {
        let values: Vec<String> = (0..168).map(|i| format!("{}", fill + i as f32)).collect();
        format!("[{}]", values.join(","))
    }

    #[test]
    fn short_series_reads_zero_past_its_end() {
        let record = CellRecord {
            cell: FINE.parse().unwrap(),
            series: vec![4.0, 5.0],
            category: NO_CATEGORY,
        };
        assert_eq!(record.value_at(HourOfWeek::new(1).unwrap()), 5.0);
        assert_eq!(record.value_at(HourOfWeek::new(62).unwrap()), 0.0);
        assert_eq!(record.value_at(HourOfWeek::new(167).unwrap()), 0.0);
    }

    #[test]
    fn index_is_flattened_in_order() {
        let doc = format!(r#"[["{A}"], [["831f05fffffffff"]], "{FINE}"]"#);
        let cells = decode_index("h3.json", doc.as_bytes()).expect("index");
        let got: Vec<String> = cells.iter().map(Cell::to_string).collect();
        assert_eq!(got, vec![A, "831f05fffffffff", FINE]);
    }

    #[test]
    fn index_rejects_non_string_leaves() {
        let err = decode_index("h3.json", br#"[[1, 2]]"#).unwrap_err();
        assert!(err.is_parse());
        assert_eq!(err.resource(), "h3.json");
    }

    #[test]
    fn index_rejects_malformed_json() {
        assert!(decode_index("h3.json", b"[[").unwrap_err().is_parse());
    }

    #[test]
    fn json_chunk_decodes_with_optional_type() {
        let doc = format!(
            r#"[{{"h3": "{FINE}", "freq": {}, "type": 2}}, {{"h3": "{FINE}", "freq": {}}}]"#,
            series_json(0.0),
            series_json(1.0)
        );
        let chunk = decode_chunk("c.json", ChunkFormat::Json, doc.as_bytes()).expect("chunk");
        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk.records[0].category, 2);
        assert_eq!(chunk.records[1].category, NO_CATEGORY);
        assert_eq!(chunk.records[1].series[5], 6.0);
    }

    #[test]
    fn csv_chunk_parses_embedded_series() {
        let doc = format!("h3,freq\n{FINE},\"{}\"\n", series_json(0.5));
        let chunk = decode_chunk("c.csv", ChunkFormat::Csv, doc.as_bytes()).expect("chunk");
        assert_eq!(chunk.len(), 1);
        assert_eq!(chunk.records[0].series[0], 0.5);
        assert_eq!(chunk.records[0].category, NO_CATEGORY);
    }

    #[test]
    fn csv_chunk_reads_type_column() {
        let doc = format!("h3,freq,type\n{FINE},\"{}\",3\n", series_json(0.0));
        let chunk = decode_chunk("c.csv", ChunkFormat::Csv, doc.as_bytes()).expect("chunk");
        assert_eq!(chunk.records[0].category, 3);
    }

    #[test]
    fn short_series_is_a_parse_error() {
        let doc = format!(r#"[{{"h3": "{FINE}", "freq": [1, 2, 3]}}]"#);
        let err = decode_chunk("c.json", ChunkFormat::Json, doc.as_bytes()).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("expected 168"));
    }

    #[test]
    fn csv_with_broken_series_is_a_parse_error() {
        let doc = format!("h3,freq\n{FINE},\"[1, 2,\"\n");
        let err = decode_chunk("c.csv", ChunkFormat::Csv, doc.as_bytes()).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn layout_builds_chunk_paths() {
        let cell: Cell = A.parse().unwrap();
        assert_eq!(ChunkLayout::default().chunk_path(cell), format!("h3/{A}.json"));
        assert_eq!(
            ChunkLayout::new(ChunkFormat::Csv).chunk_path(cell),
            format!("h3/{A}.csv")
        );
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ChunkFormat>(), Ok(ChunkFormat::Csv));
        assert!("xml".parse::<ChunkFormat>().is_err());
    }
}
