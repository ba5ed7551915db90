use std::path::PathBuf;

use clap::Parser;
use streaming::ChunkFormat;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Partition hex cell records into viewer chunks")]
struct Args {
    /// Input records (JSON array or CSV with h3,freq[,type] columns)
    #[arg(long)]
    input: PathBuf,

    /// Input format; inferred from the file extension when omitted
    #[arg(long)]
    format: Option<ChunkFormat>,

    /// Output directory (receives h3.json and h3/<cell>.json)
    #[arg(long, default_value = "docs")]
    out: PathBuf,

    /// Grid resolution of one chunk
    #[arg(long, default_value_t = 4)]
    chunk_resolution: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let format = match args.format {
        Some(f) => f,
        None => infer_format(&args.input)?,
    };

    let records = tools::read_records(&args.input, format)?;
    info!(input = %args.input.display(), records = records.len(), "records read");

    let bake = tools::bake(records, args.chunk_resolution)?;
    tools::write_bake(&args.out, &bake)?;
    info!(
        out = %args.out.display(),
        chunks = bake.chunks.len(),
        records = bake.record_count(),
        "bake written"
    );
    Ok(())
}

fn infer_format(path: &std::path::Path) -> Result<ChunkFormat, String> {
    path.extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| format!("cannot infer format of {}; pass --format", path.display()))?
        .parse()
}
