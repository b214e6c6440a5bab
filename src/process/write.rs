use anyhow::{Context, Result};
use arrow::{csv::WriterBuilder, record_batch::RecordBatch};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

/// On-disk format picked from the output path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
        {
            Some(ext) if ext == "parquet" => OutputFormat::Parquet,
            _ => OutputFormat::Csv,
        }
    }
}

/// Write `batch` to `path` (CSV with header and no index column, or Parquet
/// for a `.parquet` path). Returns the size of the written file.
pub fn write_table<P: AsRef<Path>>(batch: &RecordBatch, path: P) -> Result<u64> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }

    let format = OutputFormat::from_path(path);
    match format {
        OutputFormat::Csv => write_csv_file(batch, path)?,
        OutputFormat::Parquet => write_parquet_file(batch, path)?,
    }

    let bytes = fs::metadata(path)
        .with_context(|| format!("getting metadata of {}", path.display()))?
        .len();
    info!(path = %path.display(), ?format, rows = batch.num_rows(), bytes, "wrote table");
    Ok(bytes)
}

fn write_csv_file(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating file {}", path.display()))?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    writer
        .write(batch)
        .with_context(|| format!("writing CSV to {}", path.display()))?;
    writer
        .into_inner()
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn write_parquet_file(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating file {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating parquet writer")?;
    writer.write(batch).context("writing batch to parquet")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
