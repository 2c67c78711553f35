//! CSV output for the normalized shot table.

use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::dataset::ShotDataset;
use crate::errors::{Result, ShotError};

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(nested) => nested.to_string(),
    }
}

/// Write header plus one line per shot to any writer.
pub fn write_dataset<W: Write>(dataset: &ShotDataset, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    let columns = dataset.columns();

    if !columns.is_empty() {
        out.write_record(&columns).map_err(csv_error)?;
    }
    for row in dataset.rows() {
        out.write_record(columns.iter().map(|c| cell(row.get(c))))
            .map_err(csv_error)?;
    }
    out.flush()?;
    Ok(())
}

pub fn to_csv_string(dataset: &ShotDataset) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_dataset(dataset, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ShotError::Io(e.to_string()))
}

/// Write the dataset to `path` in one step.
///
/// Rows go to a temporary file in the destination directory which is renamed over
/// `path` only after everything was written, so a failure never leaves a partial file.
pub fn write_csv(dataset: &ShotDataset, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_dataset(dataset, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ShotError::Io(e.error.to_string()))?;

    info!(path = %path.display(), rows = dataset.len(), "wrote shot data");
    Ok(())
}

fn csv_error(err: csv::Error) -> ShotError {
    ShotError::Io(err.to_string())
}
