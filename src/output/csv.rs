use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::affiliate::OutcomeRecord;
use crate::config;
use crate::error::AppError;

use super::UnifiedTable;

/// Writes one category's outcomes. An empty batch still produces the header
/// row so downstream tooling sees a well-formed file.
///
/// Returns the path actually written, which differs from `path` when the
/// target was not writable.
pub fn write_outcomes(path: &Path, records: &[OutcomeRecord]) -> Result<PathBuf, AppError> {
    let (file, actual) = create_with_fallback(path)?;
    let mut writer = csv::Writer::from_writer(file);

    if records.is_empty() {
        writer.write_record(config::PREFERRED_COLUMNS)?;
    } else {
        for record in records {
            writer.serialize(record)?;
        }
    }

    writer.flush()?;
    Ok(actual)
}

/// Writes an already-consolidated grid verbatim.
pub fn write_grid(path: &Path, table: &UnifiedTable) -> Result<PathBuf, AppError> {
    let (file, actual) = create_with_fallback(path)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer.flush()?;
    Ok(actual)
}

/// Reads a CSV back as (headers, rows). Short rows are tolerated; the
/// consolidator fills the gaps.
pub fn read_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), AppError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok((headers, rows))
}

/// Opens `path` for writing; when the filesystem says no (typically the
/// file is held open by a spreadsheet program or marked read-only), falls
/// back to a timestamped sibling instead of losing the batch.
fn create_with_fallback(path: &Path) -> Result<(fs::File, PathBuf), AppError> {
    match fs::File::create(path) {
        Ok(file) => Ok((file, path.to_path_buf())),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => {
            let alt = timestamped_sibling(path);
            tracing::warn!(
                "Could not write {} ({err}), writing {} instead",
                path.display(),
                alt.display()
            );
            let file = fs::File::create(&alt)?;
            Ok((file, alt))
        }
        Err(err) => Err(err.into()),
    }
}

fn timestamped_sibling(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("salida");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("csv");
    path.with_file_name(format!("{stem}_{}.{ext}", chrono::Utc::now().timestamp()))
}
