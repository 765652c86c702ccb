use std::path::{Path, PathBuf};

use crate::config;
use crate::output::consolidate::merge;
use crate::output::{csv, xlsx};

/// Builds the unified CSV from the given per-category files, then mirrors it
/// to Excel. A failed mirror is reported but never fails the consolidation,
/// the CSV already holds everything.
pub fn consolidate(dir: &Path, sources: &[PathBuf]) -> anyhow::Result<()> {
    let table = merge(sources)?;
    if table.is_empty() {
        println!("Nothing to consolidate.");
        return Ok(());
    }

    let csv_path = csv::write_grid(&dir.join(config::UNIFIED_CSV), &table)?;
    println!("Wrote {}", csv_path.display());

    let xlsx_path = dir.join(config::UNIFIED_XLSX);
    match xlsx::mirror(&table, &xlsx_path) {
        Ok(()) => println!("Wrote {}", xlsx_path.display()),
        Err(err) => {
            tracing::warn!("Excel mirror failed: {err}");
            println!("Could not write the Excel mirror ({err}); the unified CSV is complete.");
        }
    }

    Ok(())
}

/// The category outputs, whether or not they exist yet. `merge` skips the
/// absent ones.
pub fn default_sources(dir: &Path) -> Vec<PathBuf> {
    config::CATEGORIES
        .iter()
        .map(|c| dir.join(c.output_file))
        .collect()
}
