use std::collections::HashMap;
use std::path::PathBuf;

use crate::config;

use super::UnifiedTable;
use super::csv::read_table;

/// Merges per-category CSVs into one table. Sources that do not exist are
/// skipped, so consolidation works no matter which categories ran.
///
/// Rows keep their source order. Columns come out in the preferred order
/// first, then any stragglers in the order they were first seen, and every
/// row is padded to the full column set.
pub fn merge(paths: &[PathBuf]) -> anyhow::Result<UnifiedTable> {
    let mut seen_columns: Vec<String> = Vec::new();
    let mut row_maps: Vec<HashMap<String, String>> = Vec::new();

    for path in paths {
        if !path.exists() {
            tracing::debug!("Skipping {}: not present", path.display());
            continue;
        }

        let (headers, rows) = read_table(path)?;
        for header in &headers {
            if !seen_columns.contains(header) {
                seen_columns.push(header.clone());
            }
        }
        for row in rows {
            row_maps.push(
                headers
                    .iter()
                    .cloned()
                    .zip(row)
                    .collect(),
            );
        }
    }

    let mut columns: Vec<String> = config::PREFERRED_COLUMNS
        .iter()
        .filter(|c| seen_columns.iter().any(|s| s == *c))
        .map(|c| c.to_string())
        .collect();
    for column in seen_columns {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }

    let rows = row_maps
        .into_iter()
        .map(|map| {
            columns
                .iter()
                .map(|c| map.get(c).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(UnifiedTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::csv::write_grid;

    fn write_csv(path: &PathBuf, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_merge_unions_columns_in_preferred_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        write_csv(&a, "identifier,status\n111,REGISTRADO\n");
        write_csv(&b, "identifier,observacion,status\n222,revisar,NO_REGISTRADO\n");

        let table = merge(&[a, b]).unwrap();

        // Preferred columns first, the unknown one trails in first-seen order.
        assert_eq!(table.columns, ["identifier", "status", "observacion"]);
        assert_eq!(table.rows[0], ["111", "REGISTRADO", ""]);
        assert_eq!(table.rows[1], ["222", "NO_REGISTRADO", "revisar"]);
    }

    #[test]
    fn test_merge_skips_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.csv");
        write_csv(&real, "identifier\n111\n");

        let table = merge(&[dir.path().join("ghost.csv"), real]).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.columns, ["identifier"]);
    }

    #[test]
    fn test_merge_of_nothing_is_empty() {
        let table = merge(&[PathBuf::from("/nonexistent/never.csv")]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent_over_its_own_output() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        write_csv(&a, "identifier,status,extra\n111,REGISTRADO,x\n");
        write_csv(&b, "identifier,status\n222,NO_REGISTRADO\n");

        let first = merge(&[a, b]).unwrap();
        let unified = dir.path().join("unificado.csv");
        write_grid(&unified, &first).unwrap();

        let second = merge(&[unified.clone()]).unwrap();
        assert_eq!(first, second);

        // Consolidating the consolidated file reproduces it byte for byte.
        let again = dir.path().join("unificado2.csv");
        write_grid(&again, &second).unwrap();
        assert_eq!(
            std::fs::read(&unified).unwrap(),
            std::fs::read(&again).unwrap()
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        write_csv(&a, "identifier,status,message\n111,REGISTRADO\n");

        let table = merge(&[a]).unwrap();

        assert_eq!(table.rows[0], ["111", "REGISTRADO", ""]);
    }
}
