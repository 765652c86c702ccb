use std::fs;
use std::path::Path;

/// Load identifiers from a plaintext file, one per line. Lines are trimmed
/// and blank lines skipped. Identifiers stay opaque strings so leading
/// zeros survive.
pub fn load_identifiers(path: &Path) -> std::io::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    let ids: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    tracing::debug!("Loaded {} identifier(s) from {}", ids.len(), path.display());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cedulas.txt");
        fs::write(&path, "  10203040 \n\n0071234567\n   \n99\n").unwrap();

        let ids = load_identifiers(&path).unwrap();
        assert_eq!(ids, vec!["10203040", "0071234567", "99"]);
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.txt");
        fs::write(&path, "0001234\n").unwrap();

        let ids = load_identifiers(&path).unwrap();
        assert_eq!(ids[0], "0001234");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_identifiers(&dir.path().join("nope.txt")).is_err());
    }
}
