pub mod consolidate;
pub mod csv;
pub mod xlsx;

/// Column-ordered grid shared by the consolidated CSV and its Excel mirror.
#[derive(Debug, PartialEq)]
pub struct UnifiedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl UnifiedTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}
