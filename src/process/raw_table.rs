#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names from the header row.
    pub headers: Vec<String>,
    /// Each data row as one String per field, untouched.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |r| r[idx].as_str())
    }
}
