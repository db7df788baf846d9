use std::collections::HashMap;

/// Placeholder used when an optional column is missing or empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// One spreadsheet row, addressed by column name.
///
/// Empty cells are treated as absent, the same way a blank cell reads as a
/// missing value in a dataframe.
#[derive(Debug, Clone, Default)]
pub struct RowRecord {
    /// 1-based position of the row among the data rows of the file.
    pub number: usize,
    cells: HashMap<String, String>,
}

impl RowRecord {
    pub fn new(number: usize, cells: HashMap<String, String>) -> Self {
        Self { number, cells }
    }

    pub fn from_pairs<I, K, V>(number: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let cells = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { number, cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|value| value.as_str())
            .filter(|value| !value.trim().is_empty())
    }

    pub fn get_or_na(&self, column: &str) -> &str {
        self.get(column).unwrap_or(NOT_AVAILABLE)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }
}
