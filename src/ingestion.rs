use crate::error::Result;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// An untyped table of string cells, as handed over by a file loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let mut index = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            // First occurrence wins for duplicated headers.
            index.entry(header.clone()).or_insert(i);
        }
        Self {
            headers,
            rows,
            index,
        }
    }

    /// Convenience constructor for `&str` literals.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(Self::new(headers, rows))
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value, or `None` when the column is absent. Short rows read as empty.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = *self.index.get(column)?;
        let row = self.rows.get(row)?;
        Some(row.get(col).map(String::as_str).unwrap_or(""))
    }

    /// All values of one column, in row order.
    pub fn column(&self, column: &str) -> Option<Vec<&str>> {
        if !self.has_column(column) {
            return None;
        }
        Some(
            (0..self.rows.len())
                .map(|r| self.cell(r, column).unwrap_or(""))
                .collect(),
        )
    }
}
