use crate::error::{ProcessingError, Result};
use crate::models::DataTable;
use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::path::Path;

/// Loads a per-station CSV export into a `DataTable`.
///
/// The first row names the columns. No column is required; schema checks
/// belong to whoever reads the table later. Short rows are padded with empty
/// cells, rows wider than the header are rejected.
pub struct SeriesReader {
    delimiter: u8,
}

impl SeriesReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn read_table(&self, path: &Path) -> Result<DataTable> {
        let bytes = std::fs::read(path)?;
        self.parse_table(&bytes)
    }

    pub fn parse_table(&self, bytes: &[u8]) -> Result<DataTable> {
        let text = decode(bytes);
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "row {} has {} fields, header has {}",
                    index + 1,
                    record.len(),
                    columns.len()
                )));
            }

            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        Ok(DataTable::new(columns, rows))
    }
}

impl Default for SeriesReader {
    fn default() -> Self {
        Self::new()
    }
}

/// USGS exports are UTF-8, but hand-edited files occasionally arrive as
/// Windows-1252
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}
