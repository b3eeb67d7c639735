use crate::error::Result;
use crate::models::DataTable;
use csv::WriterBuilder;
use std::path::Path;

/// Writes a series table back out as CSV, header first
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_table(&self, table: &DataTable, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = WriterBuilder::new().from_path(path)?;

        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::SeriesReader;
    use tempfile::TempDir;

    #[test]
    fn test_written_table_reads_back() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out").join("series.csv");
        let table = DataTable::new(
            vec!["Activity_StartDate".into(), "Result_Measure".into()],
            vec![vec!["2021-06-01".into(), "7,1".into()]],
        );

        CsvWriter::new().write_table(&table, &path)?;

        assert_eq!(SeriesReader::new().read_table(&path)?, table);
        Ok(())
    }
}
