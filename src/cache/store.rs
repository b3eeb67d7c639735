use crate::error::Result;
use crate::models::JoinedDataset;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Reads and writes `JoinedDataset` cache files (JSON, no schema tag)
pub struct CacheStore;

impl CacheStore {
    /// Write through a temporary file in the destination directory, then
    /// rename over `path`
    pub fn save(dataset: &JoinedDataset, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(&mut tmp);
            serde_json::to_writer(&mut writer, dataset)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| e.error)?;

        info!("Saved processed data to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<JoinedDataset> {
        let reader = BufReader::new(File::open(path)?);
        let dataset = serde_json::from_reader(reader)?;
        Ok(dataset)
    }
}
