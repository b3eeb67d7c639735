use crate::cache::CacheStore;
use crate::config::Settings;
use crate::error::Result;
use crate::models::JoinedDataset;
use crate::processors::{JoinMode, Pipeline};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of looking for a cache file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(PathBuf),
    Miss,
}

/// First existing file among `search_paths`, in order
pub fn resolve_cache(search_paths: &[PathBuf]) -> CacheLookup {
    search_paths
        .iter()
        .find(|p| p.is_file())
        .map(|p| CacheLookup::Hit(p.clone()))
        .unwrap_or(CacheLookup::Miss)
}

/// Cache-or-rebuild for joined datasets.
///
/// A cache in the working directory wins; one left in the data directory is
/// moved into the working directory first; otherwise the pipeline runs and
/// its result is written to the working directory. Caches are never
/// invalidated, delete the file to force a rebuild.
pub struct CacheManager {
    working_dir: PathBuf,
    data_dir: PathBuf,
    pipeline: Pipeline,
}

impl CacheManager {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            data_dir: data_dir.into(),
            pipeline,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.pipeline.settings()
    }

    pub fn working_path(&self, file_name: &str) -> PathBuf {
        self.working_dir.join(file_name)
    }

    pub fn search_paths(&self, file_name: &str) -> Vec<PathBuf> {
        vec![self.working_path(file_name), self.data_dir.join(file_name)]
    }

    pub fn load_or_build(&self, file_name: &str, mode: JoinMode) -> Result<JoinedDataset> {
        let target = self.working_path(file_name);

        match resolve_cache(&self.search_paths(file_name)) {
            CacheLookup::Hit(path) => {
                if path != target {
                    info!("Moving {} to {}", path.display(), target.display());
                    relocate(&path, &target)?;
                }
                debug!("Loading cached data from {}", target.display());
                CacheStore::load(&target)
            }
            CacheLookup::Miss => {
                info!("Processing data from {}...", self.data_dir.display());
                let dataset = self.pipeline.build(&self.data_dir, mode)?;
                CacheStore::save(&dataset, &target)?;
                Ok(dataset)
            }
        }
    }

    /// Daily-values and irregular-values datasets, each cached under its own name
    pub fn load_separate(&self) -> Result<(JoinedDataset, JoinedDataset)> {
        let settings = self.settings();
        let dv = self.load_or_build(&settings.dv_cache_file, JoinMode::DailyValues)?;
        let ir = self.load_or_build(&settings.ir_cache_file, JoinMode::IrregularValues)?;
        Ok((dv, ir))
    }

    /// The cache a mode is stored under by default
    pub fn default_file_name(&self, mode: JoinMode) -> &str {
        let settings = self.settings();
        match mode {
            JoinMode::DailyValues => &settings.dv_cache_file,
            JoinMode::IrregularValues => &settings.ir_cache_file,
            JoinMode::Both => &settings.combined_cache_file,
        }
    }
}

/// Move a file, falling back to copy-and-delete across filesystems
fn relocate(from: &Path, to: &Path) -> Result<()> {
    if std::fs::rename(from, to).is_err() {
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)?;
    }
    Ok(())
}
