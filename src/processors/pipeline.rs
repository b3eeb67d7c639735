use crate::config::Settings;
use crate::error::Result;
use crate::models::{JoinedDataset, Station};
use crate::processors::{JoinMode, ParameterDataJoiner};
use crate::readers::StationReader;
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use tracing::info;

/// Station Locator followed by the Parameter Data Joiner, run in-process
pub struct Pipeline {
    settings: Settings,
    silent: bool,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            silent: true,
        }
    }

    /// Show a progress bar while joining
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.silent = !enabled;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn read_stations(&self, data_dir: &Path) -> Result<Vec<Station>> {
        let spinner = ProgressReporter::new_spinner("Loading station shapefile...", self.silent);
        let reader = StationReader::from_settings(&self.settings);
        let stations = reader.read_stations(&self.settings.shapefile_path(data_dir))?;

        spinner.finish_with_message(&format!("Loaded {} stations", stations.len()));
        Ok(stations)
    }

    pub fn build(&self, data_dir: &Path, mode: JoinMode) -> Result<JoinedDataset> {
        let stations = self.read_stations(data_dir)?;
        self.join(&stations, data_dir, mode)
    }

    /// Daily-values and irregular-values datasets from a single shapefile read
    pub fn build_separate(&self, data_dir: &Path) -> Result<(JoinedDataset, JoinedDataset)> {
        let stations = self.read_stations(data_dir)?;
        let dv = self.join(&stations, data_dir, JoinMode::DailyValues)?;
        let ir = self.join(&stations, data_dir, JoinMode::IrregularValues)?;
        Ok((dv, ir))
    }

    fn join(&self, stations: &[Station], data_dir: &Path, mode: JoinMode) -> Result<JoinedDataset> {
        let progress = ProgressReporter::new(
            stations.len() as u64,
            &format!("Joining stations ({:?})...", mode),
            self.silent,
        );

        let dataset = ParameterDataJoiner::new(mode).join(stations, data_dir, Some(&progress))?;

        progress.finish_with_message(&format!("Joined {} stations", dataset.len()));
        info!(
            "Joined {} of {} stations ({} series, {:?})",
            dataset.len(),
            stations.len(),
            dataset.series_count(),
            mode
        );

        Ok(dataset)
    }
}
