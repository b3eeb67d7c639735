use crate::error::Result;
use crate::models::{JoinedDataset, ParameterSeries, SeriesCategory, Station, StationRecord};
use crate::processors::ParsedFilename;
use crate::readers::SeriesReader;
use crate::utils::constants::{CSV_EXTENSION, PARAMETER_TOKEN, STATION_TOKEN, WATER_QUALITY_TOKEN};
use crate::utils::progress::ProgressReporter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Which file families a join picks up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JoinMode {
    DailyValues,
    IrregularValues,
    #[default]
    Both,
}

impl JoinMode {
    /// Categories in application order; with `Both`, an ir file overwrites a
    /// dv file that resolves to the same parameter id
    pub fn categories(&self) -> &'static [SeriesCategory] {
        match self {
            JoinMode::DailyValues => &[SeriesCategory::DailyValues],
            JoinMode::IrregularValues => &[SeriesCategory::IrregularValues],
            JoinMode::Both => &SeriesCategory::ALL,
        }
    }
}

impl From<SeriesCategory> for JoinMode {
    fn from(category: SeriesCategory) -> Self {
        match category {
            SeriesCategory::DailyValues => JoinMode::DailyValues,
            SeriesCategory::IrregularValues => JoinMode::IrregularValues,
        }
    }
}

/// A `<prefix>*<suffix>` file name pattern for one station and category:
///
/// - dv: `station_<id>_parameter_*_dv.csv`
/// - ir: `station_<id>_WaterQualityData_parameter_*_ir.csv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    prefix: String,
    suffix: String,
}

impl FilePattern {
    pub fn for_station(station_id: &str, category: SeriesCategory) -> Self {
        let prefix = match category {
            SeriesCategory::DailyValues => {
                format!("{}_{}_{}_", STATION_TOKEN, station_id, PARAMETER_TOKEN)
            }
            SeriesCategory::IrregularValues => format!(
                "{}_{}_{}_{}_",
                STATION_TOKEN, station_id, WATER_QUALITY_TOKEN, PARAMETER_TOKEN
            ),
        };
        let suffix = format!("_{}{}", category.suffix(), CSV_EXTENSION);

        Self { prefix, suffix }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.len() >= self.prefix.len() + self.suffix.len()
            && file_name.starts_with(&self.prefix)
            && file_name.ends_with(&self.suffix)
    }
}

impl std::fmt::Display for FilePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*{}", self.prefix, self.suffix)
    }
}

/// Attaches per-station CSV exports to the stations they belong to.
pub struct ParameterDataJoiner {
    mode: JoinMode,
    reader: SeriesReader,
}

impl ParameterDataJoiner {
    pub fn new(mode: JoinMode) -> Self {
        Self {
            mode,
            reader: SeriesReader::new(),
        }
    }

    /// Join every station with its matching files in `data_dir`.
    ///
    /// Stations without a single match are left out of the result.
    pub fn join(
        &self,
        stations: &[Station],
        data_dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<JoinedDataset> {
        let files = list_csv_files(data_dir)?;
        let mut dataset = JoinedDataset::new();

        for station in stations {
            info!("Processing station {}", station.id);
            if let Some(progress) = progress {
                progress.set_message(&format!("Station {}", station.id));
            }
            let record = self.join_station(station, data_dir, &files)?;

            if !dataset.insert(record) {
                debug!("Station {} has no matching files, dropped", station.id);
            }

            if let Some(progress) = progress {
                progress.increment(1);
            }
        }

        Ok(dataset)
    }

    /// Build one station's record from the pre-listed file names of `data_dir`
    pub fn join_station(
        &self,
        station: &Station,
        data_dir: &Path,
        files: &[String],
    ) -> Result<StationRecord> {
        let mut record = StationRecord::new(station.clone());

        for &category in self.mode.categories() {
            let pattern = FilePattern::for_station(&station.id, category);

            for file_name in files.iter().filter(|f| pattern.matches(f)) {
                let parameter_id = match ParsedFilename::parse(file_name) {
                    ParsedFilename::Recognized { parameter_id, .. } => parameter_id,
                    ParsedFilename::Unrecognized => {
                        debug!("Skipping {}: unrecognized file name", file_name);
                        continue;
                    }
                };

                info!("Processing {}", file_name);
                let table = self.reader.read_table(&data_dir.join(file_name))?;
                record.insert_parameter(parameter_id, ParameterSeries::new(category, table));
            }
        }

        Ok(record)
    }
}

impl Default for ParameterDataJoiner {
    fn default() -> Self {
        Self::new(JoinMode::default())
    }
}

/// CSV file names directly inside `dir`, sorted so repeated runs resolve
/// duplicate parameter ids the same way. Symlinks to files count as files.
pub fn list_csv_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(CSV_EXTENSION) {
                files.push(name.to_string());
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = dir.path();
        write_csv(
            path,
            "station_01_parameter_00060_dv.csv",
            "datetimeUTC,00060_Mean\n2023-01-01,10\n2023-01-02,11\n",
        );
        write_csv(
            path,
            "station_01_parameter_00065_dv.csv",
            "datetimeUTC,00065_Mean\n2023-01-01,3.2\n",
        );
        write_csv(
            path,
            "station_01_WaterQualityData_parameter_00400_ir.csv",
            "Activity_StartDate,Result_Measure\n2022-05-01,7.2\n",
        );
        write_csv(
            path,
            "station_02_WaterQualityData_parameter_00300_ir.csv",
            "Activity_StartDate,Result_Measure\n2022-05-01,8.9\n",
        );
        dir
    }

    fn stations() -> Vec<Station> {
        vec![
            Station::new("01", 30.0, -97.0),
            Station::new("02", 31.0, -98.0),
            Station::new("03", 32.0, -99.0),
        ]
    }

    #[test]
    fn test_file_patterns() {
        let dv = FilePattern::for_station("01", SeriesCategory::DailyValues);
        let ir = FilePattern::for_station("01", SeriesCategory::IrregularValues);

        assert_eq!(dv.to_string(), "station_01_parameter_*_dv.csv");
        assert_eq!(ir.to_string(), "station_01_WaterQualityData_parameter_*_ir.csv");

        assert!(dv.matches("station_01_parameter_00060_dv.csv"));
        assert!(!dv.matches("station_011_parameter_00060_dv.csv"));
        assert!(!dv.matches("station_01_WaterQualityData_parameter_00400_ir.csv"));
        assert!(ir.matches("station_01_WaterQualityData_parameter_00400_ir.csv"));
        assert!(!ir.matches("station_01_parameter_00060_dv.csv"));
    }

    #[test]
    fn test_join_both() -> Result<()> {
        let dir = fixture();
        let dataset = ParameterDataJoiner::new(JoinMode::Both).join(&stations(), dir.path(), None)?;

        assert_eq!(dataset.station_ids(), vec!["01", "02"]);
        let first = dataset.get("01").unwrap();
        assert_eq!(first.parameter_ids(), vec!["00060", "00065", "00400"]);
        assert_eq!(first.parameter("00060").unwrap().len(), 2);
        assert_eq!(
            first.parameter("00400").unwrap().category,
            SeriesCategory::IrregularValues
        );

        Ok(())
    }

    #[test]
    fn test_mode_isolation() -> Result<()> {
        let dir = fixture();

        let dv = ParameterDataJoiner::new(JoinMode::DailyValues).join(&stations(), dir.path(), None)?;
        assert_eq!(dv.station_ids(), vec!["01"]);
        assert!(dv
            .iter()
            .flat_map(|(_, r)| r.parameters.values())
            .all(|s| s.category == SeriesCategory::DailyValues));

        let ir = ParameterDataJoiner::new(JoinMode::IrregularValues).join(&stations(), dir.path(), None)?;
        assert_eq!(ir.station_ids(), vec!["01", "02"]);
        assert_eq!(ir.get("01").unwrap().parameter_ids(), vec!["00400"]);

        Ok(())
    }

    #[test]
    fn test_every_station_has_parameters() -> Result<()> {
        let dir = fixture();
        let dataset = ParameterDataJoiner::default().join(&stations(), dir.path(), None)?;

        assert!(!dataset.contains("03"));
        assert!(dataset.iter().all(|(_, r)| !r.parameters.is_empty()));

        Ok(())
    }

    #[test]
    fn test_malformed_names_are_skipped() -> Result<()> {
        let dir = TempDir::new()?;
        // Matches the dv pattern but has an empty parameter id
        write_csv(dir.path(), "station_05_parameter__dv.csv", "datetimeUTC,v\n");

        let dataset = ParameterDataJoiner::default().join(
            &[Station::new("05", 0.0, 0.0)],
            dir.path(),
            None,
        )?;

        assert!(dataset.is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicate_parameter_id_resolves_in_name_order() -> Result<()> {
        let dir = TempDir::new()?;
        write_csv(
            dir.path(),
            "station_01_parameter_00060_a_dv.csv",
            "datetimeUTC,v\n2023-01-01,1\n",
        );
        write_csv(
            dir.path(),
            "station_01_parameter_00060_b_dv.csv",
            "datetimeUTC,v\n2023-01-01,1\n2023-01-02,2\n",
        );

        let dataset = ParameterDataJoiner::new(JoinMode::DailyValues).join(
            &[Station::new("01", 0.0, 0.0)],
            dir.path(),
            None,
        )?;

        let record = dataset.get("01").unwrap();
        assert_eq!(record.parameters.len(), 1);
        assert_eq!(record.parameter("00060").unwrap().len(), 2);

        Ok(())
    }

    #[test]
    fn test_list_csv_files_ignores_other_entries() -> Result<()> {
        let dir = fixture();
        std::fs::create_dir(dir.path().join("nested.csv"))?;
        write_csv(dir.path(), "notes.txt", "hello");

        let files = list_csv_files(dir.path())?;

        assert_eq!(files.len(), 4);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_exports_are_joined() -> Result<()> {
        let source = TempDir::new()?;
        let data = TempDir::new()?;
        write_csv(
            source.path(),
            "export.csv",
            "datetimeUTC,00060_Mean\n2023-01-01,10\n2023-01-02,11\n",
        );
        std::os::unix::fs::symlink(
            source.path().join("export.csv"),
            data.path().join("station_01_parameter_00060_dv.csv"),
        )?;

        let dataset = ParameterDataJoiner::new(JoinMode::DailyValues).join(
            &stations(),
            data.path(),
            None,
        )?;

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.get("01").unwrap().parameter("00060").unwrap().len(), 2);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_ignored() -> Result<()> {
        let data = TempDir::new()?;
        std::os::unix::fs::symlink(
            data.path().join("gone.csv"),
            data.path().join("station_01_parameter_00060_dv.csv"),
        )?;

        assert!(list_csv_files(data.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");

        assert!(ParameterDataJoiner::default().join(&stations(), &missing, None).is_err());
    }
}
