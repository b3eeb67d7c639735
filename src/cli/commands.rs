use crate::cache::{CacheManager, CacheStore};
use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::{ProcessingError, Result};
use crate::models::{JoinedDataset, SeriesCategory};
use crate::processors::{JoinMode, Pipeline};
use crate::readers::ParameterNameTable;
use crate::utils::constants::DEFAULT_CONFIG_FILE;
use crate::writers::CsvWriter;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, Level};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let config_path = cli.config.or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.is_file().then_some(default)
    });
    let settings = Settings::load(config_path.as_deref())?;
    let pipeline = Pipeline::new(settings).with_progress(!cli.quiet);
    let working_dir = std::env::current_dir()?;

    match cli.command {
        Commands::Process {
            data_dir,
            output_file,
            separate,
        } => process(&pipeline, &data_dir, output_file, separate),

        Commands::Info {
            data_dir,
            cache,
            mode,
        } => {
            let mode = JoinMode::from(mode);
            let manager = CacheManager::new(working_dir, &data_dir, pipeline);
            let file_name = cache.unwrap_or_else(|| manager.default_file_name(mode).to_string());
            let dataset = manager.load_or_build(&file_name, mode)?;
            let names = ParameterNameTable::load(&manager.settings().parameter_reference);

            println!("{}", summarize(&dataset, &names, mode));
            Ok(())
        }

        Commands::Export {
            data_dir,
            station,
            parameter,
            mode,
            output,
        } => {
            let category = SeriesCategory::from(mode);
            let join_mode = JoinMode::from(category);
            let manager = CacheManager::new(working_dir, &data_dir, pipeline);
            let file_name = manager.default_file_name(join_mode).to_string();
            let dataset = manager.load_or_build(&file_name, join_mode)?;

            let output = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "station_{}_{}_{}_data.csv",
                    station,
                    parameter,
                    category.suffix()
                ))
            });
            export_series(&dataset, &station, &parameter, category, &output)?;

            println!("Wrote {}", output.display());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    // A subscriber may already be installed when run() is called twice in
    // one process; keep the first one
    let _ = match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if verbose {
        info!("Verbose logging enabled");
    }
    Ok(())
}

/// Run the pipeline and write one combined cache, or the dv/ir pair
pub fn process(
    pipeline: &Pipeline,
    data_dir: &Path,
    output_file: Option<PathBuf>,
    separate: bool,
) -> Result<()> {
    let settings = pipeline.settings();

    if separate {
        let dir = output_file
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let (dv, ir) = pipeline.build_separate(data_dir)?;
        CacheStore::save(&dv, &dir.join(&settings.dv_cache_file))?;
        CacheStore::save(&ir, &dir.join(&settings.ir_cache_file))?;

        println!(
            "Processed {} daily-values and {} instantaneous-values stations",
            dv.len(),
            ir.len()
        );
    } else {
        let output_file =
            output_file.unwrap_or_else(|| PathBuf::from(&settings.combined_cache_file));

        let dataset = pipeline.build(data_dir, JoinMode::Both)?;
        CacheStore::save(&dataset, &output_file)?;

        println!("Processed {} stations", dataset.len());
    }

    Ok(())
}

/// Check the selected series against its category and write it out
pub fn export_series(
    dataset: &JoinedDataset,
    station_id: &str,
    parameter_id: &str,
    category: SeriesCategory,
    output: &Path,
) -> Result<()> {
    let record = dataset
        .get(station_id)
        .ok_or_else(|| ProcessingError::StationNotFound {
            station_id: station_id.to_string(),
        })?;

    let series = record
        .parameter(parameter_id)
        .ok_or_else(|| ProcessingError::ParameterNotFound {
            station_id: station_id.to_string(),
            parameter_id: parameter_id.to_string(),
        })?;

    series.check_format(category)?;
    CsvWriter::new().write_table(&series.table, output)
}

/// Human-readable overview of a dataset, one block per station
pub fn summarize(dataset: &JoinedDataset, names: &ParameterNameTable, mode: JoinMode) -> String {
    let label = match mode {
        JoinMode::DailyValues => "Daily Values",
        JoinMode::IrregularValues => "Instantaneous Values",
        JoinMode::Both => "Daily and Instantaneous Values",
    };

    let mut lines = vec![
        format!("Station Locations ({})", label),
        format!("Stations: {}", dataset.len()),
        format!("Series: {}", dataset.series_count()),
    ];

    if let Some(bounds) = dataset.bounds() {
        lines.push(format!(
            "Bounds: lat [{:.4}, {:.4}], lon [{:.4}, {:.4}]",
            bounds.min_latitude, bounds.max_latitude, bounds.min_longitude, bounds.max_longitude
        ));
        lines.push(format!(
            "Center: lat={:.4}, lon={:.4}",
            bounds.center.latitude, bounds.center.longitude
        ));
    }

    for (station_id, record) in dataset {
        let location = record.location();
        lines.push(String::new());
        lines.push(format!(
            "Station {} ({:.4}, {:.4})",
            station_id, location.latitude, location.longitude
        ));
        for (parameter_id, series) in &record.parameters {
            lines.push(format!(
                "  {} [{}, {} rows]",
                names.display_name(parameter_id),
                series.category.suffix(),
                series.len()
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataTable, ParameterSeries, Station, StationRecord};
    use tempfile::TempDir;

    fn dataset() -> JoinedDataset {
        let mut record = StationRecord::new(Station::new("08158000", 30.2, -97.7));
        record.insert_parameter(
            "00060",
            ParameterSeries::new(
                SeriesCategory::DailyValues,
                DataTable::new(
                    vec!["datetimeUTC".into(), "00060_Mean".into()],
                    vec![vec!["2023-01-01".into(), "120".into()]],
                ),
            ),
        );
        let mut dataset = JoinedDataset::new();
        dataset.insert(record);
        dataset
    }

    #[test]
    fn test_summarize_uses_display_names() {
        let mut names = ParameterNameTable::new();
        names.insert("00060", "Discharge, cubic feet per second");

        let summary = summarize(&dataset(), &names, JoinMode::DailyValues);

        assert!(summary.starts_with("Station Locations (Daily Values)"));
        assert!(summary.contains("Stations: 1"));
        assert!(summary.contains("Station 08158000 (30.2000, -97.7000)"));
        assert!(summary.contains("00060 - Discharge, cubic feet per second [dv, 1 rows]"));
    }

    #[test]
    fn test_export_series() -> Result<()> {
        let dir = TempDir::new()?;
        let output = dir.path().join("export.csv");

        export_series(&dataset(), "08158000", "00060", SeriesCategory::DailyValues, &output)?;

        let written = std::fs::read_to_string(&output)?;
        assert_eq!(written, "datetimeUTC,00060_Mean\n2023-01-01,120\n");
        Ok(())
    }

    #[test]
    fn test_export_rejects_wrong_format() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("export.csv");

        let err = export_series(
            &dataset(),
            "08158000",
            "00060",
            SeriesCategory::IrregularValues,
            &output,
        )
        .unwrap_err();

        assert!(matches!(err, ProcessingError::UnexpectedSeriesFormat(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_export_unknown_station_or_parameter() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("export.csv");

        assert!(matches!(
            export_series(&dataset(), "nope", "00060", SeriesCategory::DailyValues, &output),
            Err(ProcessingError::StationNotFound { .. })
        ));
        assert!(matches!(
            export_series(&dataset(), "08158000", "99999", SeriesCategory::DailyValues, &output),
            Err(ProcessingError::ParameterNotFound { .. })
        ));
    }
}
