use crate::models::SeriesCategory;
use crate::processors::JoinMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nwis-processor")]
#[command(about = "Join NWIS station locations with their time-series exports and cache the result")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and hide progress bars")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join the station shapefile with its CSV exports and write the cache
    Process {
        #[arg(short, long, help = "Directory containing the shapefile and CSV files")]
        data_dir: PathBuf,

        #[arg(
            short,
            long,
            help = "Output cache file [default: processed_station_data.json]; with --separate, its directory receives the dv/ir caches"
        )]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Write daily and instantaneous values to separate files")]
        separate: bool,
    },

    /// Summarize a joined dataset, building its cache if needed
    Info {
        #[arg(short, long, help = "Directory containing the shapefile and CSV files")]
        data_dir: PathBuf,

        #[arg(short, long, help = "Cache file name [default depends on --mode]")]
        cache: Option<String>,

        #[arg(short, long, value_enum, default_value_t = ModeArg::Both)]
        mode: ModeArg,
    },

    /// Write one station's parameter series to CSV
    Export {
        #[arg(short, long, help = "Directory containing the shapefile and CSV files")]
        data_dir: PathBuf,

        #[arg(short, long)]
        station: String,

        #[arg(short, long, help = "Parameter code, e.g. 00060")]
        parameter: String,

        #[arg(short, long, value_enum)]
        mode: CategoryArg,

        #[arg(
            short,
            long,
            help = "Output CSV path [default: station_{ID}_{PARAMETER}_{dv|ir}_data.csv]"
        )]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Dv,
    Ir,
    Both,
}

impl From<ModeArg> for JoinMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Dv => JoinMode::DailyValues,
            ModeArg::Ir => JoinMode::IrregularValues,
            ModeArg::Both => JoinMode::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Dv,
    Ir,
}

impl From<CategoryArg> for SeriesCategory {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::Dv => SeriesCategory::DailyValues,
            CategoryArg::Ir => SeriesCategory::IrregularValues,
        }
    }
}
