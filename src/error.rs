use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Shapefile error: {0}")]
    Shapefile(String),

    #[error("Cache serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Station source not found: {}", path.display())]
    StationSourceNotFound { path: PathBuf },

    #[error("Feature {index} has no usable '{field}' attribute")]
    MissingAttribute { index: usize, field: String },

    #[error("Station {station_id} not found")]
    StationNotFound { station_id: String },

    #[error("Parameter {parameter_id} not found for station {station_id}")]
    ParameterNotFound {
        station_id: String,
        parameter_id: String,
    },

    #[error("Selected data is not in the expected {0} format")]
    UnexpectedSeriesFormat(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<shapefile::Error> for ProcessingError {
    fn from(e: shapefile::Error) -> Self {
        ProcessingError::Shapefile(e.to_string())
    }
}
