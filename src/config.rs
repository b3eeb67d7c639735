//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `NWIS_*` environment variables (e.g. `NWIS_STATION_ID_FIELD=site_id`).

use crate::error::Result;
use crate::utils::constants::{
    COMBINED_CACHE_FILE, DV_CACHE_FILE, ENV_PREFIX, IR_CACHE_FILE, LATITUDE_FIELD,
    LONGITUDE_FIELD, PARAMETER_REFERENCE_FILE, STATIONS_SHAPEFILE, STATION_ID_FIELD,
};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// Station shapefile name, relative to the data directory
    #[validate(length(min = 1))]
    pub shapefile_name: String,

    #[validate(length(min = 1))]
    pub station_id_field: String,

    #[validate(length(min = 1))]
    pub latitude_field: String,

    #[validate(length(min = 1))]
    pub longitude_field: String,

    #[validate(length(min = 1))]
    pub combined_cache_file: String,

    #[validate(length(min = 1))]
    pub dv_cache_file: String,

    #[validate(length(min = 1))]
    pub ir_cache_file: String,

    pub parameter_reference: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shapefile_name: STATIONS_SHAPEFILE.to_string(),
            station_id_field: STATION_ID_FIELD.to_string(),
            latitude_field: LATITUDE_FIELD.to_string(),
            longitude_field: LONGITUDE_FIELD.to_string(),
            combined_cache_file: COMBINED_CACHE_FILE.to_string(),
            dv_cache_file: DV_CACHE_FILE.to_string(),
            ir_cache_file: IR_CACHE_FILE.to_string(),
            parameter_reference: PathBuf::from(PARAMETER_REFERENCE_FILE),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file plus the environment.
    ///
    /// An explicitly named file must exist; without one only the environment
    /// is consulted on top of the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn shapefile_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.shapefile_name)
    }
}
