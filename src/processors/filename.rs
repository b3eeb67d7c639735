//! Grammar for per-station export file names.
//!
//! ```text
//! station_<station_id>[_<qualifier>...]_parameter_<parameter_id>[_<extra>...]_<dv|ir>.csv
//! ```
//!
//! e.g. `station_08158000_parameter_00060_dv.csv` or
//! `station_08158000_WaterQualityData_parameter_00400_ir.csv`.

use crate::models::SeriesCategory;
use crate::utils::constants::{CSV_EXTENSION, MIN_FILENAME_SEGMENTS, PARAMETER_TOKEN, STATION_TOKEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFilename {
    Recognized {
        station_id: String,
        parameter_id: String,
        category: SeriesCategory,
    },
    Unrecognized,
}

impl ParsedFilename {
    /// Split a file name into station id, parameter id and category.
    ///
    /// An empty parameter id, as in `station_1_parameter__dv.csv`, makes the
    /// name Unrecognized. Such a file is skipped instead of being stored
    /// under an empty parameter key.
    pub fn parse(file_name: &str) -> Self {
        let Some(stem) = file_name.strip_suffix(CSV_EXTENSION) else {
            return ParsedFilename::Unrecognized;
        };

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < MIN_FILENAME_SEGMENTS || parts[0] != STATION_TOKEN {
            return ParsedFilename::Unrecognized;
        }

        let last = parts.len() - 1;
        let Some(category) = SeriesCategory::from_suffix(parts[last]) else {
            return ParsedFilename::Unrecognized;
        };

        // The parameter id sits right after the token and must not be the
        // category segment itself
        let Some(token) = parts[2..last].iter().position(|p| *p == PARAMETER_TOKEN) else {
            return ParsedFilename::Unrecognized;
        };
        let id_index = token + 3;
        if id_index >= last || parts[id_index].is_empty() || parts[1].is_empty() {
            return ParsedFilename::Unrecognized;
        }

        ParsedFilename::Recognized {
            station_id: parts[1].to_string(),
            parameter_id: parts[id_index].to_string(),
            category,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, ParsedFilename::Recognized { .. })
    }

    pub fn parameter_id(&self) -> Option<&str> {
        match self {
            ParsedFilename::Recognized { parameter_id, .. } => Some(parameter_id.as_str()),
            ParsedFilename::Unrecognized => None,
        }
    }
}
