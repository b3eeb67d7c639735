use crate::config::Settings;
use crate::error::{ProcessingError, Result};
use crate::models::Station;
use crate::utils::constants::{LATITUDE_FIELD, LONGITUDE_FIELD, STATION_ID_FIELD};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Reader, Shape};
use std::path::Path;
use tracing::{debug, info};

/// Reads station locations from a point shapefile.
///
/// Every feature becomes one `Station`, in file order. No filtering or
/// deduplication happens here.
pub struct StationReader {
    id_field: String,
    latitude_field: String,
    longitude_field: String,
}

impl StationReader {
    pub fn new() -> Self {
        Self::with_fields(STATION_ID_FIELD, LATITUDE_FIELD, LONGITUDE_FIELD)
    }

    pub fn with_fields(id_field: &str, latitude_field: &str, longitude_field: &str) -> Self {
        Self {
            id_field: id_field.to_string(),
            latitude_field: latitude_field.to_string(),
            longitude_field: longitude_field.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_fields(
            &settings.station_id_field,
            &settings.latitude_field,
            &settings.longitude_field,
        )
    }

    /// Read all stations from the `.shp` file (and its `.dbf` sidecar)
    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        if !path.exists() {
            return Err(ProcessingError::StationSourceNotFound {
                path: path.to_path_buf(),
            });
        }

        info!("Loading shapefile from {}", path.display());
        let mut reader = Reader::from_path(path)?;
        let mut stations = Vec::new();

        for (index, result) in reader.iter_shapes_and_records().enumerate() {
            let (shape, record) = result?;
            stations.push(self.parse_feature(index, &shape, &record)?);
        }

        info!("Number of stations: {}", stations.len());
        Ok(stations)
    }

    fn parse_feature(&self, index: usize, shape: &Shape, record: &Record) -> Result<Station> {
        let id = record
            .get(&self.id_field)
            .and_then(field_as_string)
            .ok_or_else(|| ProcessingError::MissingAttribute {
                index,
                field: self.id_field.clone(),
            })?;

        let point = point_coordinates(shape);

        let latitude = match record.get(&self.latitude_field).and_then(field_as_f64) {
            Some(lat) => lat,
            None => point.map(|(_, y)| y).ok_or_else(|| ProcessingError::MissingAttribute {
                index,
                field: self.latitude_field.clone(),
            })?,
        };

        let longitude = match record.get(&self.longitude_field).and_then(field_as_f64) {
            Some(lon) => lon,
            None => point.map(|(x, _)| x).ok_or_else(|| ProcessingError::MissingAttribute {
                index,
                field: self.longitude_field.clone(),
            })?,
        };

        debug!("Feature {}: station {} at ({}, {})", index, id, latitude, longitude);
        Ok(Station::new(id, latitude, longitude))
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn field_as_string(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(Some(s)) => Some(s.trim().to_string()),
        FieldValue::Memo(s) => Some(s.trim().to_string()),
        FieldValue::Integer(i) => Some(i.to_string()),
        FieldValue::Numeric(Some(n)) | FieldValue::Double(n) => Some(format_number(*n)),
        FieldValue::Float(Some(f)) => Some(format_number(f64::from(*f))),
        _ => None,
    }
}

fn field_as_f64(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Numeric(Some(n)) | FieldValue::Double(n) => Some(*n),
        FieldValue::Float(Some(f)) => Some(f64::from(*f)),
        FieldValue::Integer(i) => Some(f64::from(*i)),
        FieldValue::Character(Some(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whole numbers print without a fractional part, so a numeric site number
/// of 8158000 becomes "8158000" rather than "8158000.0"
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// (x, y) of a point geometry, i.e. (longitude, latitude)
fn point_coordinates(shape: &Shape) -> Option<(f64, f64)> {
    match shape {
        Shape::Point(p) => Some((p.x, p.y)),
        Shape::PointM(p) => Some((p.x, p.y)),
        Shape::PointZ(p) => Some((p.x, p.y)),
        _ => None,
    }
}
