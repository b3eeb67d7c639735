use crate::models::{Location, ParameterSeries, Station};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// A station together with every parameter series found for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub station: Station,
    pub parameters: BTreeMap<String, ParameterSeries>,
}

impl StationRecord {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            parameters: BTreeMap::new(),
        }
    }

    pub fn location(&self) -> Location {
        self.station.location
    }

    /// Attach a series, replacing any earlier one with the same identifier
    pub fn insert_parameter(&mut self, parameter_id: impl Into<String>, series: ParameterSeries) {
        self.parameters.insert(parameter_id.into(), series);
    }

    pub fn parameter(&self, parameter_id: &str) -> Option<&ParameterSeries> {
        self.parameters.get(parameter_id)
    }

    pub fn parameter_ids(&self) -> Vec<&str> {
        self.parameters.keys().map(String::as_str).collect()
    }
}

/// Bounding box and mean centre of a set of station locations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub center: Location,
}

/// Stations keyed by identifier.
///
/// A station is only ever present with at least one parameter series;
/// `insert` silently refuses records without any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinedDataset {
    stations: BTreeMap<String, StationRecord>,
}

impl JoinedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the record was dropped for having no parameters
    pub fn insert(&mut self, record: StationRecord) -> bool {
        if record.parameters.is_empty() {
            return false;
        }
        self.stations.insert(record.station.id.clone(), record);
        true
    }

    pub fn get(&self, station_id: &str) -> Option<&StationRecord> {
        self.stations.get(station_id)
    }

    pub fn contains(&self, station_id: &str) -> bool {
        self.stations.contains_key(station_id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn station_ids(&self) -> Vec<&str> {
        self.stations.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, StationRecord> {
        self.stations.iter()
    }

    /// Total number of parameter series across all stations
    pub fn series_count(&self) -> usize {
        self.stations.values().map(|r| r.parameters.len()).sum()
    }

    pub fn bounds(&self) -> Option<DatasetBounds> {
        let mut locations = self.stations.values().map(StationRecord::location);
        let first = locations.next()?;

        let mut bounds = DatasetBounds {
            min_latitude: first.latitude,
            max_latitude: first.latitude,
            min_longitude: first.longitude,
            max_longitude: first.longitude,
            center: first,
        };
        let (mut lat_sum, mut lon_sum, mut count) = (first.latitude, first.longitude, 1usize);

        for location in locations {
            bounds.min_latitude = bounds.min_latitude.min(location.latitude);
            bounds.max_latitude = bounds.max_latitude.max(location.latitude);
            bounds.min_longitude = bounds.min_longitude.min(location.longitude);
            bounds.max_longitude = bounds.max_longitude.max(location.longitude);
            lat_sum += location.latitude;
            lon_sum += location.longitude;
            count += 1;
        }

        bounds.center = Location::new(lat_sum / count as f64, lon_sum / count as f64);
        Some(bounds)
    }
}

impl<'a> IntoIterator for &'a JoinedDataset {
    type Item = (&'a String, &'a StationRecord);
    type IntoIter = btree_map::Iter<'a, String, StationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
