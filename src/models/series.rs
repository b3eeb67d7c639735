use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DV_TIMESTAMP_COLUMN, IR_DATE_COLUMN, IR_RESULT_COLUMN};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Which family of NWIS export a series came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeriesCategory {
    /// Daily values, keyed by a UTC timestamp column
    DailyValues,
    /// Irregular water-quality samples, keyed by activity start date
    IrregularValues,
}

impl SeriesCategory {
    pub const ALL: [SeriesCategory; 2] = [
        SeriesCategory::DailyValues,
        SeriesCategory::IrregularValues,
    ];

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "dv" => Some(SeriesCategory::DailyValues),
            "ir" => Some(SeriesCategory::IrregularValues),
            _ => None,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            SeriesCategory::DailyValues => "dv",
            SeriesCategory::IrregularValues => "ir",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SeriesCategory::DailyValues => "Daily Values",
            SeriesCategory::IrregularValues => "Irregular Values",
        }
    }
}

impl std::fmt::Display for SeriesCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Header plus rows of raw cell text. Column types are never inferred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell values of one column, top to bottom
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(move |row| row.get(index).map(String::as_str).unwrap_or("")),
        )
    }
}

/// One observation extracted from a series for plotting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSeries {
    pub category: SeriesCategory,
    pub table: DataTable,
}

impl ParameterSeries {
    pub fn new(category: SeriesCategory, table: DataTable) -> Self {
        Self { category, table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Check that the table carries the columns the given category is read by.
    ///
    /// Nothing upstream enforces this, so a dv cache can hold a table that
    /// fails here.
    pub fn check_format(&self, expected: SeriesCategory) -> Result<()> {
        let ok = match expected {
            SeriesCategory::DailyValues => self.table.has_column(DV_TIMESTAMP_COLUMN),
            SeriesCategory::IrregularValues => {
                self.table.has_column(IR_DATE_COLUMN) && self.table.has_column(IR_RESULT_COLUMN)
            }
        };

        if ok {
            Ok(())
        } else {
            Err(ProcessingError::UnexpectedSeriesFormat(
                expected.display_name().to_string(),
            ))
        }
    }

    /// Columns of a daily-values table that can be plotted against time
    pub fn value_columns(&self) -> Vec<&str> {
        self.table
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| *c != DV_TIMESTAMP_COLUMN)
            .collect()
    }

    /// Timestamped values of one daily-values column. Blank or non-numeric
    /// cells become `None`; an unparseable timestamp is an error.
    pub fn daily_points(&self, column: &str) -> Result<Vec<SeriesPoint>> {
        self.check_format(SeriesCategory::DailyValues)?;

        let timestamps = self.column(DV_TIMESTAMP_COLUMN)?;
        let values = self.column(column)?;

        timestamps
            .zip(values)
            .map(|(ts, value)| -> Result<SeriesPoint> {
                Ok(SeriesPoint {
                    timestamp: parse_timestamp(ts)?,
                    value: parse_value(value),
                })
            })
            .collect()
    }

    /// Sample results of an irregular series; rows without a numeric result
    /// are dropped.
    pub fn irregular_points(&self) -> Result<Vec<SeriesPoint>> {
        self.check_format(SeriesCategory::IrregularValues)?;

        let dates = self.column(IR_DATE_COLUMN)?;
        let results = self.column(IR_RESULT_COLUMN)?;

        let mut points = Vec::new();
        for (date, result) in dates.zip(results) {
            if let Some(value) = parse_value(result) {
                points.push(SeriesPoint {
                    timestamp: parse_timestamp(date)?,
                    value: Some(value),
                });
            }
        }

        Ok(points)
    }

    fn column<'a>(&'a self, name: &str) -> Result<impl Iterator<Item = &'a str> + 'a> {
        self.table
            .column_values(name)
            .ok_or_else(|| ProcessingError::InvalidFormat(format!("Column '{}' not found", name)))
    }
}

/// Parse the timestamp spellings found in NWIS exports
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt);
    }

    Err(ProcessingError::InvalidFormat(format!(
        "Unrecognized timestamp: '{}'",
        raw
    )))
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily_series() -> ParameterSeries {
        ParameterSeries::new(
            SeriesCategory::DailyValues,
            DataTable::new(
                vec!["datetimeUTC".into(), "00060_Mean".into(), "00060_Mean_cd".into()],
                vec![
                    vec!["2023-01-01".into(), "12.5".into(), "A".into()],
                    vec!["2023-01-02 00:00:00+00:00".into(), "".into(), "A".into()],
                ],
            ),
        )
    }

    fn irregular_series() -> ParameterSeries {
        ParameterSeries::new(
            SeriesCategory::IrregularValues,
            DataTable::new(
                vec!["Activity_StartDate".into(), "Result_Measure".into()],
                vec![
                    vec!["2021-06-01".into(), "7.1".into()],
                    vec!["2021-07-15".into(), "NaN".into()],
                    vec!["2021-08-20".into(), "7.4".into()],
                ],
            ),
        )
    }

    #[test]
    fn test_category_suffixes() {
        assert_eq!(SeriesCategory::from_suffix("dv"), Some(SeriesCategory::DailyValues));
        assert_eq!(SeriesCategory::from_suffix("ir"), Some(SeriesCategory::IrregularValues));
        assert_eq!(SeriesCategory::from_suffix("iv"), None);
        assert_eq!(SeriesCategory::IrregularValues.suffix(), "ir");
    }

    #[test]
    fn test_check_format() {
        assert!(daily_series().check_format(SeriesCategory::DailyValues).is_ok());
        assert!(daily_series().check_format(SeriesCategory::IrregularValues).is_err());
        assert!(irregular_series().check_format(SeriesCategory::IrregularValues).is_ok());

        let err = irregular_series()
            .check_format(SeriesCategory::DailyValues)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Selected data is not in the expected Daily Values format"
        );
    }

    #[test]
    fn test_value_columns_exclude_timestamp() {
        assert_eq!(daily_series().value_columns(), vec!["00060_Mean", "00060_Mean_cd"]);
    }

    #[test]
    fn test_daily_points() {
        let points = daily_series().daily_points("00060_Mean").unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, Some(12.5));
        assert_eq!(points[1].value, None);
        assert_eq!(
            points[1].timestamp,
            NaiveDate::from_ymd_opt(2023, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_daily_points_unknown_column() {
        assert!(daily_series().daily_points("00065_Mean").is_err());
    }

    #[test]
    fn test_irregular_points_drop_missing_results() {
        let points = irregular_series().irregular_points().unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, Some(7.1));
        assert_eq!(points[1].value, Some(7.4));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = NaiveDate::from_ymd_opt(2020, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();

        assert_eq!(parse_timestamp("2020-03-04T05:06:07Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2020-03-04 05:06:07").unwrap(), expected);
        assert_eq!(parse_timestamp("2020-03-04T05:06:07").unwrap(), expected);
        assert_eq!(parse_timestamp("2020-03-04 07:06:07+02:00").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }
}
