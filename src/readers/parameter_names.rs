use crate::utils::constants::{PARAMETER_CODE_COLUMN, PARAMETER_NAME_COLUMN};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Lookup from USGS parameter code (e.g. `00060`) to its long name.
///
/// Loading never fails: a missing or unusable reference file yields an empty
/// table and codes are then shown bare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterNameTable {
    names: HashMap<String, String>,
}

impl ParameterNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Self {
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some("txt") | Some("rdb") | Some("tsv") => b'\t',
            _ => b',',
        };

        match std::fs::read(path) {
            Ok(bytes) => Self::parse(&bytes, delimiter).unwrap_or_else(|| {
                debug!(
                    "Parameter reference {} has no usable {}/{} columns",
                    path.display(),
                    PARAMETER_CODE_COLUMN,
                    PARAMETER_NAME_COLUMN
                );
                Self::default()
            }),
            Err(e) => {
                debug!("Parameter reference {} not loaded: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// The header row may be preceded by comment lines or a preamble row
    fn parse(bytes: &[u8], delimiter: u8) -> Option<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(bytes);

        let mut columns: Option<(usize, usize)> = None;
        let mut names = HashMap::new();

        for record in reader.records() {
            let record = record.ok()?;

            match columns {
                None => {
                    let code = record.iter().position(|f| f.trim() == PARAMETER_CODE_COLUMN);
                    let name = record.iter().position(|f| f.trim() == PARAMETER_NAME_COLUMN);
                    if let (Some(code), Some(name)) = (code, name) {
                        columns = Some((code, name));
                    }
                }
                Some((code, name)) => {
                    if let (Some(code), Some(name)) = (record.get(code), record.get(name)) {
                        names.insert(code.trim().to_string(), name.trim().to_string());
                    }
                }
            }
        }

        columns.map(|_| Self { names })
    }

    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.names.insert(code.into(), name.into());
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// `"00060 - Discharge, cubic feet per second"`, or the bare code when unknown
    pub fn display_name(&self, code: &str) -> String {
        match self.name(code) {
            Some(name) => format!("{} - {}", code, name),
            None => code.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
