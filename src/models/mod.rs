pub mod dataset;
pub mod series;
pub mod station;

pub use dataset::{DatasetBounds, JoinedDataset, StationRecord};
pub use series::{DataTable, ParameterSeries, SeriesCategory, SeriesPoint};
pub use station::{Location, Station};
