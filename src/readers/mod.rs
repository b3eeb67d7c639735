pub mod parameter_names;
pub mod series_reader;
pub mod station_reader;

pub use parameter_names::ParameterNameTable;
pub use series_reader::SeriesReader;
pub use station_reader::StationReader;
