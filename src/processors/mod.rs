pub mod data_joiner;
pub mod filename;
pub mod pipeline;

pub use data_joiner::{list_csv_files, FilePattern, JoinMode, ParameterDataJoiner};
pub use filename::ParsedFilename;
pub use pipeline::Pipeline;
