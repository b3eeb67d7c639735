pub mod args;
pub mod commands;

pub use args::{CategoryArg, Cli, Commands, ModeArg};
pub use commands::run;
