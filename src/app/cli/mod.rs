//! Command-line interface: arguments, configuration file and terminal output

pub mod args;
pub mod config;
pub mod display;
pub mod prompt;

pub use args::{Args, Command, InitArgs, ReceiveArgs, StreamArgs};
pub use config::{load_config_file, ConfigError, Settings, StoreLocation};
