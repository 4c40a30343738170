pub mod config;
pub mod run;
pub mod schedule;

use std::path::PathBuf;

use hydrosiren_core::{Config, CoreError};

/// Load the configuration from the chosen path or the default location.
pub fn load_config(path: Option<PathBuf>) -> Result<Config, CoreError> {
    let path = path.unwrap_or_else(Config::default_path);
    Ok(Config::load(&path)?)
}
