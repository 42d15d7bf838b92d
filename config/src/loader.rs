//! Load configuration from a TOML file, following the pattern of
//! `witnet_config::loaders::toml`.

use std::path::Path;

use crate::{Config, ConfigError};

/// Load configuration from a file written in TOML format.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    log::debug!("loading config from `{}`", path.display());
    let contents = std::fs::read_to_string(path)?;
    Config::from_str(&contents)
}
