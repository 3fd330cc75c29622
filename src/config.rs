use std::error::Error;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::logging::LogConfig;
use crate::sync::technitium::config::TechnitiumConfig;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub directory: TechnitiumConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    const CONFIG_FILE_LOCAL: &'static str = concat!("./", env!("CARGO_PKG_NAME"), ".cfg");

    /// Reads `path`, or the local config file if present, or falls back to
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => Self::load_from_file(path),
            None if Path::new(Self::CONFIG_FILE_LOCAL).exists() => Self::load_from_file(Path::new(Self::CONFIG_FILE_LOCAL)),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;

        Ok(serde_yaml_ng::from_reader::<File, Config>(file)?)
    }
}
