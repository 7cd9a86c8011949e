use serde::{Deserialize, Serialize};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use crate::error::WikiError;

/// Server settings, optionally loaded from a `wiki.toml` file:
///
/// ```toml
/// [wiki]
/// dir = "/path/to/wiki"
/// port = 8812
/// watch = true
/// ```
///
/// CLI flags take precedence over file values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub watch: bool,
}

impl Default for WikiConfig {
    fn default() -> Self {
        WikiConfig {
            dir: default_dir(),
            port: default_port(),
            watch: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    wiki: WikiConfig,
}

impl WikiConfig {
    /// Read settings from `path`. A missing file is not an error; it yields
    /// `None` and callers fall back to defaults.
    pub fn load(path: &Path) -> Result<Option<WikiConfig>, WikiError> {
        tracing::debug!("Attempting to read config from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(None);
        }
        let content = read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&content)?;
        Ok(Some(file.wiki))
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_port() -> u16 {
    8812
}
