use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub data: Option<String>,
    pub output: Option<String>,
    pub title: Option<String>,
    pub src_dir: Option<String>,
    pub dist_dir: Option<String>,
    pub css_bundle: Option<String>,
    pub timeout: Option<u64>,
    #[serde(alias = "malformed_entries")]
    pub malformed: Option<String>,
    pub hidden_columns: Option<Vec<String>>,
    pub watch_interval_ms: Option<u64>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found '{path}'")]
    NotFound { path: String },

    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write config '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config path '{path}'")]
    InvalidPath { path: String },
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".rowdeck").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, ConfigError> {
    let display = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents).map_err(|source| {
            ConfigError::Parse {
                path: display,
                source,
            }
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::NotFound { path: display })
        }
        Err(source) => Err(ConfigError::Read {
            path: display,
            source,
        }),
    }
}

fn default_config_yaml() -> &'static str {
    r#"# rowdeck config
#
# Location (default):
#   ~/.rowdeck/config.yml

# Dataset: a local JSON file or an http(s) URL
data: ./dist/db/data.json

# Rendered page (stdout when unset)
# output: ./table.html
# title: Records

# Seconds before a remote fetch is abandoned (0 disables)
timeout: 30

# Entries that do not match the record shape: reject | skip | default
malformed: reject

# Columns hidden on start-up: name, surname, about, eyeColor
hidden_columns: []

# Asset build
src_dir: ./site
dist_dir: ./dist
css_bundle: index.css
watch_interval_ms: 500

no_color: false
"#
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path.parent().ok_or_else(|| ConfigError::InvalidPath {
        path: path.display().to_string(),
    })?;
    let write_err = |source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;
    std::fs::write(path, default_config_yaml()).map_err(write_err)?;
    Ok(true)
}
