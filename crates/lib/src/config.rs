use std::num::NonZeroUsize;

use camino::Utf8Path;
use serde::Deserialize;

pub const FILE_NAME: &str = "folio.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageSizes {
    pub blog: NonZeroUsize,
    pub projects: NonZeroUsize,
    pub work: NonZeroUsize,
}

impl Default for PageSizes {
    fn default() -> Self {
        PageSizes {
            blog: NonZeroUsize::MIN.saturating_add(4),
            projects: NonZeroUsize::MIN.saturating_add(3),
            work: NonZeroUsize::MIN.saturating_add(4),
        }
    }
}

/// How many of the newest entries the landing page shows per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewSizes {
    pub blog: usize,
    pub projects: usize,
    pub work: usize,
}

impl Default for PreviewSizes {
    fn default() -> Self {
        PreviewSizes {
            blog: 3,
            projects: 4,
            work: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub page_sizes: PageSizes,
    pub preview_sizes: PreviewSizes,
}

impl Config {
    pub fn from_yaml(yaml: &str, path: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
            path: path.to_owned(),
            source,
        })
    }

    /// Reads `folio.yaml` from `dir`; a missing file means the defaults.
    pub fn load(dir: &Utf8Path) -> Result<Self, ConfigError> {
        let path = dir.join(FILE_NAME);
        let yaml = match std::fs::read_to_string(&path) {
            Ok(yaml) => yaml,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_string(),
                    source,
                })
            }
        };
        Self::from_yaml(&yaml, path.as_str())
    }
}
