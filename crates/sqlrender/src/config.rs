//! File-based renderer configuration.
//!
//! Applications that keep their SQL templates on disk usually want the
//! dialect and search paths in a config file rather than in code:
//!
//! ```yaml
//! default_dialect: postgres
//! search_paths:
//!   - ./sql
//!   - /usr/share/app/sql
//! ```
//!
//! ```rust
//! use sqlrender::{Dialect, RendererConfig};
//!
//! let config = RendererConfig::from_yaml("default_dialect: sqlserver\nsearch_paths: [sql]").unwrap();
//! let renderer = config.build();
//! assert_eq!(renderer.default_dialect(), Dialect::SqlServer);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::template::Renderer;

/// Errors raised while loading a [`RendererConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format for {} (expected .yaml, .yml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Serializable renderer settings. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    pub default_dialect: Dialect,
    pub search_paths: Vec<PathBuf>,
}

impl RendererConfig {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Loads a config file, choosing the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let parse: fn(&str) -> Result<Self, ConfigError> = match format.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml,
            Some("json") => Self::from_json,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&content)
    }

    /// Builds a [`Renderer`] with these settings.
    pub fn build(&self) -> Renderer {
        Renderer::from_config(self)
    }
}
