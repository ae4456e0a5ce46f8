//! Error types for SQL template rendering.
//!
//! [`RenderError`] separates three kinds of failure so callers can react
//! differently:
//!
//! - template bugs ([`RenderError::InvalidIdentifier`]), which should be fixed
//!   in the template and never retried;
//! - template problems reported by the engine (syntax or execution);
//! - template source problems (not found, unreadable) and configuration errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::binder::InvalidIdentifier;
use crate::config::ConfigError;

/// Error type for all rendering operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template source failed to parse.
    #[error("template syntax error: {0}")]
    Syntax(#[source] minijinja::Error),

    /// Expansion failed: a function returned an error or data was incompatible.
    #[error("template execution error: {0}")]
    Execution(#[source] minijinja::Error),

    /// `identifier` was called with text outside `[A-Za-z0-9._]`. The render
    /// is aborted and nothing is returned.
    #[error("template bug: {0}")]
    InvalidIdentifier(#[from] InvalidIdentifier),

    /// No file matched the template name directly or under any search path.
    #[error("template {name:?} not found in search paths: {}", SearchPaths(search_paths))]
    TemplateNotFound {
        name: String,
        search_paths: Vec<PathBuf>,
    },

    /// The resolved template file could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Renderer configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RenderError {
    /// True for failures caused by the template itself rather than by data,
    /// I/O or configuration.
    pub fn is_template_bug(&self) -> bool {
        matches!(self, RenderError::InvalidIdentifier(_))
    }

    /// Classifies an error raised while expanding a template.
    ///
    /// `identifier` aborts the engine with an [`InvalidIdentifier`] attached as
    /// the error source; that case is lifted into its own variant.
    pub(crate) fn from_execution(err: minijinja::Error) -> Self {
        let mut cause = std::error::Error::source(&err);
        while let Some(current) = cause {
            if let Some(invalid) = current.downcast_ref::<InvalidIdentifier>() {
                return RenderError::InvalidIdentifier(invalid.clone());
            }
            cause = current.source();
        }
        RenderError::Execution(err)
    }
}

struct SearchPaths<'a>(&'a [PathBuf]);

impl fmt::Display for SearchPaths<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        f.write_str("]")
    }
}
