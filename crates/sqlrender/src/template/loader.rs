//! Template source resolution across search paths.
//!
//! A template referenced by name is resolved in this order:
//!
//! 1. The name itself, treated as a path (absolute or relative to the current
//!    directory).
//! 2. The name joined onto each search path, in the order the paths were added.
//!
//! The first candidate that exists wins. No file extensions are inferred:
//! `"users/by_id.sql"` must be spelled out in full.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::RenderError;

/// Finds the file for template `name`.
///
/// # Errors
///
/// Returns [`RenderError::TemplateNotFound`] listing `name` and every search
/// path when no candidate exists.
pub fn find_template(name: &str, search_paths: &[PathBuf]) -> Result<PathBuf, RenderError> {
    let direct = Path::new(name);
    if direct.exists() {
        debug!(template = name, path = %direct.display(), "resolved template directly");
        return Ok(direct.to_path_buf());
    }

    for dir in search_paths {
        let candidate = dir.join(name);
        trace!(template = name, candidate = %candidate.display(), "probing search path");
        if candidate.exists() {
            debug!(template = name, path = %candidate.display(), "resolved template in search path");
            return Ok(candidate);
        }
    }

    Err(RenderError::TemplateNotFound {
        name: name.to_string(),
        search_paths: search_paths.to_vec(),
    })
}

/// Reads the full contents of a resolved template file.
///
/// # Errors
///
/// Returns [`RenderError::TemplateRead`] with the path and the I/O cause, for
/// example when `path` is a directory.
pub fn read_template(path: &Path) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| RenderError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves and reads template `name` in one step.
pub fn load_template(name: &str, search_paths: &[PathBuf]) -> Result<(PathBuf, String), RenderError> {
    let path = find_template(name, search_paths)?;
    let content = read_template(&path)?;
    Ok((path, content))
}
