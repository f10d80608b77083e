//! Platform-specific paths for pipeline files.
//!
//! # Directory Structure
//!
//! - **User pipelines**: `~/.config/lumen/pipelines/` (Linux),
//!   `~/Library/Application Support/lumen/pipelines/` (macOS),
//!   `%APPDATA%\lumen\pipelines\` (Windows)
//! - **User config**: the parent `lumen` directory of the above
//!
//! # Example
//!
//! ```rust,no_run
//! use lumen_config::paths;
//!
//! // Resolve a file path, user pipeline or factory pipeline by name
//! let pipeline = paths::load_pipeline("negative_edges").unwrap();
//! println!("{} nodes", pipeline.len());
//! ```

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::factory_pipelines::get_factory_pipeline;
use crate::pipeline::Pipeline;

/// Application name used for directory paths.
const APP_NAME: &str = "lumen";

/// Subdirectory name for pipelines.
const PIPELINES_SUBDIR: &str = "pipelines";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific pipelines directory.
pub fn user_pipelines_dir() -> PathBuf {
    user_config_dir().join(PIPELINES_SUBDIR)
}

/// Find a pipeline file by name.
///
/// Searches in the following order:
/// 1. `name` as a path to an existing file
/// 2. The user pipelines directory (`.toml` appended if missing)
pub fn find_pipeline(name: &str) -> Option<PathBuf> {
    find_pipeline_in(name, &user_pipelines_dir())
}

fn find_pipeline_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let user_path = dir.join(filename);
    user_path.is_file().then_some(user_path)
}

/// Load a pipeline by file path, user pipeline name or factory pipeline name.
///
/// Files take precedence over factory pipelines of the same name.
pub fn load_pipeline(name: &str) -> Result<Pipeline, ConfigError> {
    load_pipeline_in(name, &user_pipelines_dir())
}

fn load_pipeline_in(name: &str, dir: &Path) -> Result<Pipeline, ConfigError> {
    if let Some(path) = find_pipeline_in(name, dir) {
        tracing::debug!(path = %path.display(), "pipeline_file");
        return Pipeline::load(path);
    }
    get_factory_pipeline(name).ok_or_else(|| ConfigError::PipelineNotFound(name.to_string()))
}

/// Ensure the user pipelines directory exists.
///
/// Creates the directory and any parent directories if they don't exist.
pub fn ensure_user_pipelines_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_pipelines_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// List all pipeline files in the user pipelines directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_pipelines() -> Vec<PathBuf> {
    list_pipelines_in_dir(&user_pipelines_dir())
}

fn list_pipelines_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    paths
}

/// Get the pipeline name from a file path (the file stem).
///
/// # Example
///
/// ```rust
/// use lumen_config::paths::pipeline_name_from_path;
/// use std::path::Path;
///
/// let name = pipeline_name_from_path(Path::new("/path/to/edges.toml"));
/// assert_eq!(name, Some("edges".to_string()));
/// ```
pub fn pipeline_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(ToString::to_string)
}
