//! Platform-specific paths for client configuration and synth definitions.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/scsynth/` (Linux), `~/Library/Application Support/scsynth/` (macOS), `%APPDATA%\scsynth\` (Windows)
//! - **User synth definitions**: `~/.local/share/scsynth/synthdefs/` (Linux), `~/Library/Application Support/scsynth/synthdefs/` (macOS), `%APPDATA%\scsynth\synthdefs\` (Windows)
//!
//! # Example
//!
//! ```rust,no_run
//! use scsynth_config::paths;
//!
//! if let Some(path) = paths::find_synthdef("pad", None) {
//!     println!("Found synth definition at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

use scsynth_synthdef::FILE_EXTENSION;

use crate::error::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "scsynth";

/// Subdirectory name for synth definitions.
const SYNTHDEFS_SUBDIR: &str = "synthdefs";

/// Client configuration file name.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform has none.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the user's client configuration file.
pub fn config_file_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Returns the user-specific synth definition directory.
///
/// # Platform Paths
///
/// - Linux: `~/.local/share/scsynth/synthdefs/`
/// - macOS: `~/Library/Application Support/scsynth/synthdefs/`
/// - Windows: `%APPDATA%\scsynth\synthdefs\`
pub fn user_synthdefs_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(SYNTHDEFS_SUBDIR)
}

/// Find a synth definition file by name.
///
/// Searches in order:
/// 1. `name` itself, if it is an existing file
/// 2. `configured_dir`, if given
/// 3. the user synth definition directory
///
/// The `.scsyndef` extension is optional.
pub fn find_synthdef(name: &str, configured_dir: Option<&Path>) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if path.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}.{FILE_EXTENSION}")
    };

    configured_dir
        .into_iter()
        .map(Path::to_path_buf)
        .chain(std::iter::once(user_synthdefs_dir()))
        .map(|dir| dir.join(&filename))
        .find(|candidate| candidate.is_file())
}

/// Ensure the user synth definition directory exists.
pub fn ensure_user_synthdefs_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_synthdefs_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Ensure the user config directory exists.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// List `.scsyndef` files in `dir`, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_synthdefs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_synthdef_file(path))
        .collect();
    files.sort();
    files
}

pub(crate) fn is_synthdef_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == FILE_EXTENSION)
}

/// Get the synth definition name from a file path.
///
/// ```rust
/// use scsynth_config::paths::synthdef_name_from_path;
/// use std::path::Path;
///
/// let name = synthdef_name_from_path(Path::new("/defs/pad.scsyndef"));
/// assert_eq!(name, Some("pad".to_string()));
/// ```
pub fn synthdef_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
