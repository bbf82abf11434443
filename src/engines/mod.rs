//! Recognition engine implementations
//!
//! The engine binary is located once at startup. The resolved path is an
//! immutable value handed to the engine, nothing re-reads the environment
//! while serving requests.

pub mod tesseract;

use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Executable name searched for on `PATH`
pub const ENGINE_BINARY: &str = "tesseract";

#[cfg(windows)]
pub const DEFAULT_ENGINE_PATH: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";
#[cfg(not(windows))]
pub const DEFAULT_ENGINE_PATH: &str = "/usr/bin/tesseract";

/// Which rule produced the engine path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePathSource {
    SearchPath,
    Environment,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnginePath {
    pub path: PathBuf,
    pub source: EnginePathSource,
}

impl EnginePath {
    pub fn new(path: impl Into<PathBuf>, source: EnginePathSource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    /// Resolve against the process `PATH`.
    ///
    /// `configured` is the value of `TESSERACT_CMD` (or `--tesseract-cmd`).
    pub fn resolve(configured: Option<PathBuf>) -> Self {
        let search_path = std::env::var_os("PATH");
        Self::resolve_with(search_path.as_deref(), configured)
    }

    /// Priority: executable on the search path, then the configured path,
    /// then `DEFAULT_ENGINE_PATH`.
    pub fn resolve_with(search_path: Option<&OsStr>, configured: Option<PathBuf>) -> Self {
        if let Some(found) = search_path.and_then(find_on_path) {
            return Self::new(found, EnginePathSource::SearchPath);
        }

        match configured {
            Some(path) if !path.as_os_str().is_empty() => {
                Self::new(path, EnginePathSource::Environment)
            }
            _ => Self::new(DEFAULT_ENGINE_PATH, EnginePathSource::Default),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

fn find_on_path(search_path: &OsStr) -> Option<PathBuf> {
    let file_name = format!("{}{}", ENGINE_BINARY, std::env::consts::EXE_SUFFIX);
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(&file_name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
