//! Executable availability probing

use std::ffi::OsString;
use std::path::PathBuf;

/// Answers whether a named executable can be launched
pub trait ToolProbe {
    fn is_available(&self, name: &str) -> bool;
}

/// Resolves executables on a search path using `which`
///
/// Without an explicit search path the process `PATH` is used.
#[derive(Debug, Clone, Default)]
pub struct PathProbe {
    search_path: Option<OsString>,
}

impl PathProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    /// Full path of the executable, if it resolves
    pub fn locate(&self, name: &str) -> Result<PathBuf, which::Error> {
        match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(name, Some(paths), cwd)
            }
            None => which::which(name),
        }
    }
}

impl ToolProbe for PathProbe {
    fn is_available(&self, name: &str) -> bool {
        match self.locate(name) {
            Ok(path) => {
                tracing::debug!(tool = name, path = %path.display(), "tool resolved");
                true
            }
            Err(e) => {
                tracing::debug!(tool = name, error = %e, "tool not resolvable");
                false
            }
        }
    }
}
