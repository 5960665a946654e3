//! Editor `settings.json` access
//!
//! VS Code keeps settings as a flat JSON object keyed by dotted names, e.g.
//! `"rust-analyzer.check.overrideCommand": ["cargo", "check"]`. Writes replace
//! a single key and leave every other key as it was.
//!
//! Files that are not strict JSON (VS Code tolerates comments and trailing
//! commas) are never rewritten, since serializing them back would drop
//! whatever the parser could not represent.

use fs2::FileExt;
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current top-level object; a missing or empty file reads as `{}`
    pub fn load(&self) -> Result<Map<String, Value>, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(SettingsError::io(&self.path, e)),
        };
        parse_settings(&self.path, &content)
    }

    /// Value stored under `key`, if any
    ///
    /// Unreadable files are reported as having no value.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.load() {
            Ok(mut settings) => settings.remove(key),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "settings unreadable");
                None
            }
        }
    }

    /// Replace `key` with `value` under an exclusive lock
    ///
    /// The lock is held on a sibling `<name>.lock` file so that the settings
    /// file itself can be replaced. The sequence is lock, read, merge, write a
    /// sibling temp file, rename it over the original. A failed write leaves
    /// the original untouched, as does content that cannot be parsed.
    pub fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
            }
        }

        // Acquire exclusive lock
        let lock_path = self.sibling("lock");
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| SettingsError::io(&lock_path, e))?;
        lock.lock_exclusive()
            .map_err(|e| SettingsError::io(&lock_path, e))?;

        // Merge the single key into whatever is on disk now
        let mut settings = self.load()?;
        settings.insert(key.to_string(), value);

        let mut new_content = serde_json::to_string_pretty(&Value::Object(settings))?;
        new_content.push('\n');

        // Write to a sibling file and swap it in
        let tmp_path = self.sibling("tmp");
        if let Err(e) = write_synced(&tmp_path, new_content.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(SettingsError::io(&tmp_path, e));
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(SettingsError::io(&self.path, e));
        }

        // Lock is released when the lock file is dropped
        Ok(())
    }

    /// `<dir>/<file name>.<suffix>`, next to the settings file
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.flush()?;
    file.sync_all()
}

fn parse_settings(path: &Path, content: &str) -> Result<Map<String, Value>, SettingsError> {
    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    let value: Value = serde_json::from_str(content).map_err(|e| SettingsError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SettingsError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}
