//! Editor host capabilities
//!
//! The activation flow reaches the editor only through [`Host`], so it can run
//! against real settings files or an in-memory double.

mod file;

pub use file::FileHost;

use serde_json::Value;
use std::path::PathBuf;

use crate::error::SettingsError;
use crate::notify::Notification;

pub trait Host {
    /// Root of the first open workspace
    fn workspace_root(&self) -> Option<PathBuf>;

    /// Current value of a configuration entry in the active scope
    fn read_config(&self, key: &str) -> Option<Value>;

    /// Whether `key` is a registered setting (contributed by an installed
    /// extension or already present in configuration)
    fn has_setting(&self, key: &str) -> bool;

    /// Replace a configuration entry in the active scope
    fn write_config(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;

    fn notify(&mut self, notification: Notification);
}
