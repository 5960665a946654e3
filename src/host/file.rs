//! Filesystem-backed host
//!
//! Reads and writes the editor's `settings.json` for the configured scope and
//! looks up setting registrations in the installed-extensions directory.

use serde_json::Value;
use std::path::{Path, PathBuf};

use super::Host;
use crate::companion::ExtensionRegistry;
use crate::config::ExtensionConfig;
use crate::error::SettingsError;
use crate::notify::Notification;
use crate::settings::SettingsFile;

#[derive(Debug)]
pub struct FileHost {
    workspace: Option<PathBuf>,
    settings: Option<SettingsFile>,
    extensions: Option<ExtensionRegistry>,
    notifications: Vec<Notification>,
    echo: bool,
}

impl FileHost {
    pub fn new(
        workspace: Option<PathBuf>,
        settings_path: Option<PathBuf>,
        extensions_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            workspace,
            settings: settings_path.map(SettingsFile::new),
            extensions: extensions_dir.map(ExtensionRegistry::new),
            notifications: Vec::new(),
            echo: false,
        }
    }

    /// Host for the first of `workspaces`, with paths resolved from `config`
    pub fn from_config(workspaces: &[PathBuf], config: &ExtensionConfig) -> Self {
        let workspace = workspaces.first().cloned();
        if workspaces.len() > 1 {
            tracing::debug!(
                ignored = workspaces.len() - 1,
                "multiple workspaces given, only the first is considered"
            );
        }

        let settings_path = config.settings_path(workspace.as_deref());
        let extensions_dir = config.extensions_dir();
        Self::new(workspace, settings_path, extensions_dir)
    }

    /// Print notifications to stderr as they are raised
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings.as_ref().map(|s| s.path())
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }
}

impl Host for FileHost {
    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace.clone()
    }

    fn read_config(&self, key: &str) -> Option<Value> {
        self.settings.as_ref().and_then(|s| s.get(key))
    }

    fn has_setting(&self, key: &str) -> bool {
        if self.read_config(key).is_some() {
            return true;
        }

        match self
            .extensions
            .as_ref()
            .and_then(|registry| registry.find_contributor(key))
        {
            Some(package) => {
                tracing::debug!(key, extension = %package.id(), "setting registered");
                true
            }
            None => false,
        }
    }

    fn write_config(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let settings = self.settings.as_ref().ok_or(SettingsError::NoScope)?;
        settings.set(key, value)
    }

    fn notify(&mut self, notification: Notification) {
        if self.echo {
            eprintln!("{}", notification.render());
        }
        self.notifications.push(notification);
    }
}
