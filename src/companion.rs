//! Companion extension detection
//!
//! A setting is only meaningful when some installed extension registers it in
//! its `package.json` under `contributes.configuration`. That section is either
//! one object or an array of objects, each with a `properties` map keyed by the
//! dotted setting name.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionPackage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub contributes: Option<Contributes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contributes {
    #[serde(default)]
    pub configuration: Option<ConfigurationContribution>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConfigurationContribution {
    Many(Vec<ConfigurationSection>),
    Single(ConfigurationSection),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigurationSection {
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl ExtensionPackage {
    pub fn id(&self) -> String {
        format!("{}.{}", self.publisher, self.name)
    }

    pub fn contributes_setting(&self, key: &str) -> bool {
        let Some(configuration) = self
            .contributes
            .as_ref()
            .and_then(|c| c.configuration.as_ref())
        else {
            return false;
        };

        match configuration {
            ConfigurationContribution::Single(section) => section.properties.contains_key(key),
            ConfigurationContribution::Many(sections) => {
                sections.iter().any(|s| s.properties.contains_key(key))
            }
        }
    }
}

/// Installed editor extensions under a single directory
#[derive(Debug, Clone)]
pub struct ExtensionRegistry {
    dir: PathBuf,
}

impl ExtensionRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Manifests of every extension that has a readable `package.json`
    pub fn packages(&self) -> Vec<ExtensionPackage> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %self.dir.display(), error = %e, "extensions directory unreadable");
                return Vec::new();
            }
        };

        let mut packages = Vec::new();
        for entry in entries.flatten() {
            let manifest_path = entry.path().join("package.json");
            if !manifest_path.is_file() {
                continue;
            }
            match load_package(&manifest_path) {
                Some(package) => packages.push(package),
                None => {
                    tracing::debug!(path = %manifest_path.display(), "skipping unparsable extension manifest")
                }
            }
        }
        packages
    }

    /// First installed extension that registers `key`
    pub fn find_contributor(&self, key: &str) -> Option<ExtensionPackage> {
        self.packages()
            .into_iter()
            .find(|package| package.contributes_setting(key))
    }
}

fn load_package(path: &Path) -> Option<ExtensionPackage> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}
