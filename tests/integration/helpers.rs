//! Shared fixtures for activation integration tests

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use scout_extension::config::{ExtensionConfig, DEFAULT_CONFIG_KEY};
use scout_extension::{FileHost, PathProbe};

pub const INK_MANIFEST: &str = "[package]\nname = \"flipper\"\nversion = \"0.1.0\"\n\n[dependencies]\nink = \"4.0\"\n";
pub const SERDE_MANIFEST: &str = "[package]\nname = \"plain\"\nversion = \"0.1.0\"\n\n[dependencies]\nserde = \"1.0\"\n";

/// A sandbox holding a workspace, a bin directory, and an extensions directory
pub struct Sandbox {
    pub root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(root.path().join("workspace")).expect("Failed to create workspace");
        fs::create_dir_all(root.path().join("bin")).expect("Failed to create bin");
        fs::create_dir_all(root.path().join("extensions")).expect("Failed to create extensions");
        Self { root }
    }

    pub fn workspace(&self) -> PathBuf {
        self.root.path().join("workspace")
    }

    pub fn bin(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn extensions(&self) -> PathBuf {
        self.root.path().join("extensions")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.workspace().join(".vscode/settings.json")
    }

    pub fn write_manifest(&self, content: &str) {
        fs::write(self.workspace().join("Cargo.toml"), content).expect("Failed to write manifest");
    }

    /// Place an executable shell script named `name` in the bin directory
    pub fn install_tool(&self, name: &str) {
        let path = self.bin().join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").expect("Failed to write tool");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("Failed to chmod tool");
        }
    }

    /// Install a fake rust-analyzer that registers the override setting
    pub fn install_rust_analyzer(&self) {
        let dir = self.extensions().join("rust-lang.rust-analyzer-0.3.2000-linux-x64");
        fs::create_dir_all(&dir).expect("Failed to create extension dir");
        let manifest = json!({
            "name": "rust-analyzer",
            "publisher": "rust-lang",
            "contributes": {
                "configuration": [
                    { "title": "check", "properties": { DEFAULT_CONFIG_KEY: { "type": ["null", "array"] } } }
                ]
            }
        });
        fs::write(dir.join("package.json"), manifest.to_string())
            .expect("Failed to write extension manifest");
    }

    pub fn write_settings(&self, settings: &Value) {
        let path = self.settings_path();
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create .vscode");
        fs::write(&path, serde_json::to_string_pretty(settings).unwrap())
            .expect("Failed to write settings");
    }

    pub fn read_settings(&self) -> Option<Value> {
        read_json(&self.settings_path())
    }

    pub fn config(&self) -> ExtensionConfig {
        ExtensionConfig {
            extensions_dir: Some(self.extensions().to_string_lossy().into_owned()),
            ..Default::default()
        }
    }

    pub fn host(&self, config: &ExtensionConfig) -> FileHost {
        FileHost::from_config(&[self.workspace()], config)
    }

    pub fn probe(&self) -> PathProbe {
        PathProbe::with_search_path(self.bin())
    }
}

pub fn read_json(path: &Path) -> Option<Value> {
    let content = fs::read_to_string(path).ok()?;
    Some(serde_json::from_str(&content).expect("settings should be valid JSON"))
}
