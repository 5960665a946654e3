//! Extension configuration
//!
//! Every value the activation flow treats as a constant (target packages,
//! analyzer executable, override command, settings key and scope) lives here
//! so it can be confirmed against the installed analyzer without code changes.
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! packages = ["ink"]
//! variant = "audit"
//! scope = "workspace"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::ConfigError;

/// rust-analyzer setting that replaces `cargo check` for diagnostics
pub const DEFAULT_CONFIG_KEY: &str = "rust-analyzer.check.overrideCommand";

/// Framework package whose direct dependency marks an eligible project
pub const DEFAULT_PACKAGE: &str = "ink";

/// Workspace-relative location of the optional config file
pub const WORKSPACE_CONFIG_FILE: &str = ".vscode/scout.toml";

/// Which release line of the analyzer CLI to invoke
///
/// The analyzer was renamed from `cargo-scout` to `cargo-scout-audit`; both
/// take the same trailing arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerVariant {
    #[default]
    Audit,
    Legacy,
}

impl AnalyzerVariant {
    /// Executable probed on PATH
    pub fn tool(self) -> &'static str {
        match self {
            AnalyzerVariant::Audit => "cargo-scout-audit",
            AnalyzerVariant::Legacy => "cargo-scout",
        }
    }

    /// Cargo subcommand the executable provides
    pub fn subcommand(self) -> &'static str {
        match self {
            AnalyzerVariant::Audit => "scout-audit",
            AnalyzerVariant::Legacy => "scout",
        }
    }

    pub fn command(self) -> Vec<String> {
        vec![
            "cargo".to_string(),
            self.subcommand().to_string(),
            "--".to_string(),
            "--message-format=json".to_string(),
        ]
    }
}

/// Settings scope the override is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// `<workspace>/.vscode/settings.json`
    #[default]
    Workspace,
    /// The editor's user-level `settings.json`
    User,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Direct dependencies that mark a workspace as eligible
    pub packages: Vec<String>,
    pub variant: AnalyzerVariant,
    /// Overrides the variant's executable name
    pub tool: Option<String>,
    /// Overrides the variant's command tokens
    pub command: Option<Vec<String>>,
    pub config_key: String,
    pub scope: Scope,
    /// Editor extensions directory; `~` and `$VAR` are expanded
    pub extensions_dir: Option<String>,
    /// Explicit settings file, bypassing `scope`
    pub settings_path: Option<String>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            packages: vec![DEFAULT_PACKAGE.to_string()],
            variant: AnalyzerVariant::default(),
            tool: None,
            command: None,
            config_key: DEFAULT_CONFIG_KEY.to_string(),
            scope: Scope::default(),
            extensions_dir: None,
            settings_path: None,
        }
    }
}

impl ExtensionConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        let config: ExtensionConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the config for an activation
    ///
    /// An explicit path must exist and be valid. Otherwise
    /// `<workspace>/.vscode/scout.toml` is used when present, falling back to
    /// defaults. A broken workspace file is logged and ignored so it cannot
    /// abort activation.
    pub fn discover(explicit: Option<&Path>, workspace: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(root) = workspace {
            let candidate = root.join(WORKSPACE_CONFIG_FILE);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "loading workspace config");
                match Self::load(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!(
                            path = %candidate.display(),
                            error = %format!("{e:#}"),
                            "ignoring invalid workspace config"
                        );
                    }
                }
            }
        }

        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.packages.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::NoPackages);
        }
        if self.config_key.trim().is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if matches!(&self.tool, Some(t) if t.trim().is_empty()) {
            return Err(ConfigError::EmptyTool);
        }
        if matches!(&self.command, Some(c) if c.is_empty()) {
            return Err(ConfigError::EmptyCommand);
        }
        Ok(())
    }

    /// Executable that must resolve on PATH
    pub fn tool(&self) -> &str {
        self.tool.as_deref().unwrap_or_else(|| self.variant.tool())
    }

    /// Token sequence written to the override key
    pub fn command(&self) -> Vec<String> {
        self.command
            .clone()
            .unwrap_or_else(|| self.variant.command())
    }

    pub fn extensions_dir(&self) -> Option<PathBuf> {
        match &self.extensions_dir {
            Some(dir) => Some(PathBuf::from(expand_path(dir))),
            None => dirs::home_dir().map(|home| home.join(".vscode").join("extensions")),
        }
    }

    /// Settings file for the configured scope
    pub fn settings_path(&self, workspace: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = &self.settings_path {
            return Some(PathBuf::from(expand_path(path)));
        }

        match self.scope {
            Scope::Workspace => workspace.map(|root| root.join(".vscode").join("settings.json")),
            Scope::User => {
                dirs::config_dir().map(|dir| dir.join("Code").join("User").join("settings.json"))
            }
        }
    }
}

/// Expand ~ to home directory in paths
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

static ENV_VAR_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("Invalid regex pattern")
});

/// Expand ${ENV_VAR} and $ENV_VAR patterns, keeping unknown variables as-is
pub fn expand_env_vars(s: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(s, |caps: &regex::Captures| {
            let name = caps.get(1).or_else(|| caps.get(2));
            name.and_then(|n| env::var(n.as_str()).ok())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

fn expand_path(path: &str) -> String {
    expand_env_vars(&expand_tilde(path))
}
