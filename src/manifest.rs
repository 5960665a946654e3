//! Cargo manifest loading
//!
//! Reads `<workspace>/Cargo.toml` and reports one of three outcomes. Neither a
//! missing file nor a broken one is an error for the caller: both simply mean
//! the workspace cannot be classified.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Result of looking for a manifest under a workspace root
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestQuery {
    Absent,
    Malformed(String),
    Parsed(Manifest),
}

/// Parsed top-level table of a Cargo manifest
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    table: toml::Table,
}

impl Manifest {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(content)?;
        Ok(Self { table })
    }

    /// The `[dependencies]` table, if present and actually a table
    pub fn dependencies(&self) -> Option<&toml::Table> {
        self.table.get("dependencies").and_then(|d| d.as_table())
    }

    /// Whether `name` is declared directly under `[dependencies]`
    ///
    /// Dev, build, target-specific, and workspace dependency tables are not
    /// consulted, and no dependency graph is resolved.
    pub fn has_direct_dependency(&self, name: &str) -> bool {
        self.dependencies()
            .is_some_and(|deps| deps.contains_key(name))
    }
}

/// Read and parse `<root>/Cargo.toml`
pub fn read_manifest(root: &Path) -> ManifestQuery {
    let path = root.join(MANIFEST_FILE);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no manifest");
            return ManifestQuery::Absent;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read manifest");
            return ManifestQuery::Malformed(e.to_string());
        }
    };

    match Manifest::parse(&content) {
        Ok(manifest) => ManifestQuery::Parsed(manifest),
        Err(e) => {
            let reason = e.to_string();
            tracing::warn!(path = %path.display(), error = %reason, "manifest is not valid TOML");
            ManifestQuery::Malformed(reason)
        }
    }
}
