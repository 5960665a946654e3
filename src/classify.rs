//! Project eligibility
//!
//! A workspace is a target project only when its own manifest lists one of the
//! configured framework packages under `[dependencies]`. This gates the
//! settings change; it is not an access check.

use std::fmt;
use std::path::Path;

use crate::manifest::{read_manifest, ManifestQuery};

/// Why a workspace was not considered a target project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotEligibleReason {
    NoWorkspace,
    ManifestAbsent,
    ManifestMalformed(String),
    NoDependenciesTable,
    MissingDependency,
}

impl fmt::Display for NotEligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotEligibleReason::NoWorkspace => write!(f, "no workspace open"),
            NotEligibleReason::ManifestAbsent => write!(f, "no Cargo.toml in workspace"),
            NotEligibleReason::ManifestMalformed(reason) => {
                write!(f, "Cargo.toml could not be parsed: {reason}")
            }
            NotEligibleReason::NoDependenciesTable => {
                write!(f, "Cargo.toml has no [dependencies] table")
            }
            NotEligibleReason::MissingDependency => {
                write!(f, "no target framework in [dependencies]")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// The first configured package found among direct dependencies
    Eligible { package: String },
    NotEligible(NotEligibleReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible { .. })
    }
}

/// Decide eligibility from an already-run manifest query
pub fn classify_manifest(query: &ManifestQuery, packages: &[String]) -> Eligibility {
    let manifest = match query {
        ManifestQuery::Absent => return Eligibility::NotEligible(NotEligibleReason::ManifestAbsent),
        ManifestQuery::Malformed(reason) => {
            return Eligibility::NotEligible(NotEligibleReason::ManifestMalformed(reason.clone()))
        }
        ManifestQuery::Parsed(manifest) => manifest,
    };

    if manifest.dependencies().is_none() {
        return Eligibility::NotEligible(NotEligibleReason::NoDependenciesTable);
    }

    packages
        .iter()
        .find(|package| manifest.has_direct_dependency(package))
        .map(|package| Eligibility::Eligible {
            package: package.clone(),
        })
        .unwrap_or(Eligibility::NotEligible(NotEligibleReason::MissingDependency))
}

/// Classify a workspace, touching the filesystem only when one is open
pub fn classify_workspace(workspace: Option<&Path>, packages: &[String]) -> Eligibility {
    let Some(root) = workspace else {
        return Eligibility::NotEligible(NotEligibleReason::NoWorkspace);
    };

    classify_manifest(&read_manifest(root), packages)
}
