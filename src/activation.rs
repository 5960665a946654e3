//! Activation flow
//!
//! Runs once per activation as a straight sequence of gates:
//!
//! ```text
//! Start -> CheckWorkspace -> CheckManifest -> CheckCompanion
//!       -> CheckToolAvailable -> UpdateConfig -> Done
//! ```
//!
//! Any failed gate jumps to `Done`. Only a missing analyzer and a failed
//! settings write end with an error notification; a missing companion
//! setting raises a warning and lets the flow continue. Nothing is returned
//! as an error: every outcome is reported through [`ActivationReport`].

use serde_json::Value;
use std::fmt;

use crate::classify::{classify_workspace, Eligibility, NotEligibleReason};
use crate::config::ExtensionConfig;
use crate::error::SettingsError;
use crate::host::Host;
use crate::notify::Notification;
use crate::probe::ToolProbe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    CheckWorkspace,
    CheckManifest,
    CheckCompanion,
    CheckToolAvailable,
    UpdateConfig,
    Done,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Start => "start",
            State::CheckWorkspace => "check-workspace",
            State::CheckManifest => "check-manifest",
            State::CheckCompanion => "check-companion",
            State::CheckToolAvailable => "check-tool",
            State::UpdateConfig => "update-config",
            State::Done => "done",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NoWorkspace,
    NotEligible(NotEligibleReason),
    ToolMissing { tool: String },
    Configured { key: String, value: Value },
    WriteFailed { reason: String },
}

impl Outcome {
    pub fn is_configured(&self) -> bool {
        matches!(self, Outcome::Configured { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoWorkspace => write!(f, "no workspace open, nothing to do"),
            Outcome::NotEligible(reason) => write!(f, "not a target project ({reason})"),
            Outcome::ToolMissing { tool } => write!(f, "{tool} is not installed"),
            Outcome::Configured { key, value } => write!(f, "set {key} to {value}"),
            Outcome::WriteFailed { reason } => write!(f, "failed to update settings: {reason}"),
        }
    }
}

/// Everything an activation did
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationReport {
    pub outcome: Outcome,
    /// States visited, in order, ending with `Done`
    pub trace: Vec<State>,
    /// Whether the companion setting was found registered; `None` if the
    /// check was never reached
    pub companion_registered: Option<bool>,
    /// Value of the entry before the update, if one was attempted
    pub previous: Option<Value>,
}

/// Messages shown to the user
pub fn companion_missing_message(config_key: &str) -> String {
    format!("rust-analyzer must be installed in order for scout to work ({config_key} is not a registered setting)")
}

pub fn tool_missing_message(tool: &str) -> String {
    format!("{tool} must be installed in order for scout to work")
}

/// Settings files that are not plain JSON are never rewritten, so the
/// message says how to get unstuck.
pub fn write_failed_message(config_key: &str, error: &SettingsError) -> String {
    let hint = match error {
        SettingsError::Malformed { .. } => format!(
            "; remove comments and trailing commas from the settings file or set {config_key} manually"
        ),
        SettingsError::NotAnObject { .. } => format!("; set {config_key} manually"),
        _ => String::new(),
    };
    format!("scout could not update {config_key}: {error}{hint}")
}

struct Machine {
    trace: Vec<State>,
}

impl Machine {
    fn new() -> Self {
        Self {
            trace: vec![State::Start],
        }
    }

    fn enter(&mut self, state: State) {
        if let Some(from) = self.trace.last() {
            tracing::debug!(from = %from, to = %state, "activation transition");
        }
        self.trace.push(state);
    }
}

fn finish(
    mut machine: Machine,
    outcome: Outcome,
    companion_registered: Option<bool>,
    previous: Option<Value>,
) -> ActivationReport {
    machine.enter(State::Done);
    tracing::info!(outcome = %outcome, "activation finished");
    ActivationReport {
        outcome,
        trace: machine.trace,
        companion_registered,
        previous,
    }
}

/// Run the activation flow against `host`
pub fn activate<H, P>(host: &mut H, probe: &P, config: &ExtensionConfig) -> ActivationReport
where
    H: Host + ?Sized,
    P: ToolProbe + ?Sized,
{
    let mut machine = Machine::new();
    let mut companion_registered = None;

    // Gate: a workspace folder is open
    machine.enter(State::CheckWorkspace);
    let Some(root) = host.workspace_root() else {
        return finish(machine, Outcome::NoWorkspace, companion_registered, None);
    };

    // Gate: direct dependency on a target package
    machine.enter(State::CheckManifest);
    let package = match classify_workspace(Some(&root), &config.packages) {
        Eligibility::Eligible { package } => package,
        Eligibility::NotEligible(reason) => {
            tracing::info!(workspace = %root.display(), %reason, "workspace is not a target project");
            return finish(
                machine,
                Outcome::NotEligible(reason),
                companion_registered,
                None,
            );
        }
    };
    tracing::debug!(workspace = %root.display(), package = %package, "target project detected");

    // Companion check only warns
    machine.enter(State::CheckCompanion);
    let registered = host.has_setting(&config.config_key);
    companion_registered = Some(registered);
    if !registered {
        tracing::warn!(key = %config.config_key, "companion setting is not registered");
        host.notify(Notification::warning(companion_missing_message(
            &config.config_key,
        )));
    }

    // Gate: analyzer resolves on PATH
    machine.enter(State::CheckToolAvailable);
    let tool = config.tool();
    if !probe.is_available(tool) {
        host.notify(Notification::error(tool_missing_message(tool)));
        return finish(
            machine,
            Outcome::ToolMissing {
                tool: tool.to_string(),
            },
            companion_registered,
            None,
        );
    }

    // Replace the whole override command, whatever was there
    machine.enter(State::UpdateConfig);
    let previous = host.read_config(&config.config_key);
    let value = Value::from(config.command());
    tracing::debug!(key = %config.config_key, ?previous, new = %value, "updating configuration");

    let outcome = match host.write_config(&config.config_key, value.clone()) {
        Ok(()) => Outcome::Configured {
            key: config.config_key.clone(),
            value,
        },
        Err(e) => {
            tracing::error!(key = %config.config_key, error = %e, "failed to write configuration");
            host.notify(Notification::error(write_failed_message(
                &config.config_key,
                &e,
            )));
            Outcome::WriteFailed {
                reason: e.to_string(),
            }
        }
    };

    finish(machine, outcome, companion_registered, previous)
}

/// Result of evaluating the gates without touching configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub eligibility: Eligibility,
    pub companion_registered: Option<bool>,
    pub tool_available: Option<bool>,
    pub current: Option<Value>,
    /// Value activation would write, when every gate passes
    pub pending: Option<Value>,
}

/// Evaluate every gate activation would, without notifying or writing
pub fn check<H, P>(host: &H, probe: &P, config: &ExtensionConfig) -> CheckReport
where
    H: Host + ?Sized,
    P: ToolProbe + ?Sized,
{
    let workspace = host.workspace_root();
    let eligibility = classify_workspace(workspace.as_deref(), &config.packages);
    if !eligibility.is_eligible() {
        return CheckReport {
            eligibility,
            companion_registered: None,
            tool_available: None,
            current: None,
            pending: None,
        };
    }

    let tool_available = probe.is_available(config.tool());
    CheckReport {
        eligibility,
        companion_registered: Some(host.has_setting(&config.config_key)),
        tool_available: Some(tool_available),
        current: host.read_config(&config.config_key),
        pending: tool_available.then(|| Value::from(config.command())),
    }
}

/// Nothing is held between activations
pub fn deactivate() {
    tracing::debug!("deactivated");
}
