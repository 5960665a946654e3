pub mod activation;
pub mod classify;
pub mod companion;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod manifest;
pub mod notify;
pub mod probe;
pub mod settings;

pub use activation::{activate, check, deactivate, ActivationReport, CheckReport, Outcome, State};
pub use config::ExtensionConfig;
pub use host::{FileHost, Host};
pub use probe::{PathProbe, ToolProbe};
