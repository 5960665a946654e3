//! User-visible notifications

use colored::Colorize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    /// Coloured single-line rendering for a terminal
    pub fn render(&self) -> String {
        match self.level {
            Level::Error => format!("{} {}", "error:".red().bold(), self.message),
            Level::Warning => format!("{} {}", "warning:".yellow().bold(), self.message),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            Level::Error => "error",
            Level::Warning => "warning",
        };
        write!(f, "{label}: {}", self.message)
    }
}
