//! Dashboard error taxonomy.
//!
//! Every variant is recovered at the call site: the dashboard turns it into
//! exactly one activity-log entry (see [`DashError::log_kind`]) and, for
//! user-initiated actions, one transient notification. None of them are
//! allowed to end the session.

use thiserror::Error;

use crate::activity::LogKind;

/// Recoverable failures raised by the log store, dispatcher and monitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashError {
    /// Target URL missing or not starting with `http://` / `https://`.
    #[error("Please enter a valid URL starting with http:// or https://")]
    InvalidUrl { url: String },

    /// Tool key is not part of the static tool table.
    #[error("Unknown tool type: {key}")]
    UnknownTool { key: String },

    /// Direct transport used before the backend reported `online`.
    #[error("Cannot start tool - Backend not connected")]
    NotConnected,

    /// Proxy transport has no capability registered for the tool.
    #[error("{tool} not available in proxy mode")]
    CapabilityUnavailable { tool: String },

    /// Export requested on an empty activity log.
    #[error("No logs to export")]
    EmptyLog,

    /// Network, HTTP or response parsing failure.
    #[error("{context}: {detail}")]
    Transport { context: String, detail: String },
}

impl DashError {
    /// Build a transport error from any displayable cause.
    pub fn transport(context: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Transport {
            context: context.into(),
            detail: detail.to_string(),
        }
    }

    /// Severity of the activity-log entry this error produces.
    pub fn log_kind(&self) -> LogKind {
        match self {
            Self::CapabilityUnavailable { .. } | Self::EmptyLog => LogKind::Warning,
            _ => LogKind::Error,
        }
    }

    /// Short text for the on-screen notification.
    pub fn notice(&self) -> String {
        match self {
            Self::InvalidUrl { .. } => "Invalid URL format".to_string(),
            Self::UnknownTool { key } => format!("Unknown tool: {key}"),
            Self::NotConnected => "Backend server not connected".to_string(),
            Self::CapabilityUnavailable { tool } => format!("{tool} not available in demo mode"),
            Self::EmptyLog => "No logs to export".to_string(),
            Self::Transport { .. } => "Connection to backend failed".to_string(),
        }
    }
}
