//! Best-effort diagnostics log (`~/.seodash/dashboard.log`).
//!
//! One `"<rfc3339> <message>"` line per event. Write failures are ignored:
//! diagnostics must never interrupt the dashboard.

use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    path: Option<PathBuf>,
}

impl Diagnostics {
    /// Diagnostics that write nowhere.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Diagnostics appended to `path`.
    pub fn to_file(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Default location under the data dir, if enabled.
    pub fn from_config(enabled: bool) -> Self {
        if !enabled {
            return Self::disabled();
        }
        Self {
            path: crate::config::data_dir().map(|dir| dir.join("dashboard.log")),
        }
    }

    pub fn record(&self, message: &str) {
        let Some(path) = &self.path else {
            return;
        };

        if let Some(parent) = path.parent()
            && create_dir_all(parent).is_err()
        {
            return;
        }

        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) else {
            return;
        };

        let line = message.replace(['\r', '\n'], " ");
        let _ = writeln!(file, "{} {}", Utc::now().to_rfc3339(), line);
    }
}
