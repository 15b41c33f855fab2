/// Configuration schema and defaults for the dashboard.
///
/// Sections: `[backend]`, `[proxy]`, `[log]`, `[monitor]`, `[dashboard]`.
/// Every field has a built-in default; config files only need the keys
/// they change.
use serde::{Deserialize, Serialize};

use crate::backend::TransportMode;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level dashboard configuration.
///
/// Maps directly to `~/.seodash/config.toml` and `.seodash.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub backend: BackendConfig,
    pub proxy: ProxyConfig,
    pub log: LogConfig,
    pub monitor: MonitorConfig,
    pub dashboard: DashboardConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where and how the automation backend is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Transport strategy, resolved once at startup: `direct` or `proxy`.
    pub transport: TransportMode,
    /// Base URL for the direct transport.
    pub base_url: String,
    /// Per-request timeout (milliseconds).
    pub timeout_ms: u64,
    /// Marketplace name sent with every start request.
    pub platform: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            transport: TransportMode::default(),
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 10_000,
            platform: "tokopedia".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [proxy]
// ---------------------------------------------------------------------------

/// Relay used by the proxy transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub relay_url: String,
    /// Capability method names the relay implements.
    pub capabilities: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://localhost:8787".to_string(),
            capabilities: vec![
                "startClickCirculation".to_string(),
                "createCampaign".to_string(),
                "safetyCheck".to_string(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// [log]
// ---------------------------------------------------------------------------

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum retained entries; older ones are evicted.
    pub capacity: usize,
    /// Directory receiving `seo-tools-logs-<date>.txt` exports.
    pub export_dir: String,
    /// Append diagnostics to `~/.seodash/dashboard.log`.
    pub diagnostics: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: crate::activity::DEFAULT_CAPACITY,
            export_dir: ".".to_string(),
            diagnostics: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [monitor]
// ---------------------------------------------------------------------------

/// Connection monitor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between liveness polls.
    pub interval_secs: u64,
    /// Seconds between background tool activity entries.
    pub activity_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            activity_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

/// Web dashboard and UI timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Listen address for `seodash serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
    /// Seconds a tool badge shows `running` before reverting to `active`.
    pub badge_reset_secs: u64,
    /// Seconds before a notification auto-dismisses.
    pub notification_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9750".to_string(),
            open_browser: true,
            badge_reset_secs: 5,
            notification_secs: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl DashConfig {
    /// Annotated TOML written by `seodash config init`.
    pub fn default_toml() -> String {
        r#"# seodash configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SEODASH_*)
#   2. Project config (.seodash.toml in current directory)
#   3. User global config (~/.seodash/config.toml)
#   4. Built-in defaults

[backend]
transport = "direct"                  # direct | proxy
base_url = "http://localhost:5000"
timeout_ms = 10000
platform = "tokopedia"

[proxy]
relay_url = "http://localhost:8787"
capabilities = ["startClickCirculation", "createCampaign", "safetyCheck"]

[log]
capacity = 100
export_dir = "."
diagnostics = true                    # ~/.seodash/dashboard.log

[monitor]
interval_secs = 30
activity_secs = 15                    # tool activity entries while connected

[dashboard]
addr = "127.0.0.1:9750"
open_browser = true
badge_reset_secs = 5
notification_secs = 5
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
