//! Connection monitor: periodic liveness probe of the backend.
//!
//! A poll classifies the backend as connected only when the probe succeeds
//! and reports `online`. Every poll appends exactly one activity entry and
//! never raises a notification.

use chrono::Utc;
use serde::Serialize;

use crate::activity::{LogKind, LogStore};
use crate::backend::{BackendTool, Transport, TransportMode};
use crate::diagnostics::Diagnostics;

/// Last known backend reachability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionState {
    pub connected: bool,
    /// Tool list from the last successful direct-mode probe.
    pub backend_tools: Vec<BackendTool>,
    /// RFC 3339 time of the last poll.
    pub last_checked: Option<String>,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        if self.connected {
            "Connected"
        } else {
            "Disconnected"
        }
    }
}

/// Probe the backend once, update `state`, and log the result.
pub fn poll(
    transport: &dyn Transport,
    state: &mut ConnectionState,
    log: &mut LogStore,
    diagnostics: &Diagnostics,
) -> bool {
    let result = transport.check_online();
    state.last_checked = Some(Utc::now().to_rfc3339());

    let (connected, kind, message) = match (transport.mode(), result) {
        (TransportMode::Direct, Ok(probe)) if probe.online => {
            state.backend_tools = probe.tools;
            (true, LogKind::Success, "Local backend connected")
        }
        (TransportMode::Direct, Ok(_)) => (false, LogKind::Error, "Local backend not connected"),
        (TransportMode::Direct, Err(error)) => {
            diagnostics.record(&format!("direct status check failed: {error}"));
            (false, LogKind::Error, "Local backend not connected")
        }
        (TransportMode::Proxy, Ok(probe)) if probe.online => {
            (true, LogKind::Success, "Backend connected via proxy API")
        }
        (TransportMode::Proxy, Ok(_)) => {
            (false, LogKind::Info, "Backend offline - Running in demo mode")
        }
        (TransportMode::Proxy, Err(error)) => {
            diagnostics.record(&format!("proxy status check failed: {error}"));
            (false, LogKind::Info, "Proxy API initializing...")
        }
    };

    if !connected {
        state.backend_tools.clear();
    }
    state.connected = connected;
    log.append(kind, message);
    connected
}
