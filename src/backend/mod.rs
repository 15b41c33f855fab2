//! Backend transports.
//!
//! The dashboard reaches the automation backend through one of two
//! strategies, chosen once from configuration:
//!
//! - **direct**: raw HTTP against `backend.base_url` ([`direct`])
//! - **proxy**: method calls on an injected [`proxy::BackendClient`]
//!
//! Both implement [`Transport`] and return the same [`ToolResponse`] shape,
//! so the dispatcher and monitor never branch on the wire format.

pub mod direct;
pub mod http;
pub mod proxy;
pub mod tools;
pub mod wire;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::DashConfig;
use crate::error::DashError;

pub use tools::{Capability, ToolDescriptor, ToolKind};
pub use wire::{BackendTool, StatusResponse, ToolRequest, ToolResponse};

/// Which transport strategy is active for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportMode {
    /// Raw HTTP to the configured base URL.
    #[default]
    Direct,
    /// Calls through a backend client object.
    Proxy,
}

impl TransportMode {
    /// Human label used by `status` output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Direct => "Localhost Direct",
            Self::Proxy => "Proxy API",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Proxy => write!(f, "proxy"),
        }
    }
}

/// Outcome of a liveness probe that reached the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Probe {
    pub online: bool,
    /// Tool list reported by the backend, when it sends one.
    pub tools: Vec<BackendTool>,
}

/// Common interface of the direct and proxy strategies.
pub trait Transport {
    fn mode(&self) -> TransportMode;

    /// Probe the backend. `Err` means the probe itself failed.
    fn check_online(&self) -> Result<Probe, DashError>;

    /// Whether `tool` can be started through this transport.
    fn supports(&self, tool: ToolKind) -> bool;

    /// Ask the backend to start `tool`.
    fn start_tool(&self, tool: ToolKind, request: &ToolRequest) -> Result<ToolResponse, DashError>;
}

/// Build the transport selected by `config.backend.transport`.
pub fn from_config(config: &DashConfig) -> Box<dyn Transport> {
    let timeout = Duration::from_millis(config.backend.timeout_ms);
    let http = http::UreqClient::new(timeout);

    match config.backend.transport {
        TransportMode::Direct => Box::new(direct::DirectTransport::new(&config.backend.base_url, http)),
        TransportMode::Proxy => {
            let capabilities = config
                .proxy
                .capabilities
                .iter()
                .filter_map(|name| Capability::from_method_name(name))
                .collect();
            let client = proxy::RelayClient::new(&config.proxy.relay_url, capabilities, http);
            Box::new(proxy::ProxyTransport::new(Box::new(client)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_honours_mode() {
        let mut config = DashConfig::default();
        assert_eq!(from_config(&config).mode(), TransportMode::Direct);

        config.backend.transport = TransportMode::Proxy;
        let transport = from_config(&config);
        assert_eq!(transport.mode(), TransportMode::Proxy);
        assert!(transport.supports(ToolKind::Click));
        assert!(!transport.supports(ToolKind::Review));
    }

    #[test]
    fn proxy_ignores_unknown_capability_names() {
        let mut config = DashConfig::default();
        config.backend.transport = TransportMode::Proxy;
        config.proxy.capabilities = vec!["safetyCheck".to_string(), "bogus".to_string()];
        let transport = from_config(&config);
        assert!(transport.supports(ToolKind::Safety));
        assert!(!transport.supports(ToolKind::Click));
    }
}
