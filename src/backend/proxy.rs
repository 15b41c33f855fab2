//! Proxy transport: tool starts are delegated to a backend client object.
//!
//! The client exposes a liveness check plus one named method per
//! [`Capability`]. A tool whose capability the client does not register is
//! reported as unavailable instead of being attempted.

use serde::Deserialize;

use super::http::HttpClient;
use super::{Capability, Probe, ToolKind, ToolRequest, ToolResponse, Transport, TransportMode};
use crate::error::DashError;

/// Backend client injected into the proxy transport.
pub trait BackendClient {
    fn is_backend_online(&self) -> Result<bool, DashError>;

    fn has_capability(&self, capability: Capability) -> bool;

    fn invoke(&self, capability: Capability, request: &ToolRequest) -> Result<ToolResponse, DashError>;
}

/// [`Transport`] over a [`BackendClient`].
pub struct ProxyTransport {
    client: Box<dyn BackendClient>,
}

impl ProxyTransport {
    pub fn new(client: Box<dyn BackendClient>) -> Self {
        Self { client }
    }
}

impl Transport for ProxyTransport {
    fn mode(&self) -> TransportMode {
        TransportMode::Proxy
    }

    fn check_online(&self) -> Result<Probe, DashError> {
        let online = self.client.is_backend_online()?;
        Ok(Probe {
            online,
            tools: Vec::new(),
        })
    }

    fn supports(&self, tool: ToolKind) -> bool {
        tool.proxy_capability()
            .is_some_and(|c| self.client.has_capability(c))
    }

    fn start_tool(&self, tool: ToolKind, request: &ToolRequest) -> Result<ToolResponse, DashError> {
        let capability = tool
            .proxy_capability()
            .filter(|c| self.client.has_capability(*c))
            .ok_or_else(|| DashError::CapabilityUnavailable {
                tool: tool.display_name().to_string(),
            })?;
        self.client.invoke(capability, request)
    }
}

// ---------------------------------------------------------------------------
// HTTP relay client
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OnlineResponse {
    #[serde(default)]
    online: bool,
}

/// Production [`BackendClient`] speaking to a relay service.
///
/// - `GET {relay}/online` → `{"online": bool}`
/// - `POST {relay}/call/{method}` with the tool request → `{status, message?, data?}`
#[derive(Debug)]
pub struct RelayClient<H> {
    relay_url: String,
    capabilities: Vec<Capability>,
    http: H,
}

impl<H: HttpClient> RelayClient<H> {
    pub fn new(relay_url: &str, capabilities: Vec<Capability>, http: H) -> Self {
        Self {
            relay_url: relay_url.trim_end_matches('/').to_string(),
            capabilities,
            http,
        }
    }
}

impl<H: HttpClient> BackendClient for RelayClient<H> {
    fn is_backend_online(&self) -> Result<bool, DashError> {
        let url = format!("{}/online", self.relay_url);
        let resp = self
            .http
            .get(&url)
            .map_err(|e| DashError::transport("proxy probe failed", e))?;
        if !resp.is_success() {
            return Ok(false);
        }
        let parsed: OnlineResponse = resp
            .json()
            .map_err(|e| DashError::transport("proxy probe failed", e))?;
        Ok(parsed.online)
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn invoke(&self, capability: Capability, request: &ToolRequest) -> Result<ToolResponse, DashError> {
        let url = format!("{}/call/{}", self.relay_url, capability.method_name());
        let context = format!("{capability} proxy error");

        let body = serde_json::to_value(request).map_err(|e| DashError::transport(&context, e))?;
        let resp = self
            .http
            .post_json(&url, &body)
            .map_err(|e| DashError::transport(&context, e))?;
        resp.json().map_err(|e| DashError::transport(&context, e))
    }
}
