//! Request and response bodies exchanged with the automation backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tools::ToolKind;

/// Body of a start-tool request, shared by both transports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub url: String,
    pub sessions: u32,
    pub platform: String,
    /// Campaign name, only sent for the campaign tool.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl ToolRequest {
    /// Build the request body for `tool`. `stamp_ms` names campaigns.
    pub fn for_tool(tool: ToolKind, url: &str, platform: &str, stamp_ms: i64) -> Self {
        let name = match tool {
            ToolKind::Campaign => Some(format!("Campaign_{stamp_ms}")),
            _ => None,
        };
        Self {
            url: url.to_string(),
            sessions: tool.default_sessions(),
            platform: platform.to_string(),
            name,
        }
    }
}

/// `{status, message?, data?}` returned by every tool endpoint/capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

impl ToolResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        if let Value::Object(map) = data {
            self.data = Some(map);
        }
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// `GET /api/status` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tools: Vec<BackendTool>,
}

/// One entry of the backend's own tool list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendTool {
    pub name: String,
    pub status: String,
}
