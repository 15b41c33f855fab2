//! Static tool table.
//!
//! Tools form a closed set: each [`ToolKind`] carries its key, display name,
//! HTTP endpoint, request shape and optional proxy capability as data, so
//! adding a tool means adding a variant and the compiler points at every
//! match that needs updating.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Proxy capabilities
// ---------------------------------------------------------------------------

/// A named method exposed by the proxy backend client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "startClickCirculation")]
    StartClickCirculation,
    #[serde(rename = "createCampaign")]
    CreateCampaign,
    #[serde(rename = "safetyCheck")]
    SafetyCheck,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::StartClickCirculation,
        Capability::CreateCampaign,
        Capability::SafetyCheck,
    ];

    /// Method name as the proxy client knows it.
    pub fn method_name(self) -> &'static str {
        match self {
            Self::StartClickCirculation => "startClickCirculation",
            Self::CreateCampaign => "createCampaign",
            Self::SafetyCheck => "safetyCheck",
        }
    }

    /// Resolve a method name (as written in config files).
    pub fn from_method_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.method_name() == name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// The tools the dashboard can start on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Click,
    Campaign,
    Safety,
    Review,
}

/// Serializable view of a tool's static configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub key: &'static str,
    pub display_name: &'static str,
    pub endpoint: &'static str,
    pub proxy_capability: Option<Capability>,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Click,
        ToolKind::Campaign,
        ToolKind::Safety,
        ToolKind::Review,
    ];

    /// Look up a tool by its configuration key (case-sensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Campaign => "campaign",
            Self::Safety => "safety",
            Self::Review => "review",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Click => "Click Circulation",
            Self::Campaign => "Campaign Builder",
            Self::Safety => "Safety Monitor",
            Self::Review => "Review Booster",
        }
    }

    /// Path appended to the backend base URL in direct mode.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Click => "/api/tools/click-circulation/start",
            Self::Campaign => "/api/campaigns/create",
            Self::Safety => "/api/tools/safety-monitor/check",
            Self::Review => "/api/tools/review-booster/start",
        }
    }

    /// Proxy method implementing this tool, if any.
    pub fn proxy_capability(self) -> Option<Capability> {
        match self {
            Self::Click => Some(Capability::StartClickCirculation),
            Self::Campaign => Some(Capability::CreateCampaign),
            Self::Safety => Some(Capability::SafetyCheck),
            Self::Review => None,
        }
    }

    /// Session count sent with a start request.
    pub fn default_sessions(self) -> u32 {
        match self {
            Self::Click => 500,
            _ => 10,
        }
    }

    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            key: self.key(),
            display_name: self.display_name(),
            endpoint: self.endpoint(),
            proxy_capability: self.proxy_capability(),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
