//! Backend dispatcher: validate a start-tool request, send it through the
//! active transport, and normalise the answer into a [`DispatchResult`].
//!
//! Checks run in a fixed order and short-circuit before any network call:
//!
//! 1. tool key known
//! 2. direct: backend connected / proxy: capability registered
//! 3. target URL starts with `http://` or `https://`
//!
//! Every outcome appends to the activity log: one entry per rejected
//! request, or a start line plus a result line for requests that were sent.
//! There are no retries.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::activity::{LogKind, LogStore};
use crate::backend::{ToolKind, ToolRequest, ToolResponse, Transport, TransportMode};
use crate::diagnostics::Diagnostics;
use crate::error::DashError;
use crate::monitor::ConnectionState;

static TARGET_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/]").expect("valid target URL regex")
});

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Warning,
    Failure,
}

impl Outcome {
    /// Both `success` and `warning` count as a started tool.
    pub fn is_started(self) -> bool {
        matches!(self, Self::Success | Self::Warning)
    }
}

/// Transport-independent result of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchResult {
    pub outcome: Outcome,
    pub message: Option<String>,
    pub payload: Option<Map<String, Value>>,
    /// Tool resolved from the key, when it was known.
    #[serde(skip)]
    pub tool: Option<ToolKind>,
    /// Rejection or transport failure behind a `Failure` outcome.
    #[serde(skip)]
    pub error: Option<DashError>,
}

impl DispatchResult {
    fn failed(tool: Option<ToolKind>, error: DashError) -> Self {
        Self {
            outcome: Outcome::Failure,
            message: Some(error.to_string()),
            payload: None,
            tool,
            error: Some(error),
        }
    }
}

/// Map a backend response onto a [`DispatchResult`].
pub fn normalize(tool: ToolKind, response: ToolResponse) -> DispatchResult {
    let outcome = match response.status.as_str() {
        "success" => Outcome::Success,
        "warning" => Outcome::Warning,
        _ => Outcome::Failure,
    };
    DispatchResult {
        outcome,
        message: response.message,
        payload: response.data,
        tool: Some(tool),
        error: None,
    }
}

/// Reject anything that is not an absolute `http(s)` URL.
pub fn validate_url(url: &str) -> Result<(), DashError> {
    if TARGET_URL_RE.is_match(url) {
        Ok(())
    } else {
        Err(DashError::InvalidUrl {
            url: url.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Owns the session's transport and the fixed request fields.
pub struct Dispatcher {
    transport: Box<dyn Transport>,
    platform: String,
    diagnostics: Diagnostics,
}

impl Dispatcher {
    pub fn new(transport: Box<dyn Transport>, platform: &str, diagnostics: Diagnostics) -> Self {
        Self {
            transport,
            platform: platform.to_string(),
            diagnostics,
        }
    }

    pub fn mode(&self) -> TransportMode {
        self.transport.mode()
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Start the tool named `key` against `url`.
    pub fn start_tool(
        &self,
        log: &mut LogStore,
        connection: &ConnectionState,
        key: &str,
        url: &str,
    ) -> DispatchResult {
        let tool = match self.check(connection, key, url) {
            Ok(tool) => tool,
            Err((tool, error)) => {
                log.append(error.log_kind(), error.to_string());
                return DispatchResult::failed(tool, error);
            }
        };

        let name = tool.display_name();
        let via = match self.mode() {
            TransportMode::Direct => "(Direct Mode)",
            TransportMode::Proxy => "via Proxy",
        };
        log.append(LogKind::Info, format!("Starting {name} {via}..."));

        let request = ToolRequest::for_tool(tool, url, &self.platform, Utc::now().timestamp_millis());

        match self.transport.start_tool(tool, &request) {
            Ok(response) => {
                let result = normalize(tool, response);
                if result.outcome.is_started() {
                    log.append(LogKind::Success, format!("{name} started successfully"));
                } else {
                    let reason = result.message.as_deref().unwrap_or("Unknown error");
                    log.append(LogKind::Error, format!("{name} failed: {reason}"));
                }
                result
            }
            Err(error) => {
                self.diagnostics
                    .record(&format!("dispatch {} failed: {error}", tool.key()));
                log.append(error.log_kind(), error.to_string());
                DispatchResult::failed(Some(tool), error)
            }
        }
    }

    fn check(
        &self,
        connection: &ConnectionState,
        key: &str,
        url: &str,
    ) -> Result<ToolKind, (Option<ToolKind>, DashError)> {
        let tool = ToolKind::from_key(key).ok_or_else(|| {
            (
                None,
                DashError::UnknownTool {
                    key: key.to_string(),
                },
            )
        })?;

        match self.mode() {
            TransportMode::Direct if !connection.connected => {
                return Err((Some(tool), DashError::NotConnected));
            }
            TransportMode::Proxy if !self.transport.supports(tool) => {
                return Err((
                    Some(tool),
                    DashError::CapabilityUnavailable {
                        tool: tool.display_name().to_string(),
                    },
                ));
            }
            _ => {}
        }

        validate_url(url).map_err(|e| (Some(tool), e))?;
        Ok(tool)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::backend::Probe;

    struct CountingTransport {
        mode: TransportMode,
        calls: Rc<Cell<usize>>,
        reply: Result<ToolResponse, DashError>,
        supported: bool,
    }

    impl Transport for CountingTransport {
        fn mode(&self) -> TransportMode {
            self.mode
        }

        fn check_online(&self) -> Result<Probe, DashError> {
            Ok(Probe::default())
        }

        fn supports(&self, _tool: ToolKind) -> bool {
            self.supported
        }

        fn start_tool(&self, _: ToolKind, _: &ToolRequest) -> Result<ToolResponse, DashError> {
            self.calls.set(self.calls.get() + 1);
            self.reply.clone()
        }
    }

    fn dispatcher(
        mode: TransportMode,
        reply: Result<ToolResponse, DashError>,
        supported: bool,
    ) -> (Dispatcher, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let transport = CountingTransport {
            mode,
            calls: Rc::clone(&calls),
            reply,
            supported,
        };
        (
            Dispatcher::new(Box::new(transport), "tokopedia", Diagnostics::disabled()),
            calls,
        )
    }

    fn connected() -> ConnectionState {
        ConnectionState {
            connected: true,
            ..ConnectionState::default()
        }
    }

    #[test]
    fn url_validation() {
        assert!(validate_url("https://tokopedia.com/item").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("ftp://x").is_err());
        assert!(validate_url("httpx://x").is_err());
        assert!(validate_url("http://").is_err());
        assert!(validate_url("").is_err());
        assert!(validate_url("www.example.com").is_err());
    }

    #[test]
    fn url_scheme_is_case_sensitive() {
        assert!(validate_url("HTTP://shop.example/item").is_err());
        assert!(validate_url("Https://shop.example/item").is_err());
    }

    #[test]
    fn normalize_maps_status() {
        assert_eq!(normalize(ToolKind::Click, ToolResponse::new("success")).outcome, Outcome::Success);
        assert_eq!(normalize(ToolKind::Click, ToolResponse::new("warning")).outcome, Outcome::Warning);
        assert_eq!(normalize(ToolKind::Click, ToolResponse::new("queued")).outcome, Outcome::Failure);
        assert_eq!(normalize(ToolKind::Click, ToolResponse::new("")).outcome, Outcome::Failure);
    }

    #[test]
    fn invalid_url_sends_nothing() {
        for mode in [TransportMode::Direct, TransportMode::Proxy] {
            let (d, calls) = dispatcher(mode, Ok(ToolResponse::new("success")), true);
            let mut log = LogStore::default();
            let result = d.start_tool(&mut log, &connected(), "click", "shop.example/item");

            assert_eq!(result.outcome, Outcome::Failure);
            assert!(matches!(result.error, Some(DashError::InvalidUrl { .. })));
            assert_eq!(calls.get(), 0);
            assert_eq!(log.len(), 1);
            assert_eq!(log.latest().unwrap().kind, LogKind::Error);
        }
    }

    #[test]
    fn unknown_tool_in_any_mode() {
        for mode in [TransportMode::Direct, TransportMode::Proxy] {
            let (d, calls) = dispatcher(mode, Ok(ToolResponse::new("success")), true);
            let mut log = LogStore::default();
            let result = d.start_tool(&mut log, &ConnectionState::default(), "review", "https://x");

            assert_eq!(
                result.error,
                Some(DashError::UnknownTool {
                    key: "review".to_string()
                })
            );
            assert_eq!(result.tool, None);
            assert_eq!(calls.get(), 0);
            assert_eq!(log.count_kind(LogKind::Error), 1);
        }
    }

    #[test]
    fn direct_mode_requires_connection() {
        let (d, calls) = dispatcher(TransportMode::Direct, Ok(ToolResponse::new("success")), true);
        let mut log = LogStore::default();
        let result = d.start_tool(&mut log, &ConnectionState::default(), "click", "https://x");

        assert_eq!(result.error, Some(DashError::NotConnected));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn proxy_mode_without_capability_warns() {
        let (d, calls) = dispatcher(TransportMode::Proxy, Ok(ToolResponse::new("success")), false);
        let mut log = LogStore::default();
        let result = d.start_tool(&mut log, &ConnectionState::default(), "review", "https://x");

        assert_eq!(result.outcome, Outcome::Failure);
        assert!(matches!(
            result.error,
            Some(DashError::CapabilityUnavailable { .. })
        ));
        assert_eq!(calls.get(), 0);
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().unwrap().kind, LogKind::Warning);
        assert_eq!(log.latest().unwrap().message, "Review Booster not available in proxy mode");
    }

    #[test]
    fn success_logs_start_and_result() {
        let reply = ToolResponse::new("success").with_data(json!({"sessions": 500}));
        let (d, calls) = dispatcher(TransportMode::Direct, Ok(reply), true);
        let mut log = LogStore::default();
        let result = d.start_tool(&mut log, &connected(), "click", "https://shop/item");

        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(result.payload.unwrap()["sessions"], 500);
        assert_eq!(calls.get(), 1);
        assert_eq!(log.count_kind(LogKind::Success), 1);
        assert_eq!(log.latest().unwrap().message, "Click Circulation started successfully");
    }

    #[test]
    fn backend_failure_status_is_logged_with_message() {
        let reply = ToolResponse::new("error").with_message("quota exceeded");
        let (d, _) = dispatcher(TransportMode::Direct, Ok(reply), true);
        let mut log = LogStore::default();
        let result = d.start_tool(&mut log, &connected(), "safety", "https://x");

        assert_eq!(result.outcome, Outcome::Failure);
        assert_eq!(result.error, None);
        assert_eq!(log.latest().unwrap().message, "Safety Monitor failed: quota exceeded");
    }

    #[test]
    fn transport_error_is_failure() {
        let (d, calls) = dispatcher(
            TransportMode::Proxy,
            Err(DashError::transport("Campaign Builder connection failed", "reset")),
            true,
        );
        let mut log = LogStore::default();
        let result = d.start_tool(&mut log, &ConnectionState::default(), "campaign", "https://x");

        assert_eq!(result.outcome, Outcome::Failure);
        assert!(matches!(result.error, Some(DashError::Transport { .. })));
        assert_eq!(calls.get(), 1);
        assert_eq!(log.count_kind(LogKind::Error), 1);
    }
}
