//! JSON API handlers for the web dashboard.
//!
//! Each handler maps one endpoint onto a [`Dashboard`] operation and returns
//! a `Response<Cursor<Vec<u8>>>`.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::activity::LogEntry;
use crate::app::Dashboard;

use super::{ApiResponse, error_response, header};

static TOOL_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/api/tools/([^/]+)/start$").expect("valid tool route regex"));

static DISMISS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/api/notifications/(\d+)/dismiss$").expect("valid dismiss route regex")
});

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StartRequest {
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
struct CommandRequest {
    command: String,
}

#[derive(Serialize)]
struct LogsResponse<'a> {
    paused: bool,
    capacity: usize,
    entries: Vec<&'a LogEntry>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_response<T: Serialize>(data: &T) -> Result<ApiResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(header("Content-Type", "application/json; charset=utf-8")?)
        .with_status_code(StatusCode(200)))
}

/// Tool key of a `/api/tools/{key}/start` path.
pub fn tool_start_key(path: &str) -> Option<&str> {
    TOOL_START_RE
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Notification id of a `/api/notifications/{id}/dismiss` path.
pub fn dismiss_id(path: &str) -> Option<u64> {
    DISMISS_RE
        .captures(path)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/dashboard`: full session snapshot.
pub fn get_dashboard(dashboard: &Dashboard) -> Result<ApiResponse> {
    json_response(&dashboard.snapshot())
}

/// `GET /api/logs`: activity entries, newest first.
pub fn get_logs(dashboard: &Dashboard) -> Result<ApiResponse> {
    let log = dashboard.log();
    json_response(&LogsResponse {
        paused: log.is_paused(),
        capacity: log.capacity(),
        entries: log.entries().collect(),
    })
}

/// `POST /api/logs/clear`
pub fn post_logs_clear(dashboard: &mut Dashboard) -> Result<ApiResponse> {
    dashboard.clear_logs();
    json_response(&serde_json::json!({ "success": true, "entries": dashboard.log().len() }))
}

/// `POST /api/logs/pause`
pub fn post_logs_pause(dashboard: &mut Dashboard) -> Result<ApiResponse> {
    dashboard.pause_logs();
    json_response(&serde_json::json!({ "success": true, "paused": true }))
}

/// `POST /api/logs/resume`
pub fn post_logs_resume(dashboard: &mut Dashboard) -> Result<ApiResponse> {
    dashboard.resume_logs();
    json_response(&serde_json::json!({ "success": true, "paused": false }))
}

/// `GET /api/logs/export`: plain-text download of the activity log.
pub fn get_logs_export(dashboard: &mut Dashboard) -> Result<ApiResponse> {
    let Some((name, body)) = dashboard.export_logs() else {
        return Ok(error_response(404, "No logs to export"));
    };

    Ok(Response::from_data(body.into_bytes())
        .with_header(header("Content-Type", "text/plain; charset=utf-8")?)
        .with_header(header(
            "Content-Disposition",
            &format!("attachment; filename=\"{name}\""),
        )?)
        .with_status_code(StatusCode(200)))
}

/// `POST /api/tools/{key}/start`: expects `{ "url": "https://..." }`.
pub fn post_tool_start(dashboard: &mut Dashboard, key: &str, body: &str) -> Result<ApiResponse> {
    let req: StartRequest =
        serde_json::from_str(body).context("invalid JSON in tool start request")?;
    let result = dashboard.start_tool(key, &req.url);

    let mut json = serde_json::to_value(&result).context("failed to serialize dispatch result")?;
    if let Some(obj) = json.as_object_mut() {
        obj.insert("tool".to_string(), serde_json::json!(key));
        obj.insert(
            "error".to_string(),
            serde_json::json!(result.error.as_ref().map(ToString::to_string)),
        );
    }
    json_response(&json)
}

/// `POST /api/command`: expects `{ "command": "status" }`.
pub fn post_command(dashboard: &mut Dashboard, body: &str) -> Result<ApiResponse> {
    let req: CommandRequest =
        serde_json::from_str(body).context("invalid JSON in command request")?;
    dashboard.run_command(&req.command);
    json_response(&dashboard.snapshot())
}

/// `POST /api/notifications/{id}/dismiss`
pub fn post_notification_dismiss(dashboard: &mut Dashboard, id: u64) -> Result<ApiResponse> {
    let dismissed = dashboard.dismiss_notification(id);
    json_response(&serde_json::json!({ "success": dismissed }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_start_key_extracts_key() {
        assert_eq!(tool_start_key("/api/tools/click/start"), Some("click"));
        assert_eq!(tool_start_key("/api/tools/review/start"), Some("review"));
    }

    #[test]
    fn tool_start_key_rejects_other_paths() {
        assert_eq!(tool_start_key("/api/tools/click"), None);
        assert_eq!(tool_start_key("/api/tools/click/start/now"), None);
        assert_eq!(tool_start_key("/api/tools//start"), None);
    }

    #[test]
    fn tool_start_key_passes_unknown_keys_through() {
        assert_eq!(tool_start_key("/api/tools/rocket/start"), Some("rocket"));
    }

    #[test]
    fn dismiss_id_parses_numbers() {
        assert_eq!(dismiss_id("/api/notifications/42/dismiss"), Some(42));
        assert_eq!(dismiss_id("/api/notifications/x/dismiss"), None);
    }

    #[test]
    fn start_request_defaults_url() {
        let req: StartRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.url, "");
    }
}
