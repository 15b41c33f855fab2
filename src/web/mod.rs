//! Embedded web dashboard for seodash.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with tool cards, counters and the activity log
//! - JSON API endpoints driving the [`Dashboard`] session
//!
//! Launched via `seodash serve` (default: `http://127.0.0.1:9750`).

mod api;
mod frontend;

use std::io::Cursor;
use std::time::Duration;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::app::Dashboard;

/// Longest the request loop blocks before checking timers again.
const MAX_IDLE: Duration = Duration::from_millis(250);

pub type ApiResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Requests are handled sequentially between
/// timer ticks, so the session state never needs locking.
pub fn serve(dashboard: &mut Dashboard, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("seodash dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    dashboard.start();

    loop {
        let wait = dashboard
            .until_next_timer()
            .map_or(MAX_IDLE, |due| due.min(MAX_IDLE));

        let incoming = server
            .recv_timeout(wait)
            .context("failed to receive HTTP request")?;

        if let Some(mut request) = incoming {
            let method = request.method().clone();
            let url = request.url().to_string();

            let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
                let mut buf = String::new();
                let _ = request.as_reader().read_to_string(&mut buf);
                Some(buf)
            } else {
                None
            };

            let response = match dispatch(dashboard, &method, &url, body.as_deref()) {
                Ok(resp) => resp,
                Err(e) => error_response(500, &format!("{e:#}")),
            };
            let status = response.status_code().0;
            let _ = request.respond(response);

            println!(
                "{} {} {} {}",
                method,
                url,
                status,
                chrono::Local::now().format("%H:%M:%S")
            );
        }

        dashboard.tick();
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub fn dispatch(
    dashboard: &mut Dashboard,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<ApiResponse> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => serve_frontend(),

        // API: session state
        (&Method::Get, "/api/dashboard") => api::get_dashboard(dashboard),
        (&Method::Get, "/api/logs") => api::get_logs(dashboard),
        (&Method::Post, "/api/logs/clear") => api::post_logs_clear(dashboard),
        (&Method::Post, "/api/logs/pause") => api::post_logs_pause(dashboard),
        (&Method::Post, "/api/logs/resume") => api::post_logs_resume(dashboard),
        (&Method::Get, "/api/logs/export") => api::get_logs_export(dashboard),

        // API: actions
        (&Method::Post, "/api/command") => api::post_command(dashboard, body.unwrap_or("{}")),
        (&Method::Post, p) => {
            if let Some(key) = api::tool_start_key(p) {
                api::post_tool_start(dashboard, key, body.unwrap_or("{}"))
            } else if let Some(id) = api::dismiss_id(p) {
                api::post_notification_dismiss(dashboard, id)
            } else {
                Ok(not_found())
            }
        }

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> Result<ApiResponse> {
    Ok(Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(header("Content-Type", "text/html; charset=utf-8")?)
        .with_status_code(StatusCode(200)))
}

fn not_found() -> ApiResponse {
    error_response(404, "not found")
}

/// JSON `{"error": ...}` response with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> ApiResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    let resp = Response::from_data(body.into_bytes()).with_status_code(StatusCode(status));
    match header("Content-Type", "application/json; charset=utf-8") {
        Ok(h) => resp.with_header(h),
        Err(_) => resp,
    }
}

pub(crate) fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow::anyhow!("invalid header {name}: {value}"))
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", url]);
        c
    };

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = std::process::Command::new("open");
        c.arg(url);
        c
    };

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(url);
        c
    };

    command.spawn().context("failed to open browser")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::backend::{Probe, ToolKind, ToolRequest, ToolResponse, Transport, TransportMode};
    use crate::config::DashConfig;
    use crate::diagnostics::Diagnostics;
    use crate::error::DashError;
    use crate::scheduler::ManualClock;

    struct Offline;

    impl Transport for Offline {
        fn mode(&self) -> TransportMode {
            TransportMode::Direct
        }

        fn check_online(&self) -> Result<Probe, DashError> {
            Ok(Probe::default())
        }

        fn supports(&self, _: ToolKind) -> bool {
            true
        }

        fn start_tool(&self, _: ToolKind, _: &ToolRequest) -> Result<ToolResponse, DashError> {
            Err(DashError::transport("unreachable", "offline"))
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(
            &DashConfig::default(),
            Box::new(Offline),
            Rc::new(ManualClock::new()),
            Diagnostics::disabled(),
        )
    }

    fn body_of(resp: ApiResponse) -> String {
        let mut out = Vec::new();
        let mut reader = resp.into_reader();
        std::io::Read::read_to_end(&mut reader, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn unknown_routes_are_404() {
        let mut dash = dashboard();
        let resp = dispatch(&mut dash, &Method::Get, "/nope", None).unwrap();
        assert_eq!(resp.status_code().0, 404);
        let resp = dispatch(&mut dash, &Method::Post, "/api/tools//start", Some("{}")).unwrap();
        assert_eq!(resp.status_code().0, 404);
    }

    #[test]
    fn frontend_is_served() {
        let mut dash = dashboard();
        let resp = dispatch(&mut dash, &Method::Get, "/", None).unwrap();
        assert_eq!(resp.status_code().0, 200);
        assert!(body_of(resp).contains("<html"));
    }

    #[test]
    fn empty_export_is_404() {
        let mut dash = dashboard();
        let resp = dispatch(&mut dash, &Method::Get, "/api/logs/export", None).unwrap();
        assert_eq!(resp.status_code().0, 404);
        assert!(body_of(resp).contains("No logs to export"));
    }

    #[test]
    fn export_sets_download_name() {
        let mut dash = dashboard();
        dash.start();
        let resp = dispatch(&mut dash, &Method::Get, "/api/logs/export", None).unwrap();
        assert_eq!(resp.status_code().0, 200);
        let disposition = resp
            .headers()
            .iter()
            .find(|h| h.field.equiv("Content-Disposition"))
            .map(|h| h.value.to_string())
            .unwrap();
        assert!(disposition.contains("seo-tools-logs-"));
        assert!(body_of(resp).contains("ERROR: Local backend not connected"));
    }

    #[test]
    fn tool_start_while_disconnected_is_rejected() {
        let mut dash = dashboard();
        dash.start();
        let resp = dispatch(
            &mut dash,
            &Method::Post,
            "/api/tools/click/start",
            Some(r#"{"url": "https://shop.example"}"#),
        )
        .unwrap();
        assert_eq!(resp.status_code().0, 200);
        let json: serde_json::Value = serde_json::from_str(&body_of(resp)).unwrap();
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["error"], "Cannot start tool - Backend not connected");
    }

    #[test]
    fn command_route_runs_console_input() {
        let mut dash = dashboard();
        let resp = dispatch(
            &mut dash,
            &Method::Post,
            "/api/command",
            Some(r#"{"command": "help"}"#),
        )
        .unwrap();
        assert_eq!(resp.status_code().0, 200);
        assert!(
            dash.log()
                .latest()
                .unwrap()
                .message
                .starts_with("Available commands")
        );
    }

    #[test]
    fn pause_route_toggles_state() {
        let mut dash = dashboard();
        dispatch(&mut dash, &Method::Post, "/api/logs/pause", None).unwrap();
        assert!(dash.log().is_paused());
        dispatch(&mut dash, &Method::Post, "/api/logs/resume", None).unwrap();
        assert!(!dash.log().is_paused());
    }
}
