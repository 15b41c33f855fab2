//! Direct transport: raw HTTP against the backend's REST API.

use super::http::HttpClient;
use super::{Probe, StatusResponse, ToolKind, ToolRequest, ToolResponse, Transport, TransportMode};
use crate::error::DashError;

/// Talks to `GET /api/status` and `POST {tool.endpoint}` on `base_url`.
#[derive(Debug)]
pub struct DirectTransport<H> {
    base_url: String,
    http: H,
}

impl<H: HttpClient> DirectTransport<H> {
    pub fn new(base_url: &str, http: H) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

impl<H: HttpClient> Transport for DirectTransport<H> {
    fn mode(&self) -> TransportMode {
        TransportMode::Direct
    }

    fn check_online(&self) -> Result<Probe, DashError> {
        let url = format!("{}/api/status", self.base_url);
        let resp = self
            .http
            .get(&url)
            .map_err(|e| DashError::transport("status probe failed", e))?;

        if !resp.is_success() {
            return Ok(Probe::default());
        }

        let parsed: StatusResponse = resp
            .json()
            .map_err(|e| DashError::transport("status probe failed", e))?;

        Ok(Probe {
            online: parsed.status == "online",
            tools: parsed.tools,
        })
    }

    fn supports(&self, _tool: ToolKind) -> bool {
        true
    }

    fn start_tool(&self, tool: ToolKind, request: &ToolRequest) -> Result<ToolResponse, DashError> {
        let url = format!("{}{}", self.base_url, tool.endpoint());
        let context = format!("{} connection failed", tool.display_name());

        let body = serde_json::to_value(request).map_err(|e| DashError::transport(&context, e))?;
        let resp = self
            .http
            .post_json(&url, &body)
            .map_err(|e| DashError::transport(&context, e))?;

        // The body decides the outcome, even on non-2xx statuses.
        resp.json().map_err(|e| DashError::transport(&context, e))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::Value;

    use super::*;
    use crate::backend::http::{HttpError, HttpResponse};

    #[derive(Default)]
    struct ScriptedHttp {
        replies: RefCell<Vec<Result<HttpResponse, HttpError>>>,
        calls: RefCell<Vec<(String, Option<Value>)>>,
    }

    impl ScriptedHttp {
        fn reply(self, r: Result<HttpResponse, HttpError>) -> Self {
            self.replies.borrow_mut().push(r);
            self
        }

        fn pop_reply(&self) -> Result<HttpResponse, HttpError> {
            self.replies.borrow_mut().remove(0)
        }
    }

    impl HttpClient for &ScriptedHttp {
        fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
            self.calls.borrow_mut().push((url.to_string(), None));
            self.pop_reply()
        }

        fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, HttpError> {
            self.calls
                .borrow_mut()
                .push((url.to_string(), Some(body.clone())));
            self.pop_reply()
        }
    }

    #[test]
    fn online_status_is_connected() {
        let http = ScriptedHttp::default().reply(Ok(HttpResponse::new(
            200,
            r#"{"status":"online","tools":[{"name":"click","status":"idle"}]}"#,
        )));
        let transport = DirectTransport::new("http://localhost:5000/", &http);

        let probe = transport.check_online().unwrap();
        assert!(probe.online);
        assert_eq!(probe.tools.len(), 1);
        assert_eq!(http.calls.borrow()[0].0, "http://localhost:5000/api/status");
    }

    #[test]
    fn offline_or_error_status_is_disconnected() {
        let http = ScriptedHttp::default()
            .reply(Ok(HttpResponse::new(200, r#"{"status":"offline"}"#)))
            .reply(Ok(HttpResponse::new(503, r#"{"status":"online"}"#)));
        let transport = DirectTransport::new("http://b", &http);

        assert!(!transport.check_online().unwrap().online);
        assert!(!transport.check_online().unwrap().online);
    }

    #[test]
    fn malformed_status_is_transport_error() {
        let http = ScriptedHttp::default().reply(Ok(HttpResponse::new(200, "not json")));
        let transport = DirectTransport::new("http://b", &http);
        assert!(matches!(
            transport.check_online(),
            Err(DashError::Transport { .. })
        ));
    }

    #[test]
    fn start_posts_to_tool_endpoint() {
        let http = ScriptedHttp::default().reply(Ok(HttpResponse::new(
            200,
            r#"{"status":"success","data":{"sessions":500}}"#,
        )));
        let transport = DirectTransport::new("http://b", &http);
        let request = ToolRequest::for_tool(ToolKind::Click, "https://shop/item", "tokopedia", 1);

        let resp = transport.start_tool(ToolKind::Click, &request).unwrap();
        assert_eq!(resp.status, "success");

        let calls = http.calls.borrow();
        assert_eq!(calls[0].0, "http://b/api/tools/click-circulation/start");
        let body = calls[0].1.as_ref().unwrap();
        assert_eq!(body["url"], "https://shop/item");
        assert_eq!(body["sessions"], 500);
    }

    #[test]
    fn error_status_body_is_still_read() {
        let http = ScriptedHttp::default().reply(Ok(HttpResponse::new(
            500,
            r#"{"status":"error","message":"driver crashed"}"#,
        )));
        let transport = DirectTransport::new("http://b", &http);
        let request = ToolRequest::for_tool(ToolKind::Safety, "https://x", "p", 1);

        let resp = transport.start_tool(ToolKind::Safety, &request).unwrap();
        assert_eq!(resp.status, "error");
        assert_eq!(resp.message.as_deref(), Some("driver crashed"));
    }

    #[test]
    fn connection_failure_maps_to_transport_error() {
        let http =
            ScriptedHttp::default().reply(Err(HttpError::Connection("refused".to_string())));
        let transport = DirectTransport::new("http://b", &http);
        let request = ToolRequest::for_tool(ToolKind::Click, "https://x", "p", 1);

        let err = transport.start_tool(ToolKind::Click, &request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Click Circulation connection failed: connection failed: refused"
        );
    }
}
