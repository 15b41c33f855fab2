//! Minimal synchronous HTTP seam.
//!
//! Transports talk to the network through [`HttpClient`] so tests can count
//! and script calls. [`UreqClient`] is the production implementation.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Raw HTTP response: status code plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_str(&self.body).map_err(|e| HttpError::Body(e.to_string()))
    }
}

/// Failures below the HTTP status level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("unreadable response body: {0}")]
    Body(String),
}

/// Blocking JSON-over-HTTP operations used by the transports.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, HttpError>;
}

// ---------------------------------------------------------------------------
// ureq implementation
// ---------------------------------------------------------------------------

/// `ureq`-backed client. Non-2xx statuses are returned as responses, not
/// errors, so callers can still read the JSON body.
#[derive(Debug, Clone)]
pub struct UreqClient {
    timeout: Duration,
}

impl UreqClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let url = loopback(url);
        let result = ureq::get(&url)
            .timeout(self.timeout)
            .set("Accept", "application/json")
            .call();
        into_response(result)
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, HttpError> {
        let url = loopback(url);
        let result = ureq::post(&url)
            .timeout(self.timeout)
            .set("Accept", "application/json")
            .send_json(body);
        into_response(result)
    }
}

/// `localhost` may resolve to `::1` first and stall when the backend only
/// binds IPv4.
fn loopback(url: &str) -> String {
    url.replace("://localhost", "://127.0.0.1")
}

fn into_response(result: Result<ureq::Response, ureq::Error>) -> Result<HttpResponse, HttpError> {
    match result {
        Ok(resp) => read_body(resp),
        Err(ureq::Error::Status(_, resp)) => read_body(resp),
        Err(ureq::Error::Transport(t)) => Err(HttpError::Connection(t.to_string())),
    }
}

fn read_body(resp: ureq::Response) -> Result<HttpResponse, HttpError> {
    let status = resp.status();
    let body = resp
        .into_string()
        .map_err(|e| HttpError::Body(e.to_string()))?;
    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[test]
    fn json_errors_are_body_errors() {
        let resp = HttpResponse::new(200, "<html>");
        let err = resp.json::<Value>().unwrap_err();
        assert!(matches!(err, HttpError::Body(_)));
    }

    #[test]
    fn localhost_is_rewritten() {
        assert_eq!(loopback("http://localhost:5000/api"), "http://127.0.0.1:5000/api");
        assert_eq!(loopback("https://example.com"), "https://example.com");
    }
}
