//! HTTP transport seam.
//!
//! `ApiClient` only needs "GET a URL" and "POST JSON to a URL", returning the
//! status and body text. Keeping that behind a trait lets tests record the
//! outbound requests without a network.

use reqwest::blocking::Client;

use super::ApiError;

/// Status code and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

pub trait Transport {
    fn get(&self, url: &str) -> Result<HttpReply, ApiError>;
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpReply, ApiError>;
}

/// Blocking `reqwest` transport. No timeout and no retry are configured.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpReply, ApiError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        read_reply(resp)
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpReply, ApiError> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        read_reply(resp)
    }
}

fn read_reply(resp: reqwest::blocking::Response) -> Result<HttpReply, ApiError> {
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .map_err(|e| ApiError::Transport(format!("failed to read response body: {e}")))?;
    Ok(HttpReply { status, body })
}
