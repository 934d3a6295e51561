//! HTTP responses.

use anyhow::{anyhow, Result};
use tiny_http::{Header, Request, Response, StatusCode};

pub const PLAIN: &str = "text/plain; charset=utf-8";
pub const RSS: &str = "application/rss+xml";

/// Transport-independent response produced by the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Plain-text response
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: PLAIN,
            body: body.into().into_bytes(),
        }
    }

    /// The serialized feed
    pub fn rss(xml: String) -> Self {
        Self {
            status: 200,
            content_type: RSS,
            body: xml.into_bytes(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::text(400, message)
    }

    pub fn not_found() -> Self {
        Self::text(404, "Not found")
    }
}

/// Send a router response over a tiny_http request
pub fn respond(request: Request, response: HttpResponse) -> Result<()> {
    let header = make_header("Content-Type", response.content_type)?;
    let response = Response::from_data(response.body)
        .with_status_code(StatusCode(response.status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

fn make_header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| anyhow!("invalid header {}: {}", name, value))
}
