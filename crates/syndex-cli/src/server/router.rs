//! Request routing.
//!
//! Maps the fixed routes onto the document store and editor. The router
//! owns no socket so it can be driven directly from tests.

use serde::Deserialize;
use syndex_core::editor::{self, EditTarget};
use syndex_core::{xml, DocumentStore, SyndexError};
use tracing::{debug, error, warn};

use super::response::HttpResponse;

const INVALID_XML: &str = "Invalid XML data";
const INVALID_JSON: &str = "Invalid JSON data";

/// HTTP methods the router distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

/// Transport-independent request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Request target, possibly with a query string
    pub url: String,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Path without query string
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }
}

/// Body of `POST /edit`
#[derive(Debug, Deserialize)]
struct EditRequest {
    field: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
}

/// Body of `POST /edit-channel`
#[derive(Debug, Deserialize)]
struct ChannelEditRequest {
    #[serde(default)]
    value: Option<String>,
}

/// Dispatches requests for one feed file
pub struct Router {
    store: DocumentStore,
}

impl Router {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Handle one request; never fails, errors become responses
    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        match (request.method, request.path()) {
            (Method::Post, "/submit") => self.submit(&request.body),
            (Method::Post, "/edit") => self.edit(&request.body),
            (Method::Post, "/edit-channel") => self.edit_channel(&request.body),
            (Method::Get, "/rss") => self.rss(),
            _ => HttpResponse::not_found(),
        }
    }

    /// `POST /submit`: add the `<link>` of an `<item>` fragment
    fn submit(&self, body: &[u8]) -> HttpResponse {
        let Some(link) = parse_submitted_link(body) else {
            return HttpResponse::bad_request(INVALID_XML);
        };

        let result = self.store.load().and_then(|mut doc| {
            editor::insert_bookmark(&mut doc, &link, None, None);
            self.store.save(&doc)
        });

        match result {
            Ok(()) => HttpResponse::text(200, "Bookmark added successfully"),
            Err(e) => server_error(e),
        }
    }

    /// `POST /edit`: edit an item field or the channel title
    fn edit(&self, body: &[u8]) -> HttpResponse {
        let request: EditRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected edit body: {}", e);
                return HttpResponse::bad_request(INVALID_JSON);
            }
        };

        let target = match request.field.parse::<EditTarget>() {
            Ok(target) => target,
            Err(e) => {
                // Names that cannot be an element are accepted and ignored
                debug!("Ignoring edit: {}", e);
                return HttpResponse::text(200, "Item edited successfully");
            }
        };

        self.apply(
            target,
            request.pub_date.as_deref(),
            request.value.as_deref(),
            "Item edited successfully",
        )
    }

    /// `POST /edit-channel`: shorthand for an edit of `channel_title`
    fn edit_channel(&self, body: &[u8]) -> HttpResponse {
        let request: ChannelEditRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected edit-channel body: {}", e);
                return HttpResponse::bad_request(INVALID_JSON);
            }
        };

        self.apply(
            EditTarget::ChannelTitle,
            None,
            request.value.as_deref(),
            "Channel title updated successfully",
        )
    }

    fn apply(
        &self,
        target: EditTarget,
        pub_date: Option<&str>,
        value: Option<&str>,
        confirmation: &str,
    ) -> HttpResponse {
        let result = self.store.load().and_then(|mut doc| {
            if editor::apply_edit(&mut doc, target, pub_date, value) {
                self.store.save(&doc)?;
            }
            Ok(())
        });

        match result {
            Ok(()) => HttpResponse::text(200, confirmation),
            Err(e) => server_error(e),
        }
    }

    /// `GET /rss`: the whole feed
    fn rss(&self) -> HttpResponse {
        let rendered = self
            .store
            .load()
            .and_then(|doc| self.store.render(&doc));

        match rendered {
            Ok(xml) => HttpResponse::rss(xml),
            Err(e) => server_error(e),
        }
    }
}

/// Extract a non-empty `<link>` from a submitted item
fn parse_submitted_link(body: &[u8]) -> Option<String> {
    let body = std::str::from_utf8(body).ok()?;
    let item = match xml::parse(body) {
        Ok(item) => item,
        Err(e) => {
            debug!("Rejected submit body: {}", e);
            return None;
        }
    };

    let link = item.child("link")?.text();
    let link = link.trim();
    (!link.is_empty()).then(|| link.to_string())
}

fn server_error(e: SyndexError) -> HttpResponse {
    if e.is_corrupt_document() {
        warn!("Feed needs fixing by hand: {}", e);
    } else {
        error!("{}", e);
    }
    HttpResponse::text(500, format!("Error: {}", e))
}
