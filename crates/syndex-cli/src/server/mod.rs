//! Bookmark server.
//!
//! Serves one feed file over HTTP. Requests are handled one at a time on a
//! single loop, so load-mutate-save cycles never interleave.

mod response;
mod router;

pub use router::{HttpRequest, Method, Router};

use anyhow::{anyhow, Context, Result};
use std::future::Future;
use std::io;
use std::sync::Arc;
use syndex_core::DocumentStore;
use tiny_http::{Request, Server};
use tracing::{info, warn};

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    router: Router,
}

/// Bind the HTTP server without starting the request loop
pub fn bind(store: DocumentStore, host: &str, port: u16) -> Result<BoundServer> {
    let server = Server::http((host, port))
        .map_err(|e| anyhow!("Failed to bind {}:{}: {}", host, port, e))?;
    info!("Listening on http://{}:{}", host, port);

    Ok(BoundServer {
        server: Arc::new(server),
        router: Router::new(store),
    })
}

impl BoundServer {
    /// Serve until Ctrl+C
    pub async fn run(self) -> Result<()> {
        self.serve_until(tokio::signal::ctrl_c()).await
    }

    /// Serve until `shutdown` resolves
    ///
    /// The request loop is stopped even when `shutdown` fails.
    async fn serve_until(self, shutdown: impl Future<Output = io::Result<()>>) -> Result<()> {
        let server = Arc::clone(&self.server);
        let router = self.router;
        info!("Serving {:?}", router.store().path());
        let request_loop =
            tokio::task::spawn_blocking(move || run_request_loop(&server, &router));

        let signal = shutdown.await;
        info!("Shutting down");
        self.server.unblock();

        request_loop.await.context("Request loop panicked")?;
        signal.context("Failed to listen for Ctrl+C")
    }
}

/// Handle requests until the server is unblocked
fn run_request_loop(server: &Server, router: &Router) {
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, router) {
            warn!("request error: {:#}", e);
        }
    }
}

/// Handle a single HTTP request
fn handle_request(mut request: Request, router: &Router) -> Result<()> {
    let method = match request.method() {
        tiny_http::Method::Get => Method::Get,
        tiny_http::Method::Post => Method::Post,
        _ => Method::Other,
    };

    let mut body = Vec::new();
    request
        .as_reader()
        .read_to_end(&mut body)
        .context("Failed to read request body")?;

    let http_request = HttpRequest::new(method, request.url(), body);
    let response = router.handle(&http_request);
    info!(
        "{} {} -> {}",
        request.method(),
        http_request.url,
        response.status
    );

    response::respond(request, response)
}
