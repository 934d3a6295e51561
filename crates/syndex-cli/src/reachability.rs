//! URL reachability check
//!
//! Bookmarks added from the command line are only saved when their URL
//! answers. Bookmarks posted to the server skip this check.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Reasons a URL is rejected
#[derive(Error, Debug)]
pub enum UrlCheckError {
    #[error("{url} is not a valid or accessible URL: {reason}")]
    Unreachable { url: String, reason: String },
}

/// Check that `url` answers a GET with a status below 400
///
/// Redirects are followed. Network errors and timeouts count as unreachable.
pub async fn check_url(url: &str, timeout: Duration) -> Result<(), UrlCheckError> {
    let unreachable = |reason: String| UrlCheckError::Unreachable {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("syndex/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| unreachable(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unreachable(e.to_string()))?;

    let status = response.status();
    debug!("{} answered {}", url, status);

    if status.is_client_error() || status.is_server_error() {
        return Err(unreachable(format!("HTTP {}", status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    /// Serve one request with the given status, returning the base URL
    fn one_shot_server(status: u16) -> (String, thread::JoinHandle<()>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();

        let handle = thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let response = tiny_http::Response::from_string("ok")
                    .with_status_code(tiny_http::StatusCode(status));
                let _ = request.respond(response);
            }
        });

        (format!("http://127.0.0.1:{}/", port), handle)
    }

    #[tokio::test]
    async fn test_reachable_url() {
        let (url, handle) = one_shot_server(200);
        check_url(&url, Duration::from_secs(5)).await.unwrap();
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_client_error_is_unreachable() {
        let (url, handle) = one_shot_server(404);
        let err = check_url(&url, Duration::from_secs(5)).await.unwrap_err();
        assert!(err.to_string().contains("not a valid or accessible URL"));
        assert!(err.to_string().contains("404"));
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_invalid_url_is_unreachable() {
        let err = check_url("not a url", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, UrlCheckError::Unreachable { .. }));
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{}/", port);
        assert!(check_url(&url, Duration::from_secs(2)).await.is_err());
    }
}
