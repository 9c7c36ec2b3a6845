//! BigBoat dashboard HTTP transport.
//!
//! Implements the [`dashboard::Transport`] port with `reqwest`. One call to
//! [`Transport::send`] is one HTTP round trip: there is no retry, no
//! redirect-following beyond reqwest's defaults, and no caching.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** TLS, connection pooling, and timeouts live here. The
//! drivers see only [`HttpRequest`] and [`HttpResponse`].
//!
//! ## Error mapping
//!
//! | reqwest failure | [`TransportError`] |
//! |-----------------|--------------------|
//! | connect (DNS, refused, reset) | `Connect` |
//! | timeout | `Timeout` |
//! | anything else | `Request` |
//!
//! Any response that arrives, whatever its status, is returned as `Ok`.

use std::time::Duration;

use async_trait::async_trait;
use dashboard::{DashboardError, HttpRequest, HttpResponse, Method, Transport, TransportError};
use tracing::debug;

/// Timeout applied by [`ReqwestTransport::default_timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bigboat-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::Configuration {
                message: format!("could not build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Creates a transport with [`DEFAULT_TIMEOUT`].
    pub fn default_timeout() -> Result<Self, DashboardError> {
        Self::new(DEFAULT_TIMEOUT)
    }

    /// Wraps an existing client, keeping its configuration.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(reqwest_method(method), url.as_str());
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| classify(&url, &e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response.text().await.map_err(|e| classify(&url, &e))?;

        debug!(%method, %url, status, bytes = body.len(), "dashboard request completed");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn classify(url: &str, err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_owned(),
        }
    } else if err.is_connect() {
        TransportError::Connect {
            url: url.to_owned(),
            message: err.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_owned(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn returns_non_success_responses() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/state/qux")
            .with_status(404)
            .with_header("content-type", "text/plain")
            .with_body("not found")
            .create_async()
            .await;

        let transport = ReqwestTransport::default_timeout().unwrap();
        let response = transport
            .send(HttpRequest::get(format!("{}/api/v1/state/qux", server.url())))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "not found");
        assert!(response.is_plain_text());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn sends_headers_and_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v2/apps/nginx/latest")
            .match_header("api-key", "my-api-key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::JsonString(r#"{"a":1}"#.to_owned()))
            .with_status(201)
            .create_async()
            .await;

        let transport = ReqwestTransport::default_timeout().unwrap();
        let response = transport
            .send(
                HttpRequest::put(format!("{}/api/v2/apps/nginx/latest", server.url()))
                    .header("api-key", "my-api-key")
                    .json_body(&serde_json::json!({ "a": 1 })),
            )
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_a_connect_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let err = transport
            .send(HttpRequest::get("http://127.0.0.1:1/api/v1/instances"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Connect { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn invalid_url_is_a_request_error() {
        let transport = ReqwestTransport::default_timeout().unwrap();
        let err = transport
            .send(HttpRequest::get("not a url"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Request { .. }), "{err:?}");
    }
}
