//! reqwest-backed implementation of the gate transport.

use crate::error::{TransportError, TransportResult};
use admission_gate::{HttpTransport, RestCallback};
use reqwest::header::ACCEPT;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Non-blocking GET over reqwest.
///
/// `get` spawns the request on the given Tokio runtime and returns at once.
/// The request timeout covers the whole exchange including the body, so a stalled
/// server always ends in `on_timeout`.
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    request_timeout: Duration,
    runtime: tokio::runtime::Handle,
}

impl ReqwestTransport {
    /// Create a new transport.
    ///
    /// # Arguments
    /// * `request_timeout` - Time budget for one lookup
    /// * `runtime` - Tokio runtime handle the requests are spawned on
    pub fn new(request_timeout: Duration, runtime: tokio::runtime::Handle) -> TransportResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("whitelist-gate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            http_client,
            request_timeout,
            runtime,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Perform the GET and return the body of a 2xx response.
    async fn fetch(client: &reqwest::Client, url: &str) -> TransportResult<String> {
        let response = client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(TransportError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.text().await.map_err(TransportError::from_request)
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, callback: Arc<dyn RestCallback>) {
        let client = self.http_client.clone();
        let url = url.to_string();

        self.runtime.spawn(async move {
            match Self::fetch(&client, &url).await {
                Ok(body) => {
                    debug!(url = %url, size = body.len(), "Whitelist GET succeeded");
                    callback.on_success(&body, body.len());
                }
                Err(TransportError::Timeout) => {
                    debug!(url = %url, "Whitelist GET timed out");
                    callback.on_timeout();
                }
                Err(err) => {
                    warn!(url = %url, error = %err, "Whitelist GET failed");
                    callback.on_error(err.code());
                }
            }
        });
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
