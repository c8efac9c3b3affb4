//! Remote verifier client.

use crate::ports::{HttpTransport, RestCallback};
use std::sync::Arc;
use tracing::info;

/// Builds whitelist lookup URLs and hands them to the transport.
#[derive(Clone)]
pub struct RemoteVerifierClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl RemoteVerifierClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Whitelist endpoint, e.g. `http://wl.example/api/whitelist/armaId`
    /// * `transport` - Non-blocking GET implementation
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lookup URL for a normalized identity: `{base}/{identity}`.
    pub fn url_for(&self, identity: &str) -> String {
        format!("{}/{}", self.base_url, identity)
    }

    /// Issue the lookup. Returns immediately; the result arrives on `callback`.
    pub fn verify(&self, identity: &str, callback: Arc<dyn RestCallback>) {
        let url = self.url_for(identity);
        info!(url = %url, "GET whitelist");
        self.transport.get(&url, callback);
    }
}

impl std::fmt::Debug for RemoteVerifierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteVerifierClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct UrlRecorder {
        urls: Mutex<Vec<String>>,
    }

    impl HttpTransport for UrlRecorder {
        fn get(&self, url: &str, _callback: Arc<dyn RestCallback>) {
            self.urls.lock().unwrap().push(url.to_string());
        }
    }

    struct Silent;

    impl RestCallback for Silent {
        fn on_success(&self, _body: &str, _size: usize) {}
        fn on_error(&self, _code: u16) {}
        fn on_timeout(&self) {}
    }

    #[test]
    fn test_url_for() {
        let client =
            RemoteVerifierClient::new("http://wl.example/api", Arc::new(UrlRecorder::default()));
        assert_eq!(client.url_for("abc123"), "http://wl.example/api/abc123");
        assert_eq!(client.base_url(), "http://wl.example/api");
    }

    #[test]
    fn test_verify_dispatches_to_transport() {
        let transport = Arc::new(UrlRecorder::default());
        let client = RemoteVerifierClient::new("http://wl.example/api", transport.clone());

        client.verify("abc123", Arc::new(Silent));
        client.verify("def456", Arc::new(Silent));

        let urls = transport.urls.lock().unwrap().clone();
        assert_eq!(
            urls,
            vec![
                "http://wl.example/api/abc123".to_string(),
                "http://wl.example/api/def456".to_string()
            ]
        );
    }
}
