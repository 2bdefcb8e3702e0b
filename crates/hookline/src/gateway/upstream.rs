//! Transport to the workflow webhook

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use std::fmt::Display;
use tracing::{debug, warn};
use url::Url;

use crate::config::ProxyConfig;
use crate::error::{HooklineError, Result};

use super::envelope::ChatEnvelope;
use super::error::TransportError;

/// Outbound calls the gateway makes to the upstream service
///
/// Implementations only report what happened on the wire; deciding which
/// [`super::ProxyError`] that maps to is the gateway's job.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Cheap reachability check, run before the real call
    async fn probe(&self) -> std::result::Result<(), TransportError>;

    /// Post an envelope to the webhook and return the raw success body
    async fn post(&self, envelope: &ChatEnvelope) -> std::result::Result<Bytes, TransportError>;

    /// Target URL for logging
    fn endpoint(&self) -> &str;
}

/// reqwest-backed webhook transport
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    webhook_url: Url,
    probe_url: Url,
    timeout: Duration,
    probe_timeout: Duration,
}

impl HttpUpstream {
    /// Build a transport from the proxy configuration
    ///
    /// The probe targets `probe_url` when set, otherwise the webhook's origin.
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let webhook_url = Url::parse(&config.webhook_url).map_err(|e| {
            HooklineError::Config(format!("Invalid webhook URL '{}': {e}", config.webhook_url))
        })?;

        let probe_url = match &config.probe_url {
            Some(url) => Url::parse(url)
                .map_err(|e| HooklineError::Config(format!("Invalid probe URL '{url}': {e}")))?,
            None => webhook_url
                .join("/")
                .map_err(|e| HooklineError::Config(format!("Invalid webhook origin: {e}")))?,
        };

        let client = Client::builder()
            .build()
            .map_err(|e| HooklineError::Proxy(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            webhook_url,
            probe_url,
            timeout: Duration::from_secs(config.timeout_secs),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        })
    }

    pub fn webhook_url(&self) -> &Url {
        &self.webhook_url
    }

    pub fn probe_url(&self) -> &Url {
        &self.probe_url
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn probe(&self) -> std::result::Result<(), TransportError> {
        debug!("Probing upstream at {}", self.probe_url);

        // Any HTTP answer proves the host is up; only transport failures count.
        self.client
            .get(self.probe_url.clone())
            .timeout(self.probe_timeout)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| TransportError::from_reqwest(&e))
    }

    async fn post(&self, envelope: &ChatEnvelope) -> std::result::Result<Bytes, TransportError> {
        debug!("Posting envelope to {}", self.webhook_url);

        let response = self
            .client
            .post(self.webhook_url.clone())
            .timeout(self.timeout)
            .json(envelope)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(status.as_u16(), response.text().await);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))
    }

    fn endpoint(&self) -> &str {
        self.webhook_url.as_str()
    }
}

/// Body text for a non-2xx answer; a failed read is logged and noted in the body
fn error_body<E: Display>(status: u16, read: std::result::Result<String, E>) -> String {
    match read {
        Ok(body) => body,
        Err(e) => {
            warn!(status, "Failed to read upstream error body: {e}");
            format!("<unreadable response body: {e}>")
        }
    }
}
