//! Client for the hookline proxy service's chat endpoint

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::chat::SessionId;
use crate::config::Config;
use crate::error::{HooklineError, Result};
use crate::payload::ReplyPayload;

use super::envelope::ChatEnvelope;
use super::error::{ProxyError, TransportError};
use super::ReplySource;

/// Sends chat messages through a running hookline proxy
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    url: Url,
    empty_reply: String,
}

impl BackendClient {
    pub fn new(url: &str, timeout: Duration, empty_reply: impl Into<String>) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| HooklineError::Config(format!("Invalid backend URL '{url}': {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HooklineError::Proxy(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            empty_reply: empty_reply.into(),
        })
    }

    /// Build a client for `client.backend_url`
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.client.backend_url.as_deref().ok_or_else(|| {
            HooklineError::Config("No backend_url configured for the chat client".to_string())
        })?;
        Self::new(
            url,
            Duration::from_secs(config.client.timeout_secs),
            config.proxy.empty_reply.clone(),
        )
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ReplySource for BackendClient {
    async fn send(
        &self,
        text: &str,
        session_id: &SessionId,
    ) -> std::result::Result<ReplyPayload, ProxyError> {
        let envelope = ChatEnvelope::new(text, session_id.as_str());
        debug!("Sending chat message via backend {}", self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&envelope)
            .send()
            .await
            .map_err(|e| ProxyError::from(TransportError::from_reqwest(&e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::from(TransportError::from_reqwest(&e)))?;

        if !status.is_success() {
            return Err(ProxyError::from_response(status.as_u16(), &body));
        }

        Ok(ReplyPayload::from_body(&body, &self.empty_reply))
    }

    fn name(&self) -> &'static str {
        "backend"
    }
}
