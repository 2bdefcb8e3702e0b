//! Gateway to the upstream workflow service
//!
//! [`ProxyGateway`] owns the outbound webhook call. It optionally probes the
//! upstream first so a stopped service fails fast as `Unreachable` instead
//! of waiting out the full request timeout.

mod backend;
mod envelope;
mod error;
mod upstream;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::chat::SessionId;
use crate::config::ProxyConfig;
use crate::error::Result;
use crate::payload::ReplyPayload;

pub use backend::BackendClient;
pub use envelope::ChatEnvelope;
pub use error::{ProxyError, ProxyErrorKind, TransportError};
pub use upstream::{HttpUpstream, Upstream};

/// Anything that can answer a chat message
#[async_trait]
pub trait ReplySource: Send + Sync {
    /// Send one user message and wait for the reply
    async fn send(
        &self,
        text: &str,
        session_id: &SessionId,
    ) -> std::result::Result<ReplyPayload, ProxyError>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Sends chat envelopes to the webhook and classifies failures
#[derive(Clone)]
pub struct ProxyGateway {
    upstream: Arc<dyn Upstream>,
    probe_enabled: bool,
    empty_reply: String,
}

impl ProxyGateway {
    /// Create a gateway over an arbitrary transport
    pub fn new(upstream: Arc<dyn Upstream>, config: &ProxyConfig) -> Self {
        Self {
            upstream,
            probe_enabled: config.probe_enabled,
            empty_reply: config.empty_reply.clone(),
        }
    }

    /// Create a gateway that talks HTTP to the configured webhook
    pub fn from_config(config: &ProxyConfig) -> Result<Self> {
        let upstream = HttpUpstream::new(config)?;
        Ok(Self::new(Arc::new(upstream), config))
    }

    /// Build an envelope for `text` and forward it
    pub async fn send(
        &self,
        text: &str,
        session_id: &str,
    ) -> std::result::Result<ReplyPayload, ProxyError> {
        let envelope = ChatEnvelope::new(text, session_id);
        self.forward(&envelope).await
    }

    /// Forward an already-built envelope to the webhook
    pub async fn forward(
        &self,
        envelope: &ChatEnvelope,
    ) -> std::result::Result<ReplyPayload, ProxyError> {
        if self.probe_enabled {
            if let Err(e) = self.upstream.probe().await {
                warn!(
                    endpoint = self.upstream.endpoint(),
                    error = %e,
                    "Upstream probe failed, not sending request"
                );
                return Err(ProxyError::Unreachable(e.to_string()));
            }
            debug!("Upstream is reachable");
        }

        let body = self.upstream.post(envelope).await.map_err(|e| {
            let err = ProxyError::from(e);
            warn!(
                endpoint = self.upstream.endpoint(),
                kind = %err.kind(),
                upstream_status = ?err.upstream_status(),
                "Webhook call failed"
            );
            err
        })?;

        debug!(bytes = body.len(), "Webhook reply received");
        Ok(ReplyPayload::from_body(&body, &self.empty_reply))
    }
}

#[async_trait]
impl ReplySource for ProxyGateway {
    async fn send(
        &self,
        text: &str,
        session_id: &SessionId,
    ) -> std::result::Result<ReplyPayload, ProxyError> {
        ProxyGateway::send(self, text, session_id.as_str()).await
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}
