//! Test utilities for hookline - scripted transports and reply sources
//!
//! These stand in for the webhook and the proxy service so gateway, server
//! and chat flow tests run without any network.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::chat::SessionId;
use crate::gateway::{ChatEnvelope, ProxyError, ReplySource, TransportError, Upstream};
use crate::payload::ReplyPayload;

/// [`Upstream`] with a fixed probe result and a fixed reply.
/// Counts calls and remembers the last posted envelope.
#[derive(Debug)]
pub struct ScriptedUpstream {
    probe: Result<(), TransportError>,
    reply: Result<Bytes, TransportError>,
    probe_calls: AtomicUsize,
    post_calls: AtomicUsize,
    last_envelope: Mutex<Option<ChatEnvelope>>,
}

impl ScriptedUpstream {
    fn new(probe: Result<(), TransportError>, reply: Result<Bytes, TransportError>) -> Self {
        Self {
            probe,
            reply,
            probe_calls: AtomicUsize::new(0),
            post_calls: AtomicUsize::new(0),
            last_envelope: Mutex::new(None),
        }
    }

    /// Reachable upstream answering every post with `body`
    pub fn replying(body: impl Into<Bytes>) -> Self {
        Self::new(Ok(()), Ok(body.into()))
    }

    /// Reachable upstream whose post fails with `error`
    pub fn failing(error: TransportError) -> Self {
        Self::new(Ok(()), Err(error))
    }

    /// Upstream whose probe is refused
    pub fn unreachable() -> Self {
        Self::new(
            Err(TransportError::Connect("connection refused".to_string())),
            Ok(Bytes::new()),
        )
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn post_calls(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }

    pub fn last_envelope(&self) -> Option<ChatEnvelope> {
        self.last_envelope
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    async fn probe(&self) -> Result<(), TransportError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.probe.clone()
    }

    async fn post(&self, envelope: &ChatEnvelope) -> Result<Bytes, TransportError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_envelope.lock() {
            *last = Some(envelope.clone());
        }
        self.reply.clone()
    }

    fn endpoint(&self) -> &str {
        "scripted://webhook"
    }
}

/// [`ReplySource`] that plays back queued results in order.
/// Once the queue is drained every send fails as unreachable.
#[derive(Debug, Default)]
pub struct ScriptedReplySource {
    replies: Mutex<VecDeque<Result<ReplyPayload, ProxyError>>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl ScriptedReplySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn then_reply(self, payload: impl Into<ReplyPayload>) -> Self {
        self.push(Ok(payload.into()));
        self
    }

    /// Queue a failure
    pub fn then_fail(self, error: ProxyError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, result: Result<ReplyPayload, ProxyError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(result);
        }
    }

    /// `(text, session id)` pairs received so far
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReplySource for ScriptedReplySource {
    async fn send(&self, text: &str, session_id: &SessionId) -> Result<ReplyPayload, ProxyError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((text.to_string(), session_id.to_string()));
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(ProxyError::Unreachable("no scripted reply".to_string())))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
