//! One user-initiated send, from input text to rendered reply
//!
//! The flow never touches a UI. Everything a presentation layer needs to
//! show (new messages, typing indicator, connection status) is emitted as a
//! [`ChatEvent`] through the caller's callback.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::gateway::{ProxyError, ProxyErrorKind, ReplySource};
use crate::payload::ReplyPayload;
use crate::render::{RenderedContent, render};

use super::message::Sender;
use super::session::ChatSession;

/// Events emitted while a message is being sent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was added to the session log
    MessageAppended {
        sender: Sender,
        markup: RenderedContent,
        time: DateTime<Utc>,
    },
    /// Waiting for the reply started
    TypingStarted,
    /// Waiting for the reply ended
    TypingStopped,
    /// The session's connection status flipped
    ConnectionChanged { connected: bool },
    /// The send failed; diagnostic detail, never shown as chat content
    SendFailed {
        kind: ProxyErrorKind,
        detail: String,
        upstream_status: Option<u16>,
    },
}

/// Result of a single send action
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The input was blank; nothing happened
    Skipped,
    /// The reply was rendered and logged
    Replied(RenderedContent),
    /// The send failed and the fallback message was logged
    Failed(ProxyError),
}

/// Drives a send through a [`ReplySource`] and records the result
#[derive(Clone)]
pub struct ChatFlow {
    source: Arc<dyn ReplySource>,
    fallback_message: String,
}

impl ChatFlow {
    pub fn new(source: Arc<dyn ReplySource>, fallback_message: impl Into<String>) -> Self {
        Self {
            source,
            fallback_message: fallback_message.into(),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Send `text` as the user of `session`, reporting progress to `on_event`
    pub async fn send<F>(
        &self,
        session: &mut ChatSession,
        text: &str,
        mut on_event: F,
    ) -> SendOutcome
    where
        F: FnMut(ChatEvent),
    {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Skipped;
        }

        append_literal(session, text, Sender::User, &mut on_event);

        on_event(ChatEvent::TypingStarted);
        let result = self.source.send(text, session.id()).await;
        on_event(ChatEvent::TypingStopped);

        match result {
            Ok(payload) => {
                debug!(source = self.source.name(), "Reply received");
                let markup = render(Sender::Bot, &payload);
                record(session, &payload, Sender::Bot, markup.clone(), &mut on_event);
                set_connected(session, true, &mut on_event);
                SendOutcome::Replied(markup)
            }
            Err(err) => {
                error!(
                    source = self.source.name(),
                    session_id = %session.id(),
                    kind = %err.kind(),
                    upstream_status = ?err.upstream_status(),
                    detail = err.detail(),
                    "Failed to get a reply"
                );
                on_event(ChatEvent::SendFailed {
                    kind: err.kind(),
                    detail: err.detail().to_string(),
                    upstream_status: err.upstream_status(),
                });
                append_literal(session, &self.fallback_message, Sender::Bot, &mut on_event);
                set_connected(session, false, &mut on_event);
                SendOutcome::Failed(err)
            }
        }
    }
}

/// Log text that is escaped but never formatted
fn append_literal<F: FnMut(ChatEvent)>(
    session: &mut ChatSession,
    text: &str,
    sender: Sender,
    on_event: &mut F,
) {
    let payload = ReplyPayload::from(text);
    let markup = render(Sender::User, &payload);
    record(session, &payload, sender, markup, on_event);
}

fn record<F: FnMut(ChatEvent)>(
    session: &mut ChatSession,
    payload: &ReplyPayload,
    sender: Sender,
    markup: RenderedContent,
    on_event: &mut F,
) {
    let time = session.record(payload.to_text(), sender).time();
    on_event(ChatEvent::MessageAppended {
        sender,
        markup,
        time,
    });
}

fn set_connected<F: FnMut(ChatEvent)>(
    session: &mut ChatSession,
    connected: bool,
    on_event: &mut F,
) {
    if session.set_connected(connected) {
        on_event(ChatEvent::ConnectionChanged { connected });
    }
}
