pub mod chat;
pub mod health;
pub mod render;
pub mod send;

pub use chat::ChatCommand;
pub use health::HealthCommand;
pub use render::RenderCommand;
pub use send::SendCommand;

use std::sync::Arc;

use hookline::chat::{ChatFlow, ChatSession, SessionId};
use hookline::config::Config;
use hookline::gateway::{BackendClient, ProxyGateway, ReplySource};

use crate::error::CliResult;

/// Pick where messages go: the webhook itself with `direct`, otherwise the
/// configured proxy service.
pub fn reply_source(config: &Config, direct: bool) -> CliResult<Arc<dyn ReplySource>> {
    if direct || config.client.backend_url.is_none() {
        tracing::debug!("Sending directly to {}", config.proxy.webhook_url);
        Ok(Arc::new(ProxyGateway::from_config(&config.proxy)?))
    } else {
        let client = BackendClient::from_config(config)?;
        tracing::debug!("Sending via proxy at {}", client.url());
        Ok(Arc::new(client))
    }
}

/// Build the chat flow and a session for one CLI invocation
pub fn open_session(
    config: &Config,
    direct: bool,
    session_id: Option<&str>,
) -> CliResult<(ChatFlow, ChatSession)> {
    let flow = ChatFlow::new(
        reply_source(config, direct)?,
        config.client.fallback_message.clone(),
    );
    let id = match session_id {
        Some(id) => SessionId::try_from(id)?,
        None => SessionId::generate(&config.client.session_prefix)?,
    };
    Ok((flow, ChatSession::new(id)))
}
