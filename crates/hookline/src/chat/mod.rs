//! Chat session state and the send flow

pub mod flow;
pub mod message;
pub mod session;

pub use flow::{ChatEvent, ChatFlow, SendOutcome};
pub use message::{Message, MessageLog, Sender};
pub use session::{ChatSession, SessionId, SessionIdError};
