//! Hookline - chat front end and proxy for workflow webhooks
//!
//! This crate provides a small proxy service that forwards chat messages to
//! a workflow webhook, plus the pieces a chat client needs: session state,
//! the send flow, and safe HTML rendering of untyped replies.

pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod payload;
pub mod proxy;
pub mod render;
pub mod testing;

pub use error::HooklineError;
