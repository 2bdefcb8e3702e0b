mod server;

pub use server::{AppState, ProxyServer, create_router};
