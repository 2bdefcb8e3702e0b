//! Hookline daemon - HTTP proxy in front of a workflow chat webhook

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use hookline::config::Config;
use hookline::error::Result;
use hookline::gateway::ProxyGateway;
use hookline::proxy::ProxyServer;

/// Hookline - chat proxy for workflow webhooks
#[derive(Parser)]
#[command(name = "hookline")]
#[command(about = "A chat proxy that forwards messages to a workflow webhook")]
#[command(version)]
pub struct Cli {
    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the proxy server (default command)
    #[command(name = "serve")]
    Serve {
        /// Override the listen address
        #[arg(long)]
        listen: Option<String>,

        /// Override the webhook URL
        #[arg(long)]
        webhook: Option<String>,

        /// Skip the reachability probe before each webhook call
        #[arg(long)]
        no_probe: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        None => serve(cli.config, None, None, false).await,
        Some(Command::Serve {
            listen,
            webhook,
            no_probe,
        }) => serve(cli.config, listen, webhook, no_probe).await,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hookline=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(
    config_path: Option<PathBuf>,
    listen: Option<String>,
    webhook: Option<String>,
    no_probe: bool,
) -> Result<()> {
    tracing::info!("Starting Hookline proxy");

    let mut config = Config::load(config_path.as_deref())?;
    if let Some(listen) = listen {
        config.proxy.listen_addr = listen;
    }
    if let Some(webhook) = webhook {
        config.proxy.webhook_url = webhook;
    }
    if no_probe {
        config.proxy.probe_enabled = false;
    }
    tracing::debug!("Config loaded: {:?}", config);

    let gateway = ProxyGateway::from_config(&config.proxy)?;
    let proxy = ProxyServer::new(config.proxy.clone(), gateway);

    proxy.serve().await?;

    tracing::info!("Hookline proxy stopped");
    Ok(())
}
