use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hookline::config::Config;
use hookline_cli::commands::{ChatCommand, HealthCommand, RenderCommand, SendCommand};
use hookline_cli::error::CliResult;
use hookline_cli::output::OutputFormat;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hookline-cli")]
#[command(about = "Hookline CLI - Terminal chat client for workflow webhooks")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short = 'c', global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(
        long,
        global = true,
        help = "Call the webhook directly instead of going through the proxy"
    )]
    pub direct: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Send one message and print the rendered reply")]
    Send(SendCommand),

    #[clap(about = "Interactive chat session")]
    Chat(ChatCommand),

    #[clap(about = "Render a reply body as HTML")]
    Render(RenderCommand),

    #[clap(about = "Check the proxy's health endpoint")]
    Health(HealthCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    match &cli.command {
        Command::Render(cmd) => cmd.execute(format),
        Command::Send(cmd) => {
            let config = Config::load(cli.config.as_deref())?;
            cmd.execute(&config, cli.direct, format).await
        }
        Command::Chat(cmd) => {
            let config = Config::load(cli.config.as_deref())?;
            cmd.execute(&config, cli.direct, format).await
        }
        Command::Health(cmd) => {
            let config = Config::load(cli.config.as_deref())?;
            cmd.execute(&config, format).await
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
