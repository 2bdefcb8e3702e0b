use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use tokio::io::{AsyncBufReadExt, BufReader};

use hookline::chat::{ChatEvent, ChatSession, Sender};
use hookline::config::Config;

use crate::error::CliResult;
use crate::output::{OutputFormat, format_timestamp, truncate_string};

const QUIT_COMMANDS: &[&str] = &["/quit", "/exit"];

#[derive(Parser)]
pub struct ChatCommand {
    #[clap(long, short, help = "Session ID to chat under (generated if omitted)")]
    pub session: Option<String>,

    #[clap(long, help = "Skip the transcript summary on exit")]
    pub no_transcript: bool,
}

impl ChatCommand {
    pub async fn execute(
        &self,
        config: &Config,
        direct: bool,
        format: OutputFormat,
    ) -> CliResult<()> {
        let (flow, mut session) = super::open_session(config, direct, self.session.as_deref())?;

        if let OutputFormat::Table = format {
            println!(
                "Chatting as {} via {} (type /quit to leave)",
                session.id(),
                flow.source_name()
            );
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if QUIT_COMMANDS.contains(&line.trim()) {
                break;
            }

            flow.send(&mut session, &line, |event| print_event(&event, format)).await;
        }

        if !self.no_transcript {
            print_transcript(&session, format)?;
        }

        Ok(())
    }
}

fn print_event(event: &ChatEvent, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!("Failed to serialize chat event: {e}"),
        },
        OutputFormat::Table => match event {
            ChatEvent::MessageAppended {
                sender: Sender::Bot,
                markup,
                ..
            } => println!("bot> {markup}"),
            ChatEvent::MessageAppended { .. } => {}
            ChatEvent::TypingStarted => println!("..."),
            ChatEvent::TypingStopped => {}
            ChatEvent::ConnectionChanged { connected: true } => println!("[connected]"),
            ChatEvent::ConnectionChanged { connected: false } => println!("[disconnected]"),
            ChatEvent::SendFailed {
                kind,
                detail,
                upstream_status,
            } => {
                let status = upstream_status
                    .map(|s| format!(" (status {s})"))
                    .unwrap_or_default();
                eprintln!("[{kind}{status}] {detail}");
            }
        },
    }
}

fn print_transcript(session: &ChatSession, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "session_id": session.id().as_str(),
                "connected": session.is_connected(),
                "messages": session.messages(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            if session.messages().is_empty() {
                println!("No messages.");
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL_CONDENSED)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(["Time", "Sender", "Message"]);

            for message in session.messages() {
                table.add_row([
                    format_timestamp(&message.time()),
                    message.sender().to_string(),
                    truncate_string(message.text(), 60),
                ]);
            }

            println!("\n{table}");
            println!("Session {}: {} messages", session.id(), session.messages().len());
        }
    }

    Ok(())
}
