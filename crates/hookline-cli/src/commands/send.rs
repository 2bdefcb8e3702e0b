use clap::Parser;
use serde_json::json;

use hookline::chat::{ChatEvent, SendOutcome, Sender};
use hookline::config::Config;

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct SendCommand {
    #[clap(help = "Message to send")]
    pub message: String,

    #[clap(long, short, help = "Session ID to send under (generated if omitted)")]
    pub session: Option<String>,
}

impl SendCommand {
    pub async fn execute(
        &self,
        config: &Config,
        direct: bool,
        format: OutputFormat,
    ) -> CliResult<()> {
        let (flow, mut session) = super::open_session(config, direct, self.session.as_deref())?;

        let mut events = Vec::new();
        let outcome = flow
            .send(&mut session, &self.message, |event| events.push(event))
            .await;

        match format {
            OutputFormat::Json => {
                let output = json!({
                    "session_id": session.id().as_str(),
                    "source": flow.source_name(),
                    "events": events,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                for event in &events {
                    match event {
                        ChatEvent::MessageAppended {
                            sender: Sender::Bot,
                            markup,
                            ..
                        } => println!("{markup}"),
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
                        _ => {}
                    }
                }
            }
        }

        match outcome {
            SendOutcome::Skipped => Err(CliError::from("Message is empty")),
            SendOutcome::Replied(_) => Ok(()),
            SendOutcome::Failed(e) => Err(CliError(e.to_string())),
        }
    }
}
