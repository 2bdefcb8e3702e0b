use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

use hookline::chat::Sender;
use hookline::payload::ReplyPayload;
use hookline::render::{RenderedContent, render};

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct RenderCommand {
    #[clap(help = "Reply text to render (reads stdin when omitted)")]
    pub text: Option<String>,

    #[clap(long, short, help = "Read the reply from a file", conflicts_with = "text")]
    pub file: Option<PathBuf>,

    #[clap(long, help = "Render as a user message (escaped, never formatted)")]
    pub user: bool,
}

impl RenderCommand {
    pub fn execute(&self, format: OutputFormat) -> CliResult<()> {
        let input = self.read_input()?;
        let sender = if self.user { Sender::User } else { Sender::Bot };
        let markup = render_input(&input, sender);

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "sender": sender,
                    "markup": markup,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => println!("{markup}"),
        }

        Ok(())
    }

    fn read_input(&self) -> CliResult<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        if let Some(path) = &self.file {
            return std::fs::read_to_string(path).map_err(|e| {
                CliError(format!("Failed to read {}: {e}", path.display()))
            });
        }

        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    }
}

/// Render raw input the way a webhook reply with that body would render
fn render_input(input: &str, sender: Sender) -> RenderedContent {
    let payload = ReplyPayload::from(input.trim_end_matches(['\n', '\r']));
    render(sender, &payload)
}
