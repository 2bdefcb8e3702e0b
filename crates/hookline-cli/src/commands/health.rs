use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use hookline::config::Config;

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct HealthCommand {
    #[clap(long, help = "Health endpoint URL (derived from backend_url when omitted)")]
    pub url: Option<String>,

    #[clap(long, default_value = "5", help = "Request timeout in seconds")]
    pub timeout: u64,
}

impl HealthCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> CliResult<()> {
        let url = match &self.url {
            Some(url) => Url::parse(url).map_err(|e| CliError(format!("Invalid URL: {e}")))?,
            None => health_url(config.client.backend_url.as_deref())?,
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout))
            .build()?;
        let response = client.get(url.clone()).send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "url": url.as_str(),
                    "http_status": status.as_u16(),
                    "body": body,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Field", "Value"]);

                table.add_row(["URL", url.as_str()]);
                table.add_row(["HTTP status", &status.as_u16().to_string()]);
                if let Value::Object(fields) = &body {
                    for (key, value) in fields {
                        let value = match value {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        table.add_row([key.as_str(), &value]);
                    }
                }

                println!("{table}");
            }
        }

        if status.is_success() {
            Ok(())
        } else {
            Err(CliError(format!("Health check failed with status {status}")))
        }
    }
}

/// `/health` on the same host as the proxy's chat endpoint
fn health_url(backend_url: Option<&str>) -> CliResult<Url> {
    let backend = backend_url
        .ok_or_else(|| CliError::from("No backend_url configured; pass --url"))?;
    let backend =
        Url::parse(backend).map_err(|e| CliError(format!("Invalid backend URL: {e}")))?;
    backend
        .join("/health")
        .map_err(|e| CliError(format!("Invalid backend URL: {e}")))
}
