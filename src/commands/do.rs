use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use crate::daemon::{DaemonClient, DaemonRequest, DaemonResponse};
use crate::types::OutputFormat;

use super::utils::{self, require_daemon};

pub async fn handle_do(
    query: String,
    url: Option<String>,
    tab: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    require_daemon()?;

    // A fresh page gets a fresh scan before the query runs against it
    if let Some(url) = url {
        url::Url::parse(&url).context(format!("Invalid URL: {}", url))?;
        let request = DaemonRequest::Scan {
            tab: tab.clone(),
            url: Some(url),
        };
        match DaemonClient::send_request(request)? {
            DaemonResponse::Scanned { count } => {
                info!("Scanned {} interactive element(s)", count);
            }
            DaemonResponse::Error { kind, message } => {
                return Err(utils::daemon_error(&kind, &message));
            }
            _ => return Err(anyhow::anyhow!("Unexpected daemon response")),
        }
    }

    info!("Running query: {:?}", query);

    let request = DaemonRequest::Query { tab, query };

    match DaemonClient::send_request(request)? {
        DaemonResponse::QueryOutcome { plan, execution } => {
            match format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        json!({ "plan": plan, "execution": execution })
                    );
                }
                OutputFormat::Simple => {
                    let mut status =
                        format!("Action: {}, Target ID: {}", plan.action, plan.target_id);
                    if let Some(value) = &plan.value {
                        status.push_str(&format!(", Value: {}", value));
                    }
                    println!("{}", status);
                    println!("{}", execution.message);
                }
            }
            Ok(())
        }
        DaemonResponse::Error { kind, message } => Err(utils::daemon_error(&kind, &message)),
        _ => Err(anyhow::anyhow!("Unexpected daemon response")),
    }
}
