use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use crate::daemon::{DaemonClient, DaemonRequest, DaemonResponse};
use crate::types::OutputFormat;

use super::utils::{self, require_daemon};

pub async fn handle_scan(
    url: Option<String>,
    tab: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    require_daemon()?;

    if let Some(url) = &url {
        url::Url::parse(url).context(format!("Invalid URL: {}", url))?;
        info!("Scanning {}", url);
    } else {
        info!("Re-scanning current page");
    }

    let request = DaemonRequest::Scan { tab, url };

    match DaemonClient::send_request(request)? {
        DaemonResponse::Scanned { count } => {
            match format {
                OutputFormat::Json => println!("{}", json!({ "scanned": count })),
                OutputFormat::Simple => println!("Scanned {} interactive element(s)", count),
            }
            Ok(())
        }
        DaemonResponse::Error { kind, message } => Err(utils::daemon_error(&kind, &message)),
        _ => Err(anyhow::anyhow!("Unexpected daemon response")),
    }
}
