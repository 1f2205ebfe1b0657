use anyhow::Result;

use crate::daemon::{DaemonClient, DaemonRequest, DaemonResponse};
use crate::types::OutputFormat;

use super::utils::{self, require_daemon};

pub async fn handle_elements(tab: Option<String>, format: OutputFormat) -> Result<()> {
    require_daemon()?;

    let request = DaemonRequest::Elements { tab };

    match DaemonClient::send_request(request)? {
        DaemonResponse::Elements(elements) => {
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&elements)?);
                }
                OutputFormat::Simple => {
                    if elements.is_empty() {
                        println!("No elements stored; scan a page first");
                    }
                    for el in elements {
                        let label = if el.text.is_empty() {
                            el.attributes
                                .aria_label
                                .clone()
                                .or_else(|| el.attributes.placeholder.clone())
                                .unwrap_or_default()
                        } else {
                            el.text.clone()
                        };
                        println!(
                            "{}\t{}\t{:?}{}",
                            el.id,
                            el.tag,
                            label,
                            if el.is_visible { "" } else { "\t(offscreen)" }
                        );
                    }
                }
            }
            Ok(())
        }
        DaemonResponse::Error { kind, message } => Err(utils::daemon_error(&kind, &message)),
        _ => Err(anyhow::anyhow!("Unexpected daemon response")),
    }
}
