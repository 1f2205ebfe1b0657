use anyhow::Result;

use crate::daemon::{DaemonClient, DaemonRequest, DaemonResponse};

use super::utils::{self, require_daemon};

pub async fn handle_close(tab: Option<String>) -> Result<()> {
    require_daemon()?;

    let request = DaemonRequest::CloseSession { name: tab };

    match DaemonClient::send_request(request)? {
        DaemonResponse::Success(msg) => {
            println!("{}", msg);
            Ok(())
        }
        DaemonResponse::Error { kind, message } => Err(utils::daemon_error(&kind, &message)),
        _ => Err(anyhow::anyhow!("Unexpected daemon response")),
    }
}
