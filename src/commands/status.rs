use anyhow::Result;

use crate::daemon::{DaemonClient, DaemonRequest, DaemonResponse};

pub async fn handle_status() -> Result<()> {
    if !DaemonClient::is_daemon_running() {
        println!("Daemon is not running");
        println!("Start it with: webpilot daemon start");
        return Ok(());
    }

    match DaemonClient::send_request(DaemonRequest::ListSessions) {
        Ok(DaemonResponse::SessionList(sessions)) => {
            println!("Daemon is running");
            if sessions.is_empty() {
                println!("No sessions yet; run `webpilot scan <url>` to open one");
            } else {
                println!("\nSessions:");
                for session in sessions {
                    println!(
                        "  {}{}: {} ({} element(s), {}s old)",
                        session.name,
                        if session.active { " [active]" } else { "" },
                        session.url.as_deref().unwrap_or("about:blank"),
                        session.element_count,
                        session.age_seconds,
                    );
                }
            }
        }
        Ok(DaemonResponse::Error { message, .. }) => {
            eprintln!("Error getting status: {}", message);
        }
        Ok(_) => {
            eprintln!("Unexpected response from daemon");
        }
        Err(e) => {
            eprintln!("Error communicating with daemon: {}", e);
        }
    }
    Ok(())
}
