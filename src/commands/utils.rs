use crate::daemon::DaemonClient;
use crate::errors::WebpilotError;
use anyhow::Result;

/// Require daemon to be running for all operations (daemon-only architecture)
pub fn require_daemon() -> Result<()> {
    if !DaemonClient::is_daemon_running() {
        eprintln!("Error: The daemon is not running.");
        eprintln!("Start the daemon with: webpilot daemon start --browser chrome");
        eprintln!(
            "\nAll webpilot commands require the daemon; it owns the browser sessions and the latest page scan."
        );
        return Err(anyhow::anyhow!("Daemon not running"));
    }
    Ok(())
}

/// Turn a daemon `{kind, message}` failure into a client-side error that
/// keeps the exit-code mapping
pub fn daemon_error(kind: &str, message: &str) -> anyhow::Error {
    WebpilotError::from_wire(kind, message).into()
}
