use anyhow::{Context, Result};
use interprocess::local_socket::{
    GenericFilePath, Listener, ListenerOptions, Name, Stream, ToFsName,
    traits::{ListenerExt, Stream as StreamTrait},
};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::errors::WebpilotError;
use crate::session::{DEFAULT_SESSION, GLOBAL_SESSION_MANAGER, SessionInfo};
use crate::types::{ActionPlan, ElementDescriptor, ExecutionOutcome};
use crate::webdriver::BrowserType;
use crate::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;
use crate::{executor, resolver, scanner};

/// Daemon that runs in the background and maintains page sessions
///
/// Plays the original background-script role: it owns the latest element
/// scan per session, resolves queries against it, and dispatches actions
/// into the page.
pub struct Daemon {
    browser_type: BrowserType,
    headless: bool,
}

/// Messages that can be sent to the daemon
#[derive(Debug, Serialize, Deserialize)]
pub enum DaemonRequest {
    /// Navigate (optionally) and re-scan the page; replaces the stored list
    Scan {
        tab: Option<String>,
        url: Option<String>,
    },
    /// Resolve a free-text instruction and execute the plan
    Query {
        tab: Option<String>,
        query: String,
    },
    /// Return the stored element list for inspection
    Elements { tab: Option<String> },
    /// List sessions
    ListSessions,
    /// Close a session (the active one when no name is given)
    CloseSession { name: Option<String> },
    /// Daemon control
    Ping,
    Shutdown,
}

/// Responses from the daemon
#[derive(Debug, Serialize, Deserialize)]
pub enum DaemonResponse {
    Success(String),
    /// Recoverable failure; `kind` keeps the error category across the wire
    Error { kind: String, message: String },
    Scanned { count: usize },
    Elements(Vec<ElementDescriptor>),
    QueryOutcome {
        plan: ActionPlan,
        execution: ExecutionOutcome,
    },
    SessionList(Vec<SessionInfo>),
    Pong,
}

/// Request wrapper carrying a correlation ID the daemon echoes back
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub id: String,
    pub request: DaemonRequest,
}

/// Response wrapper; `id` matches the request that produced it
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub id: String,
    pub response: DaemonResponse,
}

impl DaemonResponse {
    fn from_error(err: &WebpilotError) -> Self {
        DaemonResponse::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl Daemon {
    pub fn new(browser_type: BrowserType, headless: bool) -> Result<Self> {
        Ok(Self {
            browser_type,
            headless,
        })
    }

    fn get_socket_path() -> Result<PathBuf> {
        let runtime_dir = dirs::runtime_dir()
            .or_else(dirs::cache_dir)
            .or_else(|| std::env::temp_dir().into())
            .context("Could not determine runtime directory")?;

        Ok(runtime_dir.join("webpilot-daemon.sock"))
    }

    fn get_socket_name() -> Result<Name<'static>> {
        let socket_path = Self::get_socket_path()?;
        let path_string = socket_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Socket path is not valid UTF-8"))?
            .to_owned();
        // Leak the string to get 'static lifetime - this is ok since we only create one daemon
        let path_str: &'static str = Box::leak(path_string.into_boxed_str());
        Ok(path_str.to_fs_name::<GenericFilePath>()?)
    }

    pub fn is_running() -> bool {
        if let Ok(name) = Self::get_socket_name() {
            // Just check if we can connect - don't send data to avoid EOF errors
            Stream::connect(name).is_ok()
        } else {
            false
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        if Self::is_running() {
            anyhow::bail!("Daemon is already running");
        }

        // Remove old socket file if it exists
        let socket_path = Self::get_socket_path()?;
        if socket_path.exists() {
            std::fs::remove_file(&socket_path)?;
        }

        let name = Self::get_socket_name()?;
        let listener = ListenerOptions::new().name(name).create_sync()?;
        info!("Daemon listening on {:?}", socket_path);

        self.run_server(listener).await
    }

    async fn run_server(&mut self, listener: Listener) -> Result<()> {
        let browser_type = self.browser_type;
        let headless = self.headless;
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, browser_type, headless).await {
                            error!("Error handling client: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
        Ok(())
    }

    async fn handle_client(
        mut stream: Stream,
        browser_type: BrowserType,
        headless: bool,
    ) -> Result<()> {
        let mut reader = BufReader::new(&mut stream);
        let mut request_line = String::new();

        let bytes_read = reader.read_line(&mut request_line)?;

        // Zero bytes is just a connection probe (from is_running)
        if bytes_read == 0 || request_line.trim().is_empty() {
            return Ok(());
        }

        if request_line.ends_with('\n') {
            request_line.pop();
        }

        let envelope: RequestEnvelope = serde_json::from_str(&request_line)?;
        let correlation_id = envelope.id.clone();

        info!("Received request {}: {:?}", correlation_id, envelope.request);

        // Shutdown replies before tearing the process down
        if matches!(envelope.request, DaemonRequest::Shutdown) {
            info!("Daemon shutting down");

            let _ = GLOBAL_SESSION_MANAGER.close_all().await;
            GLOBAL_WEBDRIVER_MANAGER.stop_all();

            let response = ResponseEnvelope {
                id: correlation_id,
                response: DaemonResponse::Success("Daemon shutting down".to_string()),
            };
            let response_json = serde_json::to_string(&response)?;
            stream.write_all(response_json.as_bytes())?;
            stream.write_all(b"\n")?;
            stream.flush()?;

            if let Ok(socket_path) = Self::get_socket_path() {
                let _ = std::fs::remove_file(&socket_path);
            }

            // Give the client time to receive the response
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            std::process::exit(0);
        }

        let response = Self::dispatch(envelope.request, browser_type, headless).await;

        debug!("Sending response {}: {:?}", correlation_id, response);
        let envelope = ResponseEnvelope {
            id: correlation_id,
            response,
        };
        let response_json = serde_json::to_string(&envelope)?;
        stream.write_all(response_json.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;

        Ok(())
    }

    async fn dispatch(
        request: DaemonRequest,
        browser_type: BrowserType,
        headless: bool,
    ) -> DaemonResponse {
        match request {
            DaemonRequest::Scan { tab, url } => {
                match Self::handle_scan(tab, url, browser_type, headless).await {
                    Ok(count) => DaemonResponse::Scanned { count },
                    Err(e) => DaemonResponse::from_error(&e),
                }
            }
            DaemonRequest::Query { tab, query } => {
                match Self::handle_query(tab, &query).await {
                    Ok((plan, execution)) => DaemonResponse::QueryOutcome { plan, execution },
                    Err(e) => DaemonResponse::from_error(&e),
                }
            }
            DaemonRequest::Elements { tab } => match Self::handle_elements(tab).await {
                Ok(elements) => DaemonResponse::Elements(elements),
                Err(e) => DaemonResponse::from_error(&e),
            },
            DaemonRequest::ListSessions => {
                DaemonResponse::SessionList(GLOBAL_SESSION_MANAGER.list().await)
            }
            DaemonRequest::CloseSession { name } => {
                let name = match GLOBAL_SESSION_MANAGER.resolve_name(name.as_deref()) {
                    Ok(name) => name,
                    Err(e) => return DaemonResponse::from_error(&e),
                };
                match GLOBAL_SESSION_MANAGER.close(&name).await {
                    Ok(true) => DaemonResponse::Success(format!("Session '{}' closed", name)),
                    Ok(false) => DaemonResponse::Error {
                        kind: "other".to_string(),
                        message: format!("Session '{}' not found", name),
                    },
                    Err(e) => DaemonResponse::Error {
                        kind: "other".to_string(),
                        message: e.to_string(),
                    },
                }
            }
            DaemonRequest::Ping => DaemonResponse::Pong,
            DaemonRequest::Shutdown => {
                // Handled before dispatch
                unreachable!("Shutdown is handled before dispatch")
            }
        }
    }

    /// Navigate (optionally) and scan; the session stores the fresh list,
    /// replacing any previous one, and becomes the active session.
    async fn handle_scan(
        tab: Option<String>,
        url: Option<String>,
        browser_type: BrowserType,
        headless: bool,
    ) -> Result<usize, WebpilotError> {
        let name = tab.unwrap_or_else(|| DEFAULT_SESSION.to_string());
        let session_lock = GLOBAL_SESSION_MANAGER
            .get_or_create(&name, browser_type, headless)
            .await
            .map_err(|e| WebpilotError::WebDriverFailed(e.to_string()))?;

        let mut session = session_lock.lock().await;
        if let Some(url) = url {
            session.browser.goto(&url).await?;
            session.current_url = Some(url);
        }

        let elements = scanner::scan(&session.browser).await?;
        let count = elements.len();
        session.store_scan(elements);
        GLOBAL_SESSION_MANAGER.mark_active(&name);

        Ok(count)
    }

    /// Resolve a query against the stored scan and execute the plan.
    /// The snapshot taken under the session lock is the one consistent
    /// list for the whole resolve-then-execute round trip.
    async fn handle_query(
        tab: Option<String>,
        query: &str,
    ) -> Result<(ActionPlan, ExecutionOutcome), WebpilotError> {
        let name = GLOBAL_SESSION_MANAGER.resolve_name(tab.as_deref())?;
        let session_lock = GLOBAL_SESSION_MANAGER
            .get(&name)
            .ok_or(WebpilotError::NoActiveTab)?;

        let session = session_lock.lock().await;
        let elements = session.snapshot();

        let plan = resolver::resolve(query, &elements)?;
        let execution = executor::execute_plan(&session.browser, &plan).await?;

        drop(session);
        GLOBAL_SESSION_MANAGER.mark_active(&name);

        Ok((plan, execution))
    }

    async fn handle_elements(
        tab: Option<String>,
    ) -> Result<Vec<ElementDescriptor>, WebpilotError> {
        let name = GLOBAL_SESSION_MANAGER.resolve_name(tab.as_deref())?;
        let session_lock = GLOBAL_SESSION_MANAGER
            .get(&name)
            .ok_or(WebpilotError::NoActiveTab)?;

        let session = session_lock.lock().await;
        Ok(session.snapshot())
    }
}

/// Client for communicating with the daemon
pub struct DaemonClient;

impl DaemonClient {
    /// Send one request and wait for the correlated response
    pub fn send_request(request: DaemonRequest) -> Result<DaemonResponse> {
        let name = Daemon::get_socket_name()?;

        let mut stream =
            Stream::connect(name).context("Failed to connect to daemon. Is it running?")?;

        let envelope = RequestEnvelope {
            id: uuid::Uuid::new_v4().to_string(),
            request,
        };
        let request_json = serde_json::to_string(&envelope)?;
        stream.write_all(request_json.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;

        let mut reader = BufReader::new(stream);
        let mut response_line = String::new();
        match reader.read_line(&mut response_line) {
            Ok(0) => {
                anyhow::bail!("Daemon closed connection without sending response");
            }
            Ok(_) => {
                if response_line.is_empty() {
                    anyhow::bail!("Received empty response from daemon");
                }
                let response: ResponseEnvelope = serde_json::from_str(&response_line).context(
                    format!("Failed to parse daemon response: {}", response_line),
                )?;
                if response.id != envelope.id {
                    anyhow::bail!(
                        "Correlation ID mismatch: sent {}, received {}",
                        envelope.id,
                        response.id
                    );
                }
                Ok(response.response)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_daemon_running() -> bool {
        Daemon::is_running()
    }
}

#[cfg(test)]
#[path = "../daemon_test.rs"]
mod daemon_test;
