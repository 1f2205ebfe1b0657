use thiserror::Error;

/// Crate error type; every kind maps to a stable exit code and wire string
#[derive(Debug, Error)]
pub enum WebpilotError {
    /// Query had no recognizable action verb (exit code 2)
    #[error("no action recognized in query: {0:?}")]
    NoActionRecognized(String),
    /// No element scored above zero for the query (exit code 2)
    #[error("no target matched the query: {0:?}")]
    NoTargetMatched(String),
    /// Fill query without a trailing `with ...` clause (exit code 2)
    #[error("fill requires a value; add `with \"...\"` to the query")]
    FillMissingValue,
    /// Query arrived before any scan, or the scan was empty (exit code 2)
    #[error("no elements available; scan the page first")]
    NoElementsAvailable,
    /// Marker attribute no longer present in the live page (exit code 3)
    #[error("element with marker {0:?} not found; the page may have changed since the scan")]
    TargetNotFound(String),
    /// Fill plan reached the page without a value (exit code 5)
    #[error("fill action requires a value")]
    MissingValue,
    /// Element has no settable value property (exit code 5)
    #[error("element {0:?} cannot be filled")]
    Unfillable(String),
    /// Action string the page-side dispatcher does not know (exit code 5)
    #[error("unsupported action: {0:?}")]
    UnsupportedAction(String),
    /// The page raised while performing the action (exit code 5)
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
    /// No session exists to address the action to (exit code 6)
    #[error("no active session; run `webpilot scan <url>` first")]
    NoActiveTab,
    /// WebDriver connection failed (exit code 4)
    #[error("WebDriver connection failed: {0}")]
    WebDriverFailed(String),
    /// Failure reported by the daemon over the socket; keeps the remote
    /// kind so the exit code survives the IPC boundary
    #[error("{message}")]
    Remote { kind: String, message: String },
    /// Generic error (exit code 1)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WebpilotError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            WebpilotError::NoActionRecognized(_)
            | WebpilotError::NoTargetMatched(_)
            | WebpilotError::FillMissingValue
            | WebpilotError::NoElementsAvailable => 2,
            WebpilotError::TargetNotFound(_) => 3,
            WebpilotError::WebDriverFailed(_) => 4,
            WebpilotError::MissingValue
            | WebpilotError::Unfillable(_)
            | WebpilotError::UnsupportedAction(_)
            | WebpilotError::ExecutionFailed(_) => 5,
            WebpilotError::NoActiveTab => 6,
            WebpilotError::Remote { kind, .. } => Self::exit_code_for_kind(kind),
            WebpilotError::Other(_) => 1,
        }
    }

    /// Stable kind string used on the daemon wire
    pub fn kind(&self) -> &'static str {
        match self {
            WebpilotError::NoActionRecognized(_) => "no_action_recognized",
            WebpilotError::NoTargetMatched(_) => "no_target_matched",
            WebpilotError::FillMissingValue => "fill_missing_value",
            WebpilotError::NoElementsAvailable => "no_elements_available",
            WebpilotError::TargetNotFound(_) => "target_not_found",
            WebpilotError::MissingValue => "missing_value",
            WebpilotError::Unfillable(_) => "unfillable",
            WebpilotError::UnsupportedAction(_) => "unsupported_action",
            WebpilotError::ExecutionFailed(_) => "execution_failed",
            WebpilotError::NoActiveTab => "no_active_tab",
            WebpilotError::WebDriverFailed(_) => "webdriver_failed",
            WebpilotError::Remote { .. } => "remote",
            WebpilotError::Other(_) => "other",
        }
    }

    /// Exit code for a kind string received over the daemon socket
    pub fn exit_code_for_kind(kind: &str) -> i32 {
        match kind {
            "no_action_recognized" | "no_target_matched" | "fill_missing_value"
            | "no_elements_available" => 2,
            "target_not_found" => 3,
            "webdriver_failed" => 4,
            "missing_value" | "unfillable" | "unsupported_action" | "execution_failed" => 5,
            "no_active_tab" => 6,
            _ => 1,
        }
    }

    /// Rebuild an error from the `{kind, message}` pair the daemon reports;
    /// the message stays verbatim, the kind keeps the exit-code mapping
    pub fn from_wire(kind: &str, message: &str) -> Self {
        WebpilotError::Remote {
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }
}
