//! # webpilot
#![allow(clippy::uninlined_format_args)]
//!
//! CLI assistant that executes natural-language instructions against a live
//! web page.
//!
//! A background daemon owns real browser sessions (driven over WebDriver)
//! and the latest scan of interactive page elements. The CLI forwards free
//! text like `click the Login button`; the daemon resolves it into an
//! action plan against the stored scan and performs it inside the page.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Start the daemon (owns the browser and the element scans)
//! webpilot daemon start --browser chrome
//!
//! # Open a page and scan it for interactive elements
//! webpilot scan "https://example.com/login"
//!
//! # Execute instructions against the scanned page
//! webpilot do "click 'Log in'"
//! webpilot do "fill email with \"user@example.com\""
//! webpilot do "click the signup button"
//!
//! # Navigate, re-scan and act in one step
//! webpilot do --url "https://example.com" "click 'More information'"
//!
//! # Inspect what the last scan stored
//! webpilot elements
//!
//! # Shut everything down
//! webpilot daemon stop
//! ```
//!
//! ## How a query becomes an action
//!
//! 1. The scanner injects JavaScript that walks the document, filters
//!    hidden/disabled/tiny elements, writes a `data-pilot-id` marker onto
//!    each survivor and reports descriptors (tag, text, attributes, box).
//! 2. The resolver classifies the verb (`click`/`fill`), then picks a
//!    target: a single-quoted phrase matches element text directly, and
//!    everything else goes through token scoring over text, tag and
//!    attributes. Fill queries must end in `with ...` to yield a value.
//! 3. The executor re-locates the element by its marker and performs the
//!    action, emitting synthetic `input`/`change` events for fills so
//!    reactive pages notice.
//!
//! Failures at every stage (unrecognized verb, no match, vanished marker,
//! unfillable element) are reported as status text, never crashes.
//!
//! ## Library Usage
//!
//! The resolver core is usable standalone; it is pure and does not need a
//! browser:
//!
//! ```
//! use webpilot::resolver;
//! use webpilot::types::{ActionKind, BoundingBox, ElementAttributes, ElementDescriptor};
//!
//! let elements = vec![ElementDescriptor {
//!     id: "pilot-0".to_string(),
//!     tag: "BUTTON".to_string(),
//!     text: "Login".to_string(),
//!     attributes: ElementAttributes::default(),
//!     is_visible: true,
//!     rect: BoundingBox::default(),
//! }];
//!
//! let plan = resolver::resolve("click 'Login'", &elements).unwrap();
//! assert_eq!(plan.action, ActionKind::Click);
//! assert_eq!(plan.target_id, "pilot-0");
//! ```

/// Crate error type with exit-code and wire-kind mappings
pub mod errors;

/// Page-side action dispatch (click, fill)
pub mod executor;

/// Query-to-plan resolution heuristics
pub mod resolver;

/// Page scanning and element markers
pub mod scanner;

/// Daemon-owned page sessions and the active-session store
pub mod session;

/// Type definitions for descriptors, plans and outcomes
pub mod types;

/// WebDriver browser control
pub mod webdriver;

/// Automatic WebDriver process management
pub mod webdriver_manager;

pub use errors::WebpilotError;
pub use types::{
    ActionKind, ActionPlan, BoundingBox, ElementAttributes, ElementDescriptor, ExecutionOutcome,
    OutputFormat, TEXT_MAX_LEN,
};
pub use webdriver::{Browser, BrowserType};
