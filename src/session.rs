use anyhow::Result;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::errors::WebpilotError;
use crate::types::ElementDescriptor;
use crate::webdriver::{Browser, BrowserType};

/// Name used when the caller does not ask for a specific session
pub const DEFAULT_SESSION: &str = "main";

/// One live page session owned by the daemon
///
/// Holds the coordination-side copy of the latest scan. Each scan replaces
/// the stored list wholesale; it starts out explicitly empty.
pub struct PageSession {
    pub name: String,
    pub browser: Browser,
    pub current_url: Option<String>,
    elements: Vec<ElementDescriptor>,
    pub created_at: Instant,
    pub last_used: Instant,
}

impl PageSession {
    /// Replace the stored scan with a fresh one
    pub fn store_scan(&mut self, elements: Vec<ElementDescriptor>) {
        self.elements = elements;
    }

    /// Consistent snapshot of the latest scan for one resolve round trip
    pub fn snapshot(&self) -> Vec<ElementDescriptor> {
        self.elements.clone()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

/// Summary of a session for status listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub name: String,
    pub url: Option<String>,
    pub element_count: usize,
    pub active: bool,
    pub age_seconds: u64,
}

/// Manages named page sessions and tracks which one is active
///
/// The most recently used session plays the role of the focused browser
/// tab; requests without an explicit session name are routed to it.
pub struct SessionManager {
    sessions: DashMap<String, Arc<Mutex<PageSession>>>,
    active: StdMutex<Option<String>>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self {
            sessions: DashMap::new(),
            active: StdMutex::new(None),
        }
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a session with the given name
    pub async fn get_or_create(
        &self,
        name: &str,
        browser_type: BrowserType,
        headless: bool,
    ) -> Result<Arc<Mutex<PageSession>>> {
        // Clone the handle out of the map before awaiting; dashmap shard
        // guards must not be held across an await point
        let existing = self.sessions.get(name).map(|s| Arc::clone(s.value()));
        if let Some(session) = existing {
            session.lock().await.last_used = Instant::now();
            self.mark_active(name);
            return Ok(session);
        }

        let browser = Browser::new(browser_type, headless).await?;
        let session = Arc::new(Mutex::new(PageSession {
            name: name.to_string(),
            browser,
            current_url: None,
            elements: Vec::new(),
            created_at: Instant::now(),
            last_used: Instant::now(),
        }));
        // A racing create may have beaten us; keep whichever landed first
        let session = Arc::clone(
            self.sessions
                .entry(name.to_string())
                .or_insert_with(|| Arc::clone(&session))
                .value(),
        );
        self.mark_active(name);
        Ok(session)
    }

    /// Look up an existing session without creating one
    pub fn get(&self, name: &str) -> Option<Arc<Mutex<PageSession>>> {
        self.sessions.get(name).map(|s| Arc::clone(s.value()))
    }

    /// Resolve the session a request addresses: the explicit name, or the
    /// active one. `NoActiveTab` when neither exists.
    pub fn resolve_name(&self, requested: Option<&str>) -> Result<String, WebpilotError> {
        if let Some(name) = requested {
            return Ok(name.to_string());
        }
        self.active
            .lock()
            .unwrap()
            .clone()
            .ok_or(WebpilotError::NoActiveTab)
    }

    /// Record a session as the most recently used one
    pub fn mark_active(&self, name: &str) {
        *self.active.lock().unwrap() = Some(name.to_string());
    }

    /// Name of the currently active session, if any
    pub fn active_name(&self) -> Option<String> {
        self.active.lock().unwrap().clone()
    }

    /// List all sessions
    pub async fn list(&self) -> Vec<SessionInfo> {
        let active = self.active_name();
        let mut result = Vec::new();
        let handles: Vec<Arc<Mutex<PageSession>>> = self
            .sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for handle in handles {
            let session = handle.lock().await;
            result.push(SessionInfo {
                name: session.name.clone(),
                url: session.current_url.clone(),
                element_count: session.element_count(),
                active: active.as_deref() == Some(session.name.as_str()),
                age_seconds: session.created_at.elapsed().as_secs(),
            });
        }
        result.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }

    /// Close a specific session; the browser drops with it
    pub async fn close(&self, name: &str) -> Result<bool> {
        let removed = self.sessions.remove(name).is_some();
        if removed {
            let mut active = self.active.lock().unwrap();
            if active.as_deref() == Some(name) {
                *active = None;
            }
        }
        Ok(removed)
    }

    /// Close all sessions
    pub async fn close_all(&self) -> Result<usize> {
        let count = self.sessions.len();
        self.sessions.clear();
        *self.active.lock().unwrap() = None;
        Ok(count)
    }
}

// Global session manager instance
lazy_static::lazy_static! {
    pub static ref GLOBAL_SESSION_MANAGER: SessionManager = SessionManager::new();
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
