// Common test utilities and fixtures

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;

use webpilot::webdriver::{Browser, BrowserType};

// Global test lock to prevent concurrent WebDriver starts
lazy_static::lazy_static! {
    static ref WEBDRIVER_LOCK: Arc<Mutex<()>> = Arc::new(Mutex::new(()));
}

/// Get a test browser instance, or `None` when no WebDriver can be
/// started on this machine (the test should then skip)
pub async fn get_test_browser() -> Option<Browser> {
    let _lock = WEBDRIVER_LOCK.lock().await;

    for browser_type in &[BrowserType::Chrome, BrowserType::Firefox] {
        for attempt in 1..=2 {
            match Browser::new(*browser_type, true).await {
                Ok(browser) => return Some(browser),
                Err(e) => {
                    eprintln!(
                        "Attempt {} failed for {:?}: {}",
                        attempt, browser_type, e
                    );
                }
            }
        }
    }

    eprintln!("No WebDriver available; skipping browser-backed test");
    None
}

/// Mock HTML pages for testing
pub mod fixtures {
    pub const LOGIN_PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
    <head><title>Login Test</title></head>
    <body>
        <h1>Welcome back</h1>
        <button id="signup" onclick="document.title='clicked-signup'">Sign up</button>
        <button id="login" onclick="document.title='clicked-login'">Login</button>
        <input aria-label="email" placeholder="you@example.com"
               oninput="window.__gotInput = true"
               onchange="window.__gotChange = true">
        <button disabled>Disabled button</button>
        <button style="display:none">Hidden button</button>
    </body>
    </html>
    "#;
}

/// Helper to create a test HTML file reachable over file://
pub fn create_test_html(content: &str) -> PathBuf {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("test.html");
    std::fs::write(&file_path, content).expect("Failed to write test HTML");

    // Leak the temp_dir to keep it alive for the test
    std::mem::forget(temp_dir);
    file_path
}

/// file:// URL for a fixture page
pub fn file_url(path: &PathBuf) -> String {
    format!("file://{}", path.display())
}
