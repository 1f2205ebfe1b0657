use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::types::{ElementDescriptor, TEXT_MAX_LEN};
use crate::webdriver::Browser;

/// Attribute written onto every surviving element so the executor can
/// re-locate it later. Load-bearing: descriptor `id` == this attribute's
/// value on the live element.
pub const MARKER_ATTR: &str = "data-pilot-id";

/// Prefix of generated marker values; the counter restarts on every scan
pub const MARKER_PREFIX: &str = "pilot-";

/// Elements with a rendered box narrower than this are skipped
pub const MIN_VISIBLE_WIDTH: u32 = 5;

/// Elements shorter than this are skipped, unless they are links or inputs
pub const MIN_VISIBLE_HEIGHT: u32 = 5;

/// Enumerate interactive elements in the current page
///
/// Side effect: writes the marker attribute into the live document. The
/// returned list replaces whatever the caller stored from earlier scans.
pub async fn scan(browser: &Browser) -> Result<Vec<ElementDescriptor>> {
    debug!("Injecting element scan");

    let value = browser
        .execute(&build_scan_script(), vec![])
        .await
        .context("Failed to run the page scan")?;

    let elements: Vec<ElementDescriptor> =
        serde_json::from_value(value).context("Failed to parse scan results")?;

    info!("Scan found {} interactive element(s)", elements.len());
    Ok(elements)
}

/// Page-side scan script. Candidate selection, filtering, marker writing
/// and serialization all happen in one round trip, in document order.
fn build_scan_script() -> String {
    format!(
        r#"
        return (function() {{
            const interactiveTags = ['BUTTON', 'A', 'INPUT', 'SELECT', 'TEXTAREA'];
            const elements = [];
            let counter = 0;

            document.querySelectorAll('*').forEach(el => {{
                if (!(interactiveTags.includes(el.tagName) || el.onclick || el.hasAttribute('role'))) {{
                    return;
                }}

                const style = window.getComputedStyle(el);
                if (style.visibility === 'hidden' || style.display === 'none' || style.opacity === '0') {{
                    return;
                }}

                const rect = el.getBoundingClientRect();
                if (rect.width < {min_width} ||
                    (rect.height < {min_height} && el.tagName !== 'A' && el.tagName !== 'INPUT')) {{
                    return;
                }}

                if (el.disabled || el.getAttribute('aria-disabled') === 'true') {{
                    return;
                }}

                const inViewport = (
                    rect.top >= 0 &&
                    rect.left >= 0 &&
                    rect.bottom <= (window.innerHeight || document.documentElement.clientHeight) &&
                    rect.right <= (window.innerWidth || document.documentElement.clientWidth)
                );

                const text = (el.innerText || el.value || el.getAttribute('aria-label') || el.title || '')
                    .trim().substring(0, {text_max});

                const marker = '{prefix}' + counter++;
                el.setAttribute('{attr}', marker);

                const attributes = {{}};
                if (el.id) attributes.id = el.id;
                if (el.className && typeof el.className === 'string') attributes.class = el.className;
                if (el.getAttribute('name')) attributes.name = el.getAttribute('name');
                if (el.getAttribute('role')) attributes.role = el.getAttribute('role');
                if (el.getAttribute('aria-label')) attributes['aria-label'] = el.getAttribute('aria-label');
                if (el.getAttribute('placeholder')) attributes.placeholder = el.getAttribute('placeholder');
                if (el.value !== undefined && el.value !== '') attributes.value = String(el.value);

                elements.push({{
                    id: marker,
                    tag: el.tagName,
                    text: text,
                    attributes: attributes,
                    isVisible: inViewport,
                    rect: {{
                        top: rect.top,
                        left: rect.left,
                        width: rect.width,
                        height: rect.height
                    }}
                }});
            }});

            return elements;
        }})();
        "#,
        min_width = MIN_VISIBLE_WIDTH,
        min_height = MIN_VISIBLE_HEIGHT,
        text_max = TEXT_MAX_LEN,
        prefix = MARKER_PREFIX,
        attr = MARKER_ATTR,
    )
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod scanner_test;
