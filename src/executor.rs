use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::errors::WebpilotError;
use crate::scanner::MARKER_ATTR;
use crate::types::{ActionKind, ActionPlan, ExecutionOutcome};
use crate::webdriver::Browser;

/// Perform a resolved plan inside the page
///
/// The element is re-located by its marker attribute; a page that mutated
/// since the scan surfaces as `TargetNotFound` rather than being prevented.
pub async fn execute_plan(
    browser: &Browser,
    plan: &ActionPlan,
) -> Result<ExecutionOutcome, WebpilotError> {
    debug!("Executing {} on {}", plan.action, plan.target_id);

    let args = vec![
        json!(plan.action.to_string()),
        json!(plan.target_id),
        json!(plan.value),
    ];

    let raw = browser
        .execute(&build_action_script(), args)
        .await
        .map_err(|e| WebpilotError::ExecutionFailed(e.to_string()))?;

    let report: ActionReport = serde_json::from_value(raw)
        .map_err(|e| WebpilotError::ExecutionFailed(format!("malformed page report: {e}")))?;

    let outcome = report.into_outcome(plan)?;
    info!("{}", outcome.message);
    Ok(outcome)
}

/// What the page-side dispatcher sends back
#[derive(Debug, Deserialize)]
struct ActionReport {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    action: Option<String>,
}

impl ActionReport {
    fn into_outcome(self, plan: &ActionPlan) -> Result<ExecutionOutcome, WebpilotError> {
        match self.status.as_str() {
            "ok" => {
                let verb = match plan.action {
                    ActionKind::Click => "Clicked",
                    ActionKind::Fill => "Filled",
                };
                Ok(ExecutionOutcome {
                    success: true,
                    message: format!("{} element with marker {:?}", verb, plan.target_id),
                })
            }
            "not_found" => Err(WebpilotError::TargetNotFound(plan.target_id.clone())),
            "missing_value" => Err(WebpilotError::MissingValue),
            "unfillable" => Err(WebpilotError::Unfillable(
                self.tag.unwrap_or_else(|| plan.target_id.clone()),
            )),
            "unsupported" => Err(WebpilotError::UnsupportedAction(
                self.action.unwrap_or_else(|| plan.action.to_string()),
            )),
            "error" => Err(WebpilotError::ExecutionFailed(
                self.message.unwrap_or_else(|| "unknown page error".to_string()),
            )),
            other => Err(WebpilotError::ExecutionFailed(format!(
                "unexpected page status {other:?}"
            ))),
        }
    }
}

/// Page-side dispatcher. Catches every page exception and reports it as
/// data; nothing propagates out of the script.
fn build_action_script() -> String {
    format!(
        r#"
        const action = arguments[0];
        const marker = arguments[1];
        const value = arguments[2];

        const element = document.querySelector('[{attr}="' + marker + '"]');
        if (!element) {{
            return {{ status: 'not_found' }};
        }}

        try {{
            switch (action) {{
                case 'click':
                    element.focus();
                    element.click();
                    return {{ status: 'ok', message: 'clicked' }};
                case 'fill':
                    if (value === null || value === undefined) {{
                        return {{ status: 'missing_value' }};
                    }}
                    if (typeof element.value === 'undefined') {{
                        return {{ status: 'unfillable', tag: element.tagName }};
                    }}
                    element.focus();
                    element.value = value;
                    element.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    element.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return {{ status: 'ok', message: 'filled' }};
                default:
                    return {{ status: 'unsupported', action: String(action) }};
            }}
        }} catch (err) {{
            return {{ status: 'error', message: String((err && err.message) || err) }};
        }}
        "#,
        attr = MARKER_ATTR,
    )
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod executor_test;
