use serde::{Deserialize, Serialize};

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// Human-readable simple format
    Simple,
}

/// Maximum length of the text captured for an element
pub const TEXT_MAX_LEN: usize = 100;

/// One interactive element as reported by a page scan
///
/// Descriptors are regenerated on every scan; the `id` is only meaningful
/// against the page state the scan observed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    /// Marker value written onto the live element (`data-pilot-id`)
    pub id: String,
    /// Tag name, uppercase (BUTTON, A, INPUT, ...)
    pub tag: String,
    /// Visible or accessible text, trimmed and truncated to `TEXT_MAX_LEN`
    #[serde(default)]
    pub text: String,
    /// Recognized attributes; absent ones are omitted on the wire
    #[serde(default)]
    pub attributes: ElementAttributes,
    /// Whether the bounding box lies fully within the viewport at scan time
    pub is_visible: bool,
    /// Bounding box at scan time
    pub rect: BoundingBox,
}

/// The fixed set of attributes a scan reports per element
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElementAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "aria-label", skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Bounding box of an element, viewport coordinates in px
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// The kind of action a resolved plan performs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Focus the element and invoke its native activation
    Click,
    /// Assign a value and emit synthetic input/change events
    Fill,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Click => write!(f, "click"),
            ActionKind::Fill => write!(f, "fill"),
        }
    }
}

/// A resolved (action, target, optional value) triple
///
/// Only ever constructed complete: a `Fill` plan always carries a value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionPlan {
    pub action: ActionKind,
    /// The `id` of the chosen element descriptor
    pub target_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ActionPlan {
    pub fn click(target_id: impl Into<String>) -> Self {
        ActionPlan {
            action: ActionKind::Click,
            target_id: target_id.into(),
            value: None,
        }
    }

    pub fn fill(target_id: impl Into<String>, value: impl Into<String>) -> Self {
        ActionPlan {
            action: ActionKind::Fill,
            target_id: target_id.into(),
            value: Some(value.into()),
        }
    }
}

/// Result of executing a plan in the page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
