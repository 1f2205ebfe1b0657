use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::errors::WebpilotError;
use crate::types::{ActionKind, ActionPlan, ElementDescriptor};

lazy_static! {
    /// First single-quoted span in a query, e.g. `click 'Log in'`
    static ref QUOTED_TARGET: Regex = Regex::new(r"'([^']+)'").unwrap();
    /// Trailing value clause: `with "text"`, `with 'text'`, or `with word`
    static ref FILL_VALUE: Regex =
        Regex::new(r#"with ("([^"]*)"|'([^']*)'|(\S+))$"#).unwrap();
}

/// Tokens shorter than this are ignored by the scorer
pub const MIN_TOKEN_LEN: usize = 3;

/// Short tokens that are still scored despite `MIN_TOKEN_LEN`
pub const STANDALONE_SHORT_TOKENS: &[&str] = &["a", "to", "on", "in", "the", "is"];

/// Heuristic scoring weights; tunable constants, not semantics
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    /// Element text contains a query token
    pub text: u32,
    /// Tag name contains a query token
    pub tag: u32,
    /// `id` attribute contains a query token
    pub attr_id: u32,
    /// `class` attribute contains a query token
    pub attr_class: u32,
    /// `aria-label` attribute contains a query token
    pub aria_label: u32,
    /// Whole query mentions the element's tag name
    pub tag_mention: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            text: 10,
            tag: 5,
            attr_id: 8,
            attr_class: 3,
            aria_label: 10,
            tag_mention: 10,
        }
    }
}

/// Turn a free-text query and the latest scan into an action plan
///
/// Fails as a whole rather than producing a partial plan: a `Fill` query
/// that matched a target but carries no `with ...` value is still an error.
pub fn resolve(
    query: &str,
    elements: &[ElementDescriptor],
) -> Result<ActionPlan, WebpilotError> {
    if elements.is_empty() {
        return Err(WebpilotError::NoElementsAvailable);
    }

    let lower = query.to_lowercase();
    let action = classify_action(&lower)
        .ok_or_else(|| WebpilotError::NoActionRecognized(query.to_string()))?;

    let target = find_quoted_target(query, elements)
        .or_else(|| best_scored(&lower, elements, &ScoreWeights::default()))
        .ok_or_else(|| WebpilotError::NoTargetMatched(query.to_string()))?;

    debug!(
        "Resolved target {} ({}) for query {:?}",
        target.id, target.tag, query
    );

    match action {
        ActionKind::Click => Ok(ActionPlan::click(&target.id)),
        ActionKind::Fill => {
            let value = extract_fill_value(query).ok_or(WebpilotError::FillMissingValue)?;
            Ok(ActionPlan::fill(&target.id, value))
        }
    }
}

/// Classify the action verb of a lower-cased query
pub fn classify_action(lower_query: &str) -> Option<ActionKind> {
    if lower_query.starts_with("click")
        || lower_query.contains("press")
        || lower_query.contains("select")
    {
        Some(ActionKind::Click)
    } else if lower_query.starts_with("fill")
        || lower_query.starts_with("type")
        || lower_query.starts_with("enter")
    {
        Some(ActionKind::Fill)
    } else {
        None
    }
}

/// Quoted-text shortcut: first element whose text contains the first
/// single-quoted span of the query, case-insensitively. Short-circuits the
/// scored search entirely when it hits.
fn find_quoted_target<'a>(
    query: &str,
    elements: &'a [ElementDescriptor],
) -> Option<&'a ElementDescriptor> {
    let needle = QUOTED_TARGET
        .captures(query)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())?;

    elements
        .iter()
        .find(|el| el.text.to_lowercase().contains(&needle))
}

/// Token-scored search over all elements; earliest element wins ties.
/// Returns `None` when nothing scored above zero.
fn best_scored<'a>(
    lower_query: &str,
    elements: &'a [ElementDescriptor],
    weights: &ScoreWeights,
) -> Option<&'a ElementDescriptor> {
    let tokens: Vec<&str> = lower_query.split_whitespace().collect();

    let mut best: Option<&ElementDescriptor> = None;
    let mut best_score = 0u32;

    for el in elements {
        let score = score_element(lower_query, &tokens, el, weights);
        if score > best_score {
            best_score = score;
            best = Some(el);
        }
    }

    best
}

fn score_element(
    lower_query: &str,
    tokens: &[&str],
    el: &ElementDescriptor,
    weights: &ScoreWeights,
) -> u32 {
    let text = el.text.to_lowercase();
    let tag = el.tag.to_lowercase();
    let attr_id = lower_attr(el.attributes.id.as_deref());
    let attr_class = lower_attr(el.attributes.class.as_deref());
    let aria_label = lower_attr(el.attributes.aria_label.as_deref());

    let mut score = 0;
    for token in tokens {
        if token.chars().count() < MIN_TOKEN_LEN && !STANDALONE_SHORT_TOKENS.contains(token) {
            continue;
        }
        if text.contains(token) {
            score += weights.text;
        }
        if tag.contains(token) {
            score += weights.tag;
        }
        if attr_id.contains(token) {
            score += weights.attr_id;
        }
        if attr_class.contains(token) {
            score += weights.attr_class;
        }
        if aria_label.contains(token) {
            score += weights.aria_label;
        }
    }

    // Flat bonus when the query mentions the tag itself ("button", "link")
    if lower_query.contains(&tag) {
        score += weights.tag_mention;
    }

    score
}

fn lower_attr(attr: Option<&str>) -> String {
    attr.unwrap_or_default().to_lowercase()
}

/// Extract the trailing value of a fill query, matched against the
/// original (not lower-cased) text. Double quotes win over single quotes,
/// which win over a bare last word.
pub fn extract_fill_value(query: &str) -> Option<String> {
    let caps = FILL_VALUE.captures(query)?;
    caps.get(2)
        .or_else(|| caps.get(3))
        .or_else(|| caps.get(4))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod resolver_test;
