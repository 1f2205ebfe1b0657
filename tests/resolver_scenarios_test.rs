// End-to-end resolver properties over realistic element fixtures.
// Pure logic; no browser or daemon required.

use pretty_assertions::assert_eq;
use webpilot::WebpilotError;
use webpilot::resolver;
use webpilot::types::{ActionKind, BoundingBox, ElementAttributes, ElementDescriptor};

fn page_fixture() -> Vec<ElementDescriptor> {
    let mut elements = Vec::new();

    let mut nav = ElementDescriptor {
        id: "pilot-0".to_string(),
        tag: "A".to_string(),
        text: "Home".to_string(),
        attributes: ElementAttributes::default(),
        is_visible: true,
        rect: BoundingBox {
            top: 0.0,
            left: 0.0,
            width: 60.0,
            height: 20.0,
        },
    };
    nav.attributes.class = Some("nav-link".to_string());
    elements.push(nav);

    let mut email = ElementDescriptor {
        id: "pilot-1".to_string(),
        tag: "INPUT".to_string(),
        text: "".to_string(),
        attributes: ElementAttributes::default(),
        is_visible: true,
        rect: BoundingBox {
            top: 120.0,
            left: 40.0,
            width: 240.0,
            height: 28.0,
        },
    };
    email.attributes.aria_label = Some("email".to_string());
    email.attributes.placeholder = Some("you@example.com".to_string());
    elements.push(email);

    let mut signup = ElementDescriptor {
        id: "pilot-2".to_string(),
        tag: "BUTTON".to_string(),
        text: "Sign up".to_string(),
        attributes: ElementAttributes::default(),
        is_visible: true,
        rect: BoundingBox {
            top: 160.0,
            left: 40.0,
            width: 90.0,
            height: 32.0,
        },
    };
    signup.attributes.id = Some("signup".to_string());
    elements.push(signup);

    let mut login = ElementDescriptor {
        id: "pilot-3".to_string(),
        tag: "BUTTON".to_string(),
        text: "Login".to_string(),
        attributes: ElementAttributes::default(),
        is_visible: true,
        rect: BoundingBox {
            top: 160.0,
            left: 140.0,
            width: 90.0,
            height: 32.0,
        },
    };
    login.attributes.id = Some("login".to_string());
    elements.push(login);

    elements
}

#[test]
fn quoted_text_selects_exact_element_regardless_of_scores() {
    let elements = page_fixture();

    let plan = resolver::resolve("click 'Login'", &elements).unwrap();
    assert_eq!(plan.action, ActionKind::Click);
    assert_eq!(plan.target_id, "pilot-3");

    // Even when other tokens in the query would score a different element
    let plan = resolver::resolve("click the email thing 'Sign up'", &elements).unwrap();
    assert_eq!(plan.target_id, "pilot-2");
}

#[test]
fn unrecognized_verb_produces_no_plan() {
    let elements = page_fixture();

    let err = resolver::resolve("dance around the page", &elements).unwrap_err();
    assert!(matches!(err, WebpilotError::NoActionRecognized(_)));
}

#[test]
fn fill_without_with_clause_fails_even_with_target() {
    let elements = page_fixture();

    let err = resolver::resolve("fill email", &elements).unwrap_err();
    assert!(matches!(err, WebpilotError::FillMissingValue));
}

#[test]
fn fill_email_scenario_extracts_quoted_value() {
    let elements = page_fixture();

    let plan = resolver::resolve("fill email with \"a@b.com\"", &elements).unwrap();
    assert_eq!(plan.action, ActionKind::Fill);
    assert_eq!(plan.target_id, "pilot-1");
    assert_eq!(plan.value, Some("a@b.com".to_string()));
}

#[test]
fn scoring_is_deterministic_across_repeated_resolutions() {
    let elements = page_fixture();

    let baseline = resolver::resolve("click the signup button", &elements).unwrap();
    for _ in 0..25 {
        let plan = resolver::resolve("click the signup button", &elements).unwrap();
        assert_eq!(plan, baseline);
    }
}

#[test]
fn empty_element_list_fails_before_anything_else() {
    for query in ["click 'Login'", "fill email with \"x\"", "nonsense"] {
        let err = resolver::resolve(query, &[]).unwrap_err();
        assert!(
            matches!(err, WebpilotError::NoElementsAvailable),
            "query {:?}",
            query
        );
    }
}
