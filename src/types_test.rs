#[cfg(test)]
mod tests {
    use crate::types::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_wire_format() {
        let descriptor = ElementDescriptor {
            id: "pilot-3".to_string(),
            tag: "INPUT".to_string(),
            text: "".to_string(),
            attributes: ElementAttributes {
                aria_label: Some("email".to_string()),
                placeholder: Some("you@example.com".to_string()),
                ..Default::default()
            },
            is_visible: true,
            rect: BoundingBox {
                top: 10.0,
                left: 20.0,
                width: 200.0,
                height: 32.0,
            },
        };

        let json = serde_json::to_value(&descriptor).unwrap();

        // Wire names are camelCase / hyphenated where the page reports them so
        assert_eq!(json["isVisible"], serde_json::json!(true));
        assert_eq!(json["attributes"]["aria-label"], serde_json::json!("email"));
        assert_eq!(json["rect"]["width"], serde_json::json!(200.0));

        // Absent attributes are omitted entirely
        assert!(json["attributes"].get("id").is_none());
        assert!(json["attributes"].get("class").is_none());
    }

    #[test]
    fn test_descriptor_parses_page_payload() {
        // Shape exactly as the scan script reports it
        let payload = serde_json::json!({
            "id": "pilot-0",
            "tag": "BUTTON",
            "text": "Log in",
            "attributes": { "class": "btn primary", "aria-label": "log in" },
            "isVisible": false,
            "rect": { "top": -40.0, "left": 0.0, "width": 80.0, "height": 24.0 }
        });

        let descriptor: ElementDescriptor = serde_json::from_value(payload).unwrap();
        assert_eq!(descriptor.id, "pilot-0");
        assert_eq!(descriptor.tag, "BUTTON");
        assert_eq!(descriptor.attributes.aria_label, Some("log in".to_string()));
        assert_eq!(descriptor.attributes.id, None);
        assert!(!descriptor.is_visible);
        assert_eq!(descriptor.rect.top, -40.0);
    }

    #[test]
    fn test_action_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ActionKind::Click).unwrap(),
            "\"click\""
        );
        assert_eq!(serde_json::to_string(&ActionKind::Fill).unwrap(), "\"fill\"");
        assert_eq!(ActionKind::Click.to_string(), "click");
    }

    #[test]
    fn test_click_plan_has_no_value() {
        let plan = ActionPlan::click("pilot-7");
        assert_eq!(plan.action, ActionKind::Click);
        assert_eq!(plan.target_id, "pilot-7");
        assert_eq!(plan.value, None);

        // The value key disappears from the wire entirely
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json.get("value").is_none());
    }

    #[test]
    fn test_fill_plan_round_trip() {
        let plan = ActionPlan::fill("pilot-2", "a@b.com");
        let json = serde_json::to_string(&plan).unwrap();
        let parsed: ActionPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
        assert_eq!(parsed.value, Some("a@b.com".to_string()));
    }

    #[test]
    fn test_execution_outcome_serialization() {
        let outcome = ExecutionOutcome {
            success: true,
            message: "Clicked element with marker \"pilot-0\"".to_string(),
        };

        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: ExecutionOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcome);
    }

    #[test]
    fn test_output_format_values() {
        assert!(matches!(OutputFormat::Json, OutputFormat::Json));
        assert!(matches!(OutputFormat::Simple, OutputFormat::Simple));
    }
}
