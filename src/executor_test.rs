#[cfg(test)]
mod tests {
    use crate::errors::WebpilotError;
    use crate::executor::*;
    use crate::scanner::MARKER_ATTR;
    use crate::types::ActionPlan;

    fn report(json: serde_json::Value) -> ActionReport {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_action_script_looks_up_by_marker() {
        let script = build_action_script();
        assert!(script.contains(&format!("[{}=", MARKER_ATTR)));
        assert!(script.contains("querySelector"));
    }

    #[test]
    fn test_action_script_dispatches_both_events_on_fill() {
        // Reactive frameworks listen for different signals; both must fire
        let script = build_action_script();
        assert!(script.contains("new Event('input', { bubbles: true })"));
        assert!(script.contains("new Event('change', { bubbles: true })"));
    }

    #[test]
    fn test_action_script_focuses_before_acting() {
        let script = build_action_script();
        assert!(script.contains("element.focus()"));
        assert!(script.contains("element.click()"));
    }

    #[test]
    fn test_action_script_covers_failure_statuses() {
        let script = build_action_script();
        for status in [
            "'not_found'",
            "'missing_value'",
            "'unfillable'",
            "'unsupported'",
            "'error'",
        ] {
            assert!(script.contains(status), "missing status {}", status);
        }
    }

    #[test]
    fn test_ok_report_becomes_success_outcome() {
        let plan = ActionPlan::click("pilot-4");
        let outcome = report(serde_json::json!({ "status": "ok", "message": "clicked" }))
            .into_outcome(&plan)
            .unwrap();

        assert!(outcome.success);
        assert!(outcome.message.contains("pilot-4"));
        assert!(outcome.message.starts_with("Clicked"));
    }

    #[test]
    fn test_fill_ok_report_mentions_fill() {
        let plan = ActionPlan::fill("pilot-2", "x");
        let outcome = report(serde_json::json!({ "status": "ok", "message": "filled" }))
            .into_outcome(&plan)
            .unwrap();

        assert!(outcome.success);
        assert!(outcome.message.starts_with("Filled"));
    }

    #[test]
    fn test_not_found_report_maps_to_target_not_found() {
        let plan = ActionPlan::click("pilot-9");
        let err = report(serde_json::json!({ "status": "not_found" }))
            .into_outcome(&plan)
            .unwrap_err();

        match err {
            WebpilotError::TargetNotFound(id) => assert_eq!(id, "pilot-9"),
            other => panic!("expected TargetNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unfillable_report_carries_tag() {
        let plan = ActionPlan::fill("pilot-1", "x");
        let err = report(serde_json::json!({ "status": "unfillable", "tag": "DIV" }))
            .into_outcome(&plan)
            .unwrap_err();

        match err {
            WebpilotError::Unfillable(tag) => assert_eq!(tag, "DIV"),
            other => panic!("expected Unfillable, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_value_and_unsupported_reports() {
        let plan = ActionPlan::fill("pilot-1", "x");

        let err = report(serde_json::json!({ "status": "missing_value" }))
            .into_outcome(&plan)
            .unwrap_err();
        assert!(matches!(err, WebpilotError::MissingValue));

        let err = report(serde_json::json!({ "status": "unsupported", "action": "hover" }))
            .into_outcome(&plan)
            .unwrap_err();
        match err {
            WebpilotError::UnsupportedAction(action) => assert_eq!(action, "hover"),
            other => panic!("expected UnsupportedAction, got {:?}", other),
        }
    }

    #[test]
    fn test_page_exception_becomes_execution_failed() {
        let plan = ActionPlan::click("pilot-0");
        let err = report(serde_json::json!({ "status": "error", "message": "boom" }))
            .into_outcome(&plan)
            .unwrap_err();

        match err {
            WebpilotError::ExecutionFailed(message) => assert_eq!(message, "boom"),
            other => panic!("expected ExecutionFailed, got {:?}", other),
        }
    }
}
