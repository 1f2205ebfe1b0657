#[cfg(test)]
mod tests {
    use crate::errors::WebpilotError;
    use crate::session::*;

    #[test]
    fn test_resolve_name_prefers_explicit_name() {
        let manager = SessionManager::new();
        manager.mark_active("background");

        let name = manager.resolve_name(Some("checkout")).unwrap();
        assert_eq!(name, "checkout");
    }

    #[test]
    fn test_resolve_name_falls_back_to_active() {
        let manager = SessionManager::new();
        manager.mark_active("main");

        let name = manager.resolve_name(None).unwrap();
        assert_eq!(name, "main");
    }

    #[test]
    fn test_resolve_name_without_active_session_fails() {
        let manager = SessionManager::new();

        let err = manager.resolve_name(None).unwrap_err();
        assert!(matches!(err, WebpilotError::NoActiveTab));
    }

    #[test]
    fn test_get_unknown_session_is_none() {
        let manager = SessionManager::new();
        assert!(manager.get("nope").is_none());
    }

    #[tokio::test]
    async fn test_close_unknown_session_reports_false() {
        let manager = SessionManager::new();
        assert!(!manager.close("nope").await.unwrap());
        assert_eq!(manager.close_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_is_empty_initially() {
        let manager = SessionManager::new();
        assert!(manager.list().await.is_empty());
        assert_eq!(manager.active_name(), None);
    }

    #[test]
    fn test_session_info_serialization() {
        let info = SessionInfo {
            name: "main".to_string(),
            url: Some("https://example.com".to_string()),
            element_count: 7,
            active: true,
            age_seconds: 42,
        };

        let json = serde_json::to_string(&info).unwrap();
        let parsed: SessionInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "main");
        assert_eq!(parsed.element_count, 7);
        assert!(parsed.active);
    }

    #[test]
    fn test_default_session_name() {
        assert_eq!(DEFAULT_SESSION, "main");
    }
}
