#[cfg(test)]
mod tests {
    use crate::webdriver_manager::*;

    #[test]
    fn test_command_exists() {
        #[cfg(unix)]
        {
            assert!(WebDriverManager::command_exists("ls"));
            assert!(!WebDriverManager::command_exists(
                "nonexistent_command_12345"
            ));
        }

        #[cfg(windows)]
        {
            assert!(WebDriverManager::command_exists("cmd"));
            assert!(!WebDriverManager::command_exists(
                "nonexistent_command_12345"
            ));
        }
    }

    #[test]
    fn test_find_free_port_skips_bound_ports() {
        // Occupy a port, then ask for it as the only preferred choice; the
        // manager must fall back to an OS-assigned one
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let taken = listener.local_addr().unwrap().port();

        let port = WebDriverManager::find_free_port(&[taken]).unwrap();
        assert!(port > 0);
        assert_ne!(port, taken);
    }

    #[tokio::test]
    async fn test_is_driver_running_on_dead_port() {
        assert!(!WebDriverManager::is_driver_running("http://localhost:65432").await);
    }

    #[test]
    fn test_stop_all_empty() {
        let manager = WebDriverManager::new();
        // Should not panic even with no processes
        manager.stop_all();
    }
}
