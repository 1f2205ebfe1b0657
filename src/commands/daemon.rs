use anyhow::Result;
use clap::Subcommand;

use crate::daemon::{Daemon, DaemonClient, DaemonRequest, DaemonResponse};
use crate::webdriver::BrowserType;

#[derive(Subcommand)]
pub enum DaemonCommands {
    /// Run the daemon (in foreground)
    Run {
        /// Browser type to use (firefox or chrome)
        #[arg(long, default_value = "chrome")]
        browser: BrowserType,

        /// Run the browser with a visible window
        #[arg(long = "no-headless")]
        no_headless: bool,
    },

    /// Start the daemon in the background
    Start {
        /// Browser type to use (firefox or chrome)
        #[arg(long, default_value = "chrome")]
        browser: BrowserType,

        /// Run the browser with a visible window
        #[arg(long = "no-headless")]
        no_headless: bool,
    },

    /// Stop the daemon
    Stop,

    /// Check daemon status
    Status,
}

pub async fn handle_daemon(command: DaemonCommands) -> Result<()> {
    match command {
        DaemonCommands::Run {
            browser,
            no_headless,
        } => {
            if Daemon::is_running() {
                println!("Daemon is already running");
            } else {
                println!("Starting daemon with browser: {}...", browser);
                let mut daemon = Daemon::new(browser, !no_headless)?;
                daemon.start().await?;
            }
        }
        DaemonCommands::Start {
            browser,
            no_headless,
        } => {
            if Daemon::is_running() {
                println!("Daemon is already running");
            } else {
                println!("Starting daemon in background...");

                let log_dir = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
                let log_file = log_dir.join("webpilot-daemon.log");

                // Fork and daemonize on Unix
                #[cfg(unix)]
                {
                    use nix::unistd::{ForkResult, fork, setsid};
                    use std::os::unix::io::AsRawFd;
                    use std::os::unix::process::CommandExt;

                    match unsafe { fork() } {
                        Ok(ForkResult::Parent { .. }) => {
                            // Parent: wait for the child to come up
                            let mut daemon_started = false;
                            for i in 0..10 {
                                std::thread::sleep(std::time::Duration::from_millis(500));
                                if Daemon::is_running() {
                                    daemon_started = true;
                                    break;
                                }
                                if i == 0 {
                                    std::thread::sleep(std::time::Duration::from_millis(1500));
                                }
                            }

                            if daemon_started {
                                println!("Daemon started successfully");
                                println!("Log file: {}", log_file.display());
                            } else {
                                eprintln!(
                                    "Failed to start daemon. Check log file: {}",
                                    log_file.display()
                                );
                            }
                        }
                        Ok(ForkResult::Child) => {
                            // Child: detach and re-exec as `daemon run` so the
                            // Tokio runtime starts fresh
                            let _ = setsid();

                            let log_fd = std::fs::OpenOptions::new()
                                .create(true)
                                .append(true)
                                .open(&log_file)?;
                            let log_fd = log_fd.as_raw_fd();
                            nix::unistd::dup2(log_fd, 1)?; // stdout
                            nix::unistd::dup2(log_fd, 2)?; // stderr
                            nix::unistd::close(0)?;

                            let exe_path = std::env::current_exe()?;
                            let mut cmd = std::process::Command::new(exe_path);
                            cmd.arg("daemon")
                                .arg("run")
                                .arg("--browser")
                                .arg(browser.to_string());
                            if no_headless {
                                cmd.arg("--no-headless");
                            }
                            let _ = cmd.exec();

                            // If exec fails, exit
                            std::process::exit(1);
                        }
                        Err(e) => {
                            eprintln!("Fork failed: {}", e);
                        }
                    }
                }

                #[cfg(not(unix))]
                {
                    use std::process::Command;
                    let exe_path = std::env::current_exe()?;

                    let mut cmd = Command::new(&exe_path);
                    cmd.arg("daemon")
                        .arg("run")
                        .arg("--browser")
                        .arg(browser.to_string())
                        .stdin(std::process::Stdio::null())
                        .stdout(std::fs::File::create(&log_file)?)
                        .stderr(std::fs::File::create(&log_file)?);
                    if no_headless {
                        cmd.arg("--no-headless");
                    }
                    let child = cmd.spawn()?;
                    std::mem::forget(child);

                    let mut daemon_started = false;
                    for i in 0..10 {
                        std::thread::sleep(std::time::Duration::from_millis(500));
                        if Daemon::is_running() {
                            daemon_started = true;
                            break;
                        }
                        if i == 0 {
                            std::thread::sleep(std::time::Duration::from_millis(1500));
                        }
                    }

                    if daemon_started {
                        println!("Daemon started successfully");
                        println!("Log file: {}", log_file.display());
                    } else {
                        eprintln!(
                            "Failed to start daemon. Check log file: {}",
                            log_file.display()
                        );
                    }
                }
            }
        }
        DaemonCommands::Stop => {
            if DaemonClient::is_daemon_running() {
                match DaemonClient::send_request(DaemonRequest::Shutdown) {
                    Ok(_) => println!("Daemon stopped"),
                    Err(e) => println!("Failed to stop daemon: {}", e),
                }
            } else {
                println!("Daemon is not running");
            }
        }
        DaemonCommands::Status => {
            if DaemonClient::is_daemon_running() {
                match DaemonClient::send_request(DaemonRequest::Ping) {
                    Ok(DaemonResponse::Pong) => {
                        println!("Daemon is running");

                        if let Ok(DaemonResponse::SessionList(sessions)) =
                            DaemonClient::send_request(DaemonRequest::ListSessions)
                            && !sessions.is_empty()
                        {
                            println!("\nSessions:");
                            for session in sessions {
                                println!(
                                    "  {}{}: {} element(s)",
                                    session.name,
                                    if session.active { " [active]" } else { "" },
                                    session.element_count,
                                );
                            }
                        }
                    }
                    Ok(_) => println!("Daemon responded unexpectedly"),
                    Err(e) => println!("Daemon is not responding: {}", e),
                }
            } else {
                println!("Daemon is not running");
            }
        }
    }

    Ok(())
}
