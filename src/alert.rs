//! Operator alerts and desktop housekeeping

use std::process::Command;
use log::{debug, info, warn};

/// Surfaces messages to the person running the collator
pub trait Notifier: Send + Sync {
    /// Show `message`; when `blocking`, return only once it is dismissed
    fn notify(&self, message: &str, blocking: bool);
}

/// Writes alerts to the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, _blocking: bool) {
        info!("ALERT: {}", message);
    }
}

/// Shows alerts through the platform's dialog or notification command
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    #[cfg(target_os = "macos")]
    fn command(message: &str) -> Option<Command> {
        let mut cmd = Command::new("osascript");
        cmd.arg("-e")
            .arg(format!("display alert \"{}\"", escape_applescript(message)));
        Some(cmd)
    }

    #[cfg(target_os = "linux")]
    fn command(message: &str) -> Option<Command> {
        let mut cmd = Command::new("notify-send");
        cmd.arg("quipt-collator").arg(message);
        Some(cmd)
    }

    #[cfg(target_os = "windows")]
    fn command(message: &str) -> Option<Command> {
        let mut cmd = Command::new("msg");
        cmd.arg("*").arg(message);
        Some(cmd)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    fn command(_message: &str) -> Option<Command> {
        None
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str, blocking: bool) {
        info!("ALERT: {}", message);

        let Some(mut cmd) = Self::command(message) else {
            return;
        };

        if blocking {
            if let Err(e) = cmd.status() {
                warn!("Could not display alert: {}", e);
            }
            return;
        }

        match cmd.spawn() {
            Ok(mut child) => {
                // Reap in the background so the dialog does not block ingestion
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => warn!("Could not display alert: {}", e),
        }
    }
}

/// Escape a message for use inside an AppleScript string literal
pub fn escape_applescript(message: &str) -> String {
    message.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Dismiss the Preview window the virtual printer opens after saving a PDF
///
/// Only meaningful on macOS; elsewhere this does nothing.
pub fn close_viewer_window() {
    #[cfg(target_os = "macos")]
    {
        let script = r#"tell application "System Events" to click first button of (first window of process "Preview")"#;
        match Command::new("osascript").arg("-e").arg(script).output() {
            Ok(output) if !output.status.success() => debug!(
                "Viewer window cleanup failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Ok(_) => {}
            Err(e) => debug!("Viewer window cleanup failed: {}", e),
        }
    }
    #[cfg(not(target_os = "macos"))]
    {
        debug!("Viewer window cleanup is only supported on macOS");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_applescript() {
        assert_eq!(escape_applescript("plain"), "plain");
        assert_eq!(
            escape_applescript(r#"Set the folder to: "./in\box""#),
            r#"Set the folder to: \"./in\\box\""#
        );
    }

    #[test]
    fn test_log_notifier_does_not_block() {
        LogNotifier.notify("quipt-collator started", true);
    }
}
