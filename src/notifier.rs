//! Desktop notifications
//!
//! Delivered through the platform's command-line helper: `osascript` on
//! macOS, `notify-send` on Linux and the BSDs.

use std::process::{Command, Stdio};

use crate::error::{HousekeeperError, HousekeeperResult};
use crate::watcher::{CreationEvent, ItemType};

/// Application name shown by the notification server
pub const APP_DISPLAY_NAME: &str = "Housekeeper";

/// Capability to show a desktop notification
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> HousekeeperResult<()>;
}

/// Title and body for a creation event
pub fn message_for(event: &CreationEvent) -> (String, String) {
    let title = match event.item_type {
        ItemType::File => "New file detected",
        ItemType::Directory => "New directory detected",
    };
    (title.to_string(), event.path.display().to_string())
}

/// Notifications through the platform helper
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "macos")]
    fn command(title: &str, body: &str) -> HousekeeperResult<Command> {
        let script = format!(
            "display notification {} with title {}",
            applescript_string(body),
            applescript_string(title)
        );
        let mut cmd = Command::new("osascript");
        cmd.arg("-e").arg(script);
        Ok(cmd)
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn command(title: &str, body: &str) -> HousekeeperResult<Command> {
        const EXPIRE_MS: u32 = 5000;

        let mut cmd = Command::new("notify-send");
        cmd.arg(format!("--app-name={APP_DISPLAY_NAME}"))
            .arg(format!("--expire-time={EXPIRE_MS}"))
            .arg("--")
            .arg(title)
            .arg(body);
        Ok(cmd)
    }

    #[cfg(not(unix))]
    fn command(_title: &str, _body: &str) -> HousekeeperResult<Command> {
        Err(HousekeeperError::NotificationUnavailable {
            reason: "no notification helper for this platform".to_string(),
        })
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> HousekeeperResult<()> {
        let output = Self::command(title, body)?
            .stdin(Stdio::null())
            .output()
            .map_err(|e| HousekeeperError::NotificationUnavailable {
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(HousekeeperError::NotificationUnavailable {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _body: &str) -> HousekeeperResult<()> {
        Ok(())
    }
}

/// Quote `s` as an AppleScript string literal
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn applescript_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_for_file() {
        let event = CreationEvent::new("/home/me/Downloads/report.pdf", ItemType::File);
        let (title, body) = message_for(&event);
        assert_eq!(title, "New file detected");
        assert_eq!(body, "/home/me/Downloads/report.pdf");
    }

    #[test]
    fn test_message_for_directory() {
        let event = CreationEvent::new("/home/me/Downloads/photos", ItemType::Directory);
        let (title, _) = message_for(&event);
        assert_eq!(title, "New directory detected");
    }

    #[test]
    fn test_applescript_string_escapes() {
        assert_eq!(applescript_string("plain"), "\"plain\"");
        assert_eq!(
            applescript_string(r#"say "hi" \ bye"#),
            r#""say \"hi\" \\ bye""#
        );
    }

    #[test]
    fn test_null_notifier_always_succeeds() {
        assert!(NullNotifier.notify("title", "body").is_ok());
    }
}
