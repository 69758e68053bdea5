//! macOS LaunchAgent: start the daemon at login
//!
//! The agent runs `housekeeper daemon run` under launchd, so the daemon's own
//! PID file and logging apply unchanged.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{HousekeeperError, HousekeeperResult};
use crate::paths;

/// launchd label, also the plist file stem
pub const LABEL: &str = "com.housekeeper.agent";

/// Plist, log directory and executable for the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchAgent {
    plist_path: PathBuf,
    log_dir: PathBuf,
    executable: PathBuf,
}

impl LaunchAgent {
    pub fn new(plist_path: PathBuf, log_dir: PathBuf, executable: PathBuf) -> Self {
        Self {
            plist_path,
            log_dir,
            executable,
        }
    }

    /// Agent under the user's `~/Library`, launching the current executable
    pub fn from_env() -> HousekeeperResult<Self> {
        let home = paths::home_dir().ok_or(HousekeeperError::NoAppDirectory { what: "home" })?;
        let library = home.join("Library");
        Ok(Self::new(
            library.join("LaunchAgents").join(format!("{LABEL}.plist")),
            library.join("Logs").join("Housekeeper"),
            std::env::current_exe()?,
        ))
    }

    pub fn plist_path(&self) -> &Path {
        &self.plist_path
    }

    pub fn is_installed(&self) -> bool {
        self.plist_path.exists()
    }

    pub fn render(&self) -> String {
        render_plist(&self.executable, &self.log_dir)
    }

    /// Write the plist and load it, replacing a loaded copy
    #[cfg(target_os = "macos")]
    pub fn install(&self) -> HousekeeperResult<()> {
        if let Some(parent) = self.plist_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::create_dir_all(&self.log_dir)?;

        if self.is_loaded()? {
            launchctl(&["unload"], &self.plist_path)?;
        }
        std::fs::write(&self.plist_path, self.render())?;
        launchctl(&["load"], &self.plist_path)
    }

    /// Unload and delete the plist; `false` if it was not installed
    #[cfg(target_os = "macos")]
    pub fn uninstall(&self) -> HousekeeperResult<bool> {
        if self.is_loaded()? {
            // Best effort; the plist goes regardless
            let _ = launchctl(&["unload"], &self.plist_path);
        }
        if !self.is_installed() {
            return Ok(false);
        }
        std::fs::remove_file(&self.plist_path)?;
        Ok(true)
    }

    /// Whether launchd currently knows the label
    #[cfg(target_os = "macos")]
    pub fn is_loaded(&self) -> HousekeeperResult<bool> {
        let status = std::process::Command::new("launchctl")
            .args(["list", LABEL])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()?;
        Ok(status.success())
    }

    #[cfg(not(target_os = "macos"))]
    pub fn install(&self) -> HousekeeperResult<()> {
        Err(unsupported())
    }

    #[cfg(not(target_os = "macos"))]
    pub fn uninstall(&self) -> HousekeeperResult<bool> {
        Err(unsupported())
    }

    #[cfg(not(target_os = "macos"))]
    pub fn is_loaded(&self) -> HousekeeperResult<bool> {
        Err(unsupported())
    }
}

#[cfg(not(target_os = "macos"))]
fn unsupported() -> HousekeeperError {
    HousekeeperError::Unsupported {
        feature: "launch agent",
    }
}

#[cfg(target_os = "macos")]
fn launchctl(args: &[&str], plist: &Path) -> HousekeeperResult<()> {
    let output = std::process::Command::new("launchctl")
        .args(args)
        .arg(plist)
        .stdin(std::process::Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(HousekeeperError::SubsystemInit {
            target: "launch agent".to_string(),
            reason: format!(
                "launchctl {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(())
}

/// LaunchAgent plist running `exe daemon run` at login
pub fn render_plist(exe: &Path, log_dir: &Path) -> String {
    let mut out = String::new();
    out.push_str(concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "\n",
        r#"<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">"#,
        "\n",
        r#"<plist version="1.0">"#,
        "\n<dict>\n",
    ));

    let _ = writeln!(out, "\t<key>Label</key>\n\t<string>{}</string>", escape_xml(LABEL));

    out.push_str("\t<key>ProgramArguments</key>\n\t<array>\n");
    for arg in [exe.display().to_string(), "daemon".into(), "run".into()] {
        let _ = writeln!(out, "\t\t<string>{}</string>", escape_xml(&arg));
    }
    out.push_str("\t</array>\n");

    out.push_str("\t<key>RunAtLoad</key>\n\t<true/>\n");
    out.push_str("\t<key>KeepAlive</key>\n\t<false/>\n");

    let stdout = log_dir.join("stdout.log");
    let stderr = log_dir.join("stderr.log");
    let _ = writeln!(
        out,
        "\t<key>StandardOutPath</key>\n\t<string>{}</string>",
        escape_xml(&stdout.display().to_string())
    );
    let _ = writeln!(
        out,
        "\t<key>StandardErrorPath</key>\n\t<string>{}</string>",
        escape_xml(&stderr.display().to_string())
    );

    out.push_str("\t<key>ProcessType</key>\n\t<string>Interactive</string>\n");
    out.push_str("</dict>\n</plist>\n");
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
