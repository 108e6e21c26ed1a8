//! Interactive collaborators: fuzzy selection, the user's editor, the browser.

use anyhow::{Context, Result};
use dialoguer::FuzzySelect;
use std::path::Path;
use std::process::Command;

use crate::error::FlowError;

pub trait Selector {
    /// Let the user pick one row. `None` when aborted or `rows` is empty.
    fn select(&self, prompt: &str, rows: &[String]) -> Result<Option<usize>>;
}

pub trait TextEditor {
    /// Open `path` and block until the editor exits
    fn edit(&self, path: &Path) -> Result<()>;
}

pub trait Browser {
    fn open(&self, url: &str) -> Result<()>;

    /// Bring an existing tab whose URL starts with `prefix` to the front,
    /// or open `url` in a new tab when there is none.
    fn focus_or_open(&self, url: &str, prefix: &str) -> Result<()>;
}

pub struct FuzzySelector;

impl Selector for FuzzySelector {
    fn select(&self, prompt: &str, rows: &[String]) -> Result<Option<usize>> {
        if rows.is_empty() {
            return Ok(None);
        }
        let choice = FuzzySelect::new()
            .with_prompt(prompt)
            .items(rows)
            .default(0)
            .interact_opt()?;
        Ok(choice)
    }
}

/// Runs an editor command line such as `vim` or `code --wait`
pub struct CommandEditor {
    command: String,
}

impl CommandEditor {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl TextEditor for CommandEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| FlowError::user_input("No editor configured"))?;
        let args: Vec<&str> = parts.collect();

        crate::debug_log!("Opening {} with {}", path.display(), self.command);

        let status = Command::new(program)
            .args(&args)
            .arg(path)
            .status()
            .with_context(|| format!("Failed to launch editor '{}'", program))?;

        if !status.success() {
            return Err(FlowError::external(
                "editor",
                format!("'{}' exited with {}", program, status),
            )
            .into());
        }
        Ok(())
    }
}

pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        open::that(url).with_context(|| format!("Failed to open {}", url))
    }

    fn focus_or_open(&self, url: &str, prefix: &str) -> Result<()> {
        if focus_existing_tab(prefix) {
            crate::debug_log!("Focused existing tab for {}", prefix);
            return Ok(());
        }
        self.open(url)
    }
}

#[cfg(target_os = "macos")]
const FOCUS_TAB_SCRIPT: &str = r#"
on run argv
    set prefix to item 1 of argv
    tell application "System Events"
        if not (exists process "Google Chrome") then return "missing"
    end tell
    tell application "Google Chrome"
        repeat with w in windows
            set tabIndex to 0
            repeat with t in tabs of w
                set tabIndex to tabIndex + 1
                if URL of t starts with prefix then
                    set active tab index of w to tabIndex
                    set index of w to 1
                    activate
                    return "found"
                end if
            end repeat
        end repeat
    end tell
    return "missing"
end run
"#;

#[cfg(target_os = "macos")]
fn focus_existing_tab(prefix: &str) -> bool {
    Command::new("osascript")
        .args(["-e", FOCUS_TAB_SCRIPT, prefix])
        .output()
        .map(|o| o.status.success() && String::from_utf8_lossy(&o.stdout).trim() == "found")
        .unwrap_or(false)
}

#[cfg(not(target_os = "macos"))]
fn focus_existing_tab(_prefix: &str) -> bool {
    false
}
