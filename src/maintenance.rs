//! Throttled self-update.
//!
//! Every invocation consults a stamp file whose modification time records
//! the last successful update check. Once the interval has elapsed, and the
//! prflow checkout is clean and on its primary branch, it is fast-forwarded.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::config::manager::Settings;
use crate::display::ui::Console;
use crate::git::{GitCli, Vcs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No stamp yet
    Unknown,
    Fresh,
    Due,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// No prflow checkout configured
    Disabled,
    Initialized,
    Fresh,
    /// Preconditions failed; the stamp is untouched so the next run retries
    Skipped(String),
    Updated,
    Failed(String),
}

pub struct MaintenanceGate {
    stamp_path: PathBuf,
    threshold: Duration,
}

impl MaintenanceGate {
    pub fn new(stamp_path: PathBuf, threshold: Duration) -> Self {
        Self {
            stamp_path,
            threshold,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.maintenance_stamp_path(),
            settings.maintenance_interval,
        )
    }

    pub fn state(&self, now: SystemTime) -> Result<GateState> {
        if !self.stamp_path.exists() {
            return Ok(GateState::Unknown);
        }

        let last_checked = self
            .stamp_path
            .metadata()
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read {}", self.stamp_path.display()))?;

        // A stamp from the future counts as fresh
        let elapsed = now.duration_since(last_checked).unwrap_or_default();
        if elapsed >= self.threshold {
            Ok(GateState::Due)
        } else {
            Ok(GateState::Fresh)
        }
    }

    /// Evaluate the gate against `vcs`, the prflow checkout. Never fails;
    /// errors come back as `GateOutcome::Failed`.
    pub fn run(&self, vcs: &dyn Vcs, now: SystemTime) -> GateOutcome {
        self.try_run(vcs, now)
            .unwrap_or_else(|e| GateOutcome::Failed(format!("{:#}", e)))
    }

    fn try_run(&self, vcs: &dyn Vcs, now: SystemTime) -> Result<GateOutcome> {
        match self.state(now)? {
            GateState::Unknown => {
                self.touch(now)?;
                Ok(GateOutcome::Initialized)
            }
            GateState::Fresh => Ok(GateOutcome::Fresh),
            GateState::Due => {
                if !vcs.is_working_tree_clean()? {
                    return Ok(GateOutcome::Skipped(
                        "working tree has uncommitted changes".to_string(),
                    ));
                }

                let branch = vcs.current_branch()?;
                let primary = vcs.primary_branch_name()?;
                if branch != primary {
                    return Ok(GateOutcome::Skipped(format!(
                        "on '{}' instead of '{}'",
                        branch, primary
                    )));
                }

                vcs.pull()?;
                self.touch(now)?;
                Ok(GateOutcome::Updated)
            }
        }
    }

    fn touch(&self, now: SystemTime) -> Result<()> {
        if let Some(parent) = self.stamp_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = File::create(&self.stamp_path)
            .with_context(|| format!("Failed to write {}", self.stamp_path.display()))?;
        file.set_modified(now)
            .context("Failed to update maintenance timestamp")?;
        Ok(())
    }
}

/// Run the gate for the configured prflow checkout, reporting but never
/// propagating failures.
pub fn maybe_run_maintenance(settings: &Settings, console: &mut Console) -> GateOutcome {
    let outcome = match &settings.self_repo {
        None => GateOutcome::Disabled,
        Some(repo) => {
            let vcs = GitCli::at(repo.clone(), crate::constants::DEFAULT_REMOTE);
            MaintenanceGate::from_settings(settings).run(&vcs, SystemTime::now())
        }
    };
    report(settings, &outcome, console);
    outcome
}

/// Only an update or a failure is shown; stdout may be carrying JSON, so the
/// warning goes to stderr.
fn report(settings: &Settings, outcome: &GateOutcome, console: &mut Console) {
    match (outcome, &settings.self_repo) {
        (GateOutcome::Updated, Some(repo)) => {
            console.info(&format!("Updated prflow in {}", repo.display()))
        }
        (GateOutcome::Failed(reason), _) => {
            console.warning(&format!("Self-update check failed: {}", reason))
        }
        (outcome, _) => crate::debug_log!("Maintenance gate: {:?}", outcome),
    }
}
