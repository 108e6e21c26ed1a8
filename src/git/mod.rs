use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Command;

use crate::error::FlowError;

/// Version-control operations the commands and the maintenance gate rely on
pub trait Vcs {
    fn current_branch(&self) -> Result<String>;
    fn primary_branch_name(&self) -> Result<String>;
    fn is_working_tree_clean(&self) -> Result<bool>;
    /// Porcelain status, shown when a clean tree was required
    fn status_summary(&self) -> Result<String>;
    fn has_staged_changes(&self) -> Result<bool>;
    fn remote_url(&self, remote: &str) -> Result<String>;
    fn fetch(&self, remote: &str) -> Result<()>;
    fn pull(&self) -> Result<()>;
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
    fn checkout(&self, branch: &str) -> Result<()>;
    fn create_branch(&self, branch: &str) -> Result<()>;
    fn commit(&self, message: &str) -> Result<()>;
}

/// `Vcs` backed by the `git` executable
pub struct GitCli {
    dir: Option<PathBuf>,
    remote: String,
}

impl GitCli {
    /// Git in the current working directory
    pub fn new(remote: &str) -> Self {
        Self {
            dir: None,
            remote: remote.to_string(),
        }
    }

    /// Git in another checkout
    pub fn at(dir: PathBuf, remote: &str) -> Self {
        Self {
            dir: Some(dir),
            remote: remote.to_string(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        crate::utils::debug::log_command("git", args);
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        cmd.args(args);
        cmd
    }

    /// Run git and return trimmed stdout; a non-zero exit surfaces git's stderr
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self
            .command(args)
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(FlowError::external("git", stderr).into());
        }

        let stdout = String::from_utf8(output.stdout).context("Invalid UTF-8 in git output")?;
        Ok(stdout.trim().to_string())
    }

    /// Exit status only, for queries like `show-ref --verify`
    fn succeeds(&self, args: &[&str]) -> bool {
        self.command(args)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Vcs for GitCli {
    fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn primary_branch_name(&self) -> Result<String> {
        let head_ref = format!("refs/remotes/{}/HEAD", self.remote);
        if let Ok(symbolic) = self.run(&["symbolic-ref", "--short", &head_ref]) {
            let prefix = format!("{}/", self.remote);
            if let Some(name) = symbolic.strip_prefix(&prefix) {
                return Ok(name.to_string());
            }
        }

        for candidate in ["main", "master"] {
            let local_ref = format!("refs/heads/{}", candidate);
            if self.succeeds(&["show-ref", "--verify", "--quiet", &local_ref]) {
                return Ok(candidate.to_string());
            }
        }

        Ok("main".to_string())
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        Ok(self.status_summary()?.is_empty())
    }

    fn status_summary(&self) -> Result<String> {
        self.run(&["status", "--porcelain"])
    }

    fn has_staged_changes(&self) -> Result<bool> {
        // `diff --cached --quiet` exits 1 when something is staged
        Ok(!self.succeeds(&["diff", "--cached", "--quiet"]))
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.run(&["remote", "get-url", remote])
            .with_context(|| format!("No remote '{}' found", remote))
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.run(&["fetch", remote]).map(|_| ())
    }

    fn pull(&self) -> Result<()> {
        self.run(&["pull", "--ff-only"]).map(|_| ())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "--set-upstream", remote, branch])
            .map(|_| ())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).map(|_| ())
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch]).map(|_| ())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).map(|_| ())
    }
}

/// Owner and name of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    /// Parse `owner/repo`
    pub fn parse(value: &str) -> Result<Self> {
        let (owner, name) = value
            .trim()
            .split_once('/')
            .filter(|(o, n)| !o.is_empty() && !n.is_empty() && !n.contains('/'))
            .ok_or_else(|| {
                FlowError::user_input(format!(
                    "Invalid repository '{}'. Expected owner/repo",
                    value
                ))
            })?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse a GitHub remote URL
    pub fn from_remote_url(url: &str) -> Result<Self> {
        // Handles:
        // - git@github.com:owner/repo.git
        // - https://github.com/owner/repo.git
        // - https://token@github.com/owner/repo
        // - ssh://git@github.com/owner/repo.git
        let cleaned = url
            .trim()
            .trim_start_matches("ssh://")
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let cleaned = cleaned.rsplit('@').next().unwrap_or(cleaned);

        let path = cleaned
            .strip_prefix("github.com/")
            .or_else(|| cleaned.strip_prefix("github.com:"))
            .ok_or_else(|| anyhow::anyhow!("Could not parse GitHub URL: {}", url))?;

        Self::parse(path.trim_end_matches('/').trim_end_matches(".git"))
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
