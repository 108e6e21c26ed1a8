use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;

/// Keys accepted in `config.toml`, `.prflow` and `PRFLOW_*` variables
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FileConfig {
    pub branch_prefix: Option<String>,
    pub default_reviewer: Option<String>,
    pub remote: Option<String>,
    /// `owner/repo`, overrides the remote URL
    pub repository: Option<String>,
    pub api_url: Option<String>,
    pub editor: Option<String>,
    /// Checkout of prflow itself, kept current by the maintenance gate
    pub self_repo: Option<PathBuf>,
    pub maintenance_interval_hours: Option<u64>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        let global = get_config_dir().map(|dir| {
            dir.join(constants::CONFIG_DIR_NAME)
                .join(constants::CONFIG_FILE_NAME)
        });
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;

        let builder = file_sources(global.as_deref(), &current_dir)
            .add_source(Environment::with_prefix(constants::ENV_PREFIX).try_parsing(true));

        deserialize(builder)
    }
}

/// Global config first, then the nearest `.prflow` walking up from
/// `start_dir`. Later sources override earlier ones.
fn file_sources(global: Option<&Path>, start_dir: &Path) -> ConfigBuilder<DefaultState> {
    let mut builder = Config::builder();

    if let Some(global) = global.filter(|p| p.exists()) {
        builder = builder.add_source(config::File::from(global).format(FileFormat::Toml));
    }

    let mut dir = start_dir.to_path_buf();
    loop {
        let local = dir.join(constants::LOCAL_CONFIG_FILE_NAME);
        if local.is_file() {
            crate::debug_log!("Using local config {}", local.display());
            builder = builder.add_source(config::File::from(local).format(FileFormat::Toml));
            break;
        }
        if !dir.pop() {
            break;
        }
    }

    builder
}

fn deserialize(builder: ConfigBuilder<DefaultState>) -> Result<FileConfig> {
    builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Environment values prflow reads, captured once at startup
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    pub visual: Option<String>,
    pub editor: Option<String>,
    pub github_token: Option<String>,
    pub gh_token: Option<String>,
    pub no_color: bool,
}

impl EnvSnapshot {
    pub fn capture() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            visual: var("VISUAL"),
            editor: var("EDITOR"),
            github_token: var("GITHUB_TOKEN"),
            gh_token: var("GH_TOKEN"),
            no_color: std::env::var_os("NO_COLOR").is_some(),
        }
    }
}

/// Fully resolved configuration handed to the gate and every handler
#[derive(Debug, Clone)]
pub struct Settings {
    pub branch_prefix: Option<String>,
    pub default_reviewer: Option<String>,
    pub remote: String,
    pub repository: Option<String>,
    pub api_url: String,
    pub github_token: Option<String>,
    pub editor: String,
    pub self_repo: Option<PathBuf>,
    pub maintenance_interval: Duration,
    pub config_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub verbose: bool,
    pub color: bool,
}

impl Settings {
    pub fn load(env: &EnvSnapshot) -> Result<Self> {
        let file = FileConfig::load()?;
        Ok(Self::with_default_dirs(file, env))
    }

    /// Resolve against the per-user config dir and the system temp dir
    pub fn with_default_dirs(file: FileConfig, env: &EnvSnapshot) -> Self {
        let config_dir = get_config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(constants::CONFIG_DIR_NAME);
        let temp_dir = std::env::temp_dir().join(constants::TEMP_DIR_NAME);
        Self::resolve(file, env, config_dir, temp_dir)
    }

    pub fn resolve(
        file: FileConfig,
        env: &EnvSnapshot,
        config_dir: PathBuf,
        temp_dir: PathBuf,
    ) -> Self {
        let editor = file
            .editor
            .or_else(|| env.visual.clone())
            .or_else(|| env.editor.clone())
            .unwrap_or_else(|| constants::DEFAULT_EDITOR.to_string());

        let hours = file
            .maintenance_interval_hours
            .unwrap_or(constants::MAINTENANCE_INTERVAL_HOURS);

        Self {
            branch_prefix: file.branch_prefix,
            default_reviewer: file.default_reviewer,
            remote: file
                .remote
                .unwrap_or_else(|| constants::DEFAULT_REMOTE.to_string()),
            repository: file.repository,
            api_url: file
                .api_url
                .unwrap_or_else(|| constants::DEFAULT_API_URL.to_string()),
            github_token: env.github_token.clone().or_else(|| env.gh_token.clone()),
            editor,
            self_repo: file.self_repo,
            maintenance_interval: Duration::from_secs(hours.saturating_mul(60 * 60)),
            config_dir,
            temp_dir,
            verbose: file.verbose.unwrap_or(false),
            color: !env.no_color && !file.no_color.unwrap_or(false),
        }
    }

    pub fn maintenance_stamp_path(&self) -> PathBuf {
        self.config_dir.join(constants::MAINTENANCE_STAMP_FILE)
    }

    pub fn scratch_path(&self, branch: &str) -> PathBuf {
        self.temp_dir
            .join(crate::utils::text::scratch_file_name(branch))
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir().map(|h| h.join(".config"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
    }
}
