use anyhow::Result;

use crate::api::HostingApi;
use crate::api::client::GitHubClient;
use crate::config::manager::Settings;
use crate::display::ui::Console;
use crate::external::{Browser, CommandEditor, FuzzySelector, Selector, SystemBrowser, TextEditor};
use crate::git::{GitCli, RepoSlug, Vcs};

/// Everything a command handler may touch
pub struct AppContext {
    pub settings: Settings,
    pub console: Console,
    pub vcs: Box<dyn Vcs>,
    pub hosting: Box<dyn HostingApi>,
    pub selector: Box<dyn Selector>,
    pub editor: Box<dyn TextEditor>,
    pub browser: Box<dyn Browser>,
}

impl AppContext {
    /// Context wired to git, GitHub, the terminal and the desktop
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let hosting = GitHubClient::new(settings.api_url.clone(), settings.github_token.clone())?;
        Ok(Self {
            console: Console::terminal(settings.color),
            vcs: Box::new(GitCli::new(&settings.remote)),
            hosting: Box::new(hosting),
            selector: Box::new(FuzzySelector),
            editor: Box::new(CommandEditor::new(&settings.editor)),
            browser: Box::new(SystemBrowser),
            settings,
        })
    }

    /// Repository the PR commands act on: the `repository` setting, or
    /// the GitHub remote of the current checkout.
    pub fn repo_slug(&self) -> Result<RepoSlug> {
        if let Some(repo) = &self.settings.repository {
            return RepoSlug::parse(repo);
        }
        let url = self.vcs.remote_url(&self.settings.remote)?;
        RepoSlug::from_remote_url(&url)
    }
}
