//! In-process collaborator doubles for unit tests.
//!
//! Each double is `Clone` and shares its state through `Rc`, so a test can
//! keep a handle after boxing a copy into an `AppContext`.

use anyhow::Result;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

use crate::api::HostingApi;
use crate::api::models::{BranchRef, NewPullRequest, PullRequest, User};
use crate::config::manager::{EnvSnapshot, FileConfig, Settings};
use crate::context::AppContext;
use crate::display::ui::Console;
use crate::error::FlowError;
use crate::external::{Browser, Selector, TextEditor};
use crate::git::{RepoSlug, Vcs};

#[derive(Clone)]
pub struct FakeVcs {
    branch: Rc<RefCell<String>>,
    primary: String,
    status: String,
    staged: bool,
    remote: String,
    fail_on: Option<&'static str>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl Default for FakeVcs {
    fn default() -> Self {
        Self {
            branch: Rc::new(RefCell::new("main".to_string())),
            primary: "main".to_string(),
            status: String::new(),
            staged: true,
            remote: "git@github.com:acme/app.git".to_string(),
            fail_on: None,
            calls: Rc::default(),
        }
    }
}

impl FakeVcs {
    pub fn on_branch(self, branch: &str) -> Self {
        *self.branch.borrow_mut() = branch.to_string();
        self
    }

    pub fn dirty(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn nothing_staged(mut self) -> Self {
        self.staged = false;
        self
    }

    /// Make the named mutating operation fail
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Mutating operations performed so far, e.g. `"checkout feature/x"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, operation: &'static str, detail: &str) -> Result<()> {
        if self.fail_on == Some(operation) {
            return Err(FlowError::external("git", format!("{} rejected", operation)).into());
        }
        let call = if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{} {}", operation, detail)
        };
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Vcs for FakeVcs {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.borrow().clone())
    }

    fn primary_branch_name(&self) -> Result<String> {
        Ok(self.primary.clone())
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        Ok(self.status.is_empty())
    }

    fn status_summary(&self) -> Result<String> {
        Ok(self.status.clone())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        Ok(self.staged)
    }

    fn remote_url(&self, _remote: &str) -> Result<String> {
        Ok(self.remote.clone())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.record("fetch", remote)
    }

    fn pull(&self) -> Result<()> {
        self.record("pull", "")
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record("push", &format!("{} {}", remote, branch))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record("checkout", branch)?;
        *self.branch.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.record("create_branch", branch)?;
        *self.branch.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record("commit", message)
    }
}

pub fn pull_request(number: u64, title: &str, head: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        html_url: format!("https://github.com/acme/app/pull/{}", number),
        body: Some(format!("Body of #{}", number)),
        state: "open".to_string(),
        draft: false,
        user: User {
            login: "jdoe".to_string(),
        },
        head: BranchRef {
            name: head.to_string(),
        },
        base: BranchRef {
            name: "main".to_string(),
        },
    }
}

#[derive(Clone, Default)]
pub struct FakeHosting {
    pub prs: Rc<RefCell<Vec<PullRequest>>>,
    pub created: Rc<RefCell<Vec<NewPullRequest>>>,
    pub reviewers: Rc<RefCell<Vec<(u64, Vec<String>)>>>,
    pub body_updates: Rc<RefCell<Vec<(u64, String)>>>,
    pub fail_create: bool,
}

impl FakeHosting {
    pub fn with_prs(prs: Vec<PullRequest>) -> Self {
        let hosting = Self::default();
        *hosting.prs.borrow_mut() = prs;
        hosting
    }
}

impl HostingApi for FakeHosting {
    fn list_pull_requests(&self, _repo: &RepoSlug) -> Result<Vec<PullRequest>> {
        Ok(self.prs.borrow().clone())
    }

    fn find_pull_request_by_branch(
        &self,
        _repo: &RepoSlug,
        branch: &str,
    ) -> Result<Option<PullRequest>> {
        Ok(self
            .prs
            .borrow()
            .iter()
            .find(|pr| pr.head.name == branch)
            .cloned())
    }

    fn create_pull_request(&self, repo: &RepoSlug, new: &NewPullRequest) -> Result<PullRequest> {
        if self.fail_create {
            return Err(FlowError::external("GitHub API", "(422) Validation Failed").into());
        }
        self.created.borrow_mut().push(new.clone());

        let number = self.prs.borrow().len() as u64 + 1;
        let mut pr = pull_request(number, &new.title, &new.head);
        pr.html_url = format!("https://github.com/{}/pull/{}", repo, number);
        pr.body = new.body.clone();
        pr.draft = new.draft;
        self.prs.borrow_mut().push(pr.clone());
        Ok(pr)
    }

    fn request_reviewers(
        &self,
        _repo: &RepoSlug,
        number: u64,
        reviewers: &[String],
    ) -> Result<()> {
        self.reviewers
            .borrow_mut()
            .push((number, reviewers.to_vec()));
        Ok(())
    }

    fn update_pull_request_body(
        &self,
        _repo: &RepoSlug,
        number: u64,
        body: &str,
    ) -> Result<PullRequest> {
        self.body_updates
            .borrow_mut()
            .push((number, body.to_string()));
        let mut prs = self.prs.borrow_mut();
        let pr = prs
            .iter_mut()
            .find(|pr| pr.number == number)
            .ok_or_else(|| FlowError::external("GitHub API", "(404) Not Found"))?;
        pr.body = Some(body.to_string());
        Ok(pr.clone())
    }
}

#[derive(Clone, Default)]
pub struct FakeSelector {
    pub choice: Option<usize>,
    pub shown: Rc<RefCell<Vec<String>>>,
}

impl FakeSelector {
    pub fn choosing(index: usize) -> Self {
        Self {
            choice: Some(index),
            ..Default::default()
        }
    }
}

impl Selector for FakeSelector {
    fn select(&self, _prompt: &str, rows: &[String]) -> Result<Option<usize>> {
        self.shown.borrow_mut().extend(rows.iter().cloned());
        Ok(self.choice)
    }
}

/// Replaces the file contents with `replacement`, or leaves it untouched
#[derive(Clone, Default)]
pub struct FakeEditor {
    pub replacement: Option<String>,
    pub opened: Rc<RefCell<Vec<PathBuf>>>,
}

impl TextEditor for FakeEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        self.opened.borrow_mut().push(path.to_path_buf());
        if let Some(text) = &self.replacement {
            std::fs::write(path, text)?;
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeBrowser {
    /// `(url, focus prefix)`
    pub visits: Rc<RefCell<Vec<(String, Option<String>)>>>,
}

impl Browser for FakeBrowser {
    fn open(&self, url: &str) -> Result<()> {
        self.visits.borrow_mut().push((url.to_string(), None));
        Ok(())
    }

    fn focus_or_open(&self, url: &str, prefix: &str) -> Result<()> {
        self.visits
            .borrow_mut()
            .push((url.to_string(), Some(prefix.to_string())));
        Ok(())
    }
}

/// A full set of doubles plus scratch directories
pub struct TestBed {
    pub vcs: FakeVcs,
    pub hosting: FakeHosting,
    pub selector: FakeSelector,
    pub editor: FakeEditor,
    pub browser: FakeBrowser,
    pub file: FileConfig,
    pub dir: TempDir,
}

impl Default for TestBed {
    fn default() -> Self {
        Self {
            vcs: FakeVcs::default(),
            hosting: FakeHosting::default(),
            selector: FakeSelector::default(),
            editor: FakeEditor::default(),
            browser: FakeBrowser::default(),
            file: FileConfig {
                branch_prefix: Some("jdoe".to_string()),
                ..Default::default()
            },
            dir: TempDir::new().expect("temp dir"),
        }
    }
}

impl TestBed {
    pub fn context(&self) -> AppContext {
        let settings = Settings::resolve(
            self.file.clone(),
            &EnvSnapshot::default(),
            self.dir.path().join("config"),
            self.dir.path().join("tmp"),
        );
        AppContext {
            settings,
            console: Console::captured(),
            vcs: Box::new(self.vcs.clone()),
            hosting: Box::new(self.hosting.clone()),
            selector: Box::new(self.selector.clone()),
            editor: Box::new(self.editor.clone()),
            browser: Box::new(self.browser.clone()),
        }
    }
}
