pub mod client;
pub mod models;

use anyhow::Result;

use crate::git::RepoSlug;
use models::{NewPullRequest, PullRequest};

/// Pull-request operations on the code host
pub trait HostingApi {
    fn list_pull_requests(&self, repo: &RepoSlug) -> Result<Vec<PullRequest>>;
    fn find_pull_request_by_branch(
        &self,
        repo: &RepoSlug,
        branch: &str,
    ) -> Result<Option<PullRequest>>;
    fn create_pull_request(&self, repo: &RepoSlug, pr: &NewPullRequest) -> Result<PullRequest>;
    fn request_reviewers(&self, repo: &RepoSlug, number: u64, reviewers: &[String])
    -> Result<()>;
    fn update_pull_request_body(
        &self,
        repo: &RepoSlug,
        number: u64,
        body: &str,
    ) -> Result<PullRequest>;
}
