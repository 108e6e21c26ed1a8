use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub body: Option<String>,
    pub state: String,
    #[serde(default)]
    pub draft: bool,
    pub user: User,
    pub head: BranchRef,
    pub base: BranchRef,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub name: String,
}

/// Payload for `POST /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub draft: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewerRequest<'a> {
    pub reviewers: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct BodyUpdate<'a> {
    pub body: &'a str,
}
