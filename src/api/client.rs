use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, HeaderMap, LINK, USER_AGENT};
use serde::de::DeserializeOwned;

use super::HostingApi;
use super::models::{BodyUpdate, NewPullRequest, PullRequest, ReviewerRequest};
use crate::error::FlowError;
use crate::git::RepoSlug;

const PAGE_SIZE: u32 = 100;
const MAX_LISTED: usize = 500;

/// GitHub REST API client
///
/// Uses a blocking HTTP client; prflow runs one request at a time.
/// Authenticates with a bearer token when one is configured.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, `https://api.github.com` for github.com
    /// * `token` - Optional personal access token
    pub fn new(base_url: String, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub(crate) fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };

        crate::debug_log!("Requesting: {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, crate::constants::PRFLOW_IDENTIFIER)
            .header("X-GitHub-Api-Version", "2022-11-28");

        match &self.token {
            Some(token) => request = request.bearer_auth(token),
            None => crate::utils::debug::log("No token configured for this request."),
        }

        request
    }

    /// Send a request and fail with the API's own error text on non-2xx
    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().context("Failed to send request")?;
        crate::debug_log!("Response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(FlowError::external(
                "GitHub API",
                format!("({}) {}", status, error_text),
            )
            .into());
        }

        Ok(response)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.send(request)?
            .json::<T>()
            .context("Failed to parse JSON response")
    }

    fn pulls_path(repo: &RepoSlug) -> String {
        format!("/repos/{}/{}/pulls", repo.owner, repo.name)
    }
}

/// Extract the `rel="next"` target from a `Link` header
fn next_page(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if params.split(';').any(|p| p.trim() == "rel=\"next\"") {
            Some(
                target
                    .trim()
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            )
        } else {
            None
        }
    })
}

impl HostingApi for GitHubClient {
    fn list_pull_requests(&self, repo: &RepoSlug) -> Result<Vec<PullRequest>> {
        let mut all_prs = Vec::new();
        let mut path = format!(
            "{}?state=open&per_page={}",
            Self::pulls_path(repo),
            PAGE_SIZE
        );

        loop {
            let response = self.send(self.build_request(Method::GET, &path))?;
            let next = next_page(response.headers());
            let page: Vec<PullRequest> = response
                .json()
                .context("Failed to parse JSON response")?;
            all_prs.extend(page);

            if all_prs.len() >= MAX_LISTED {
                all_prs.truncate(MAX_LISTED);
                break;
            }

            match next {
                Some(next_url) => path = next_url,
                None => break,
            }
        }

        Ok(all_prs)
    }

    fn find_pull_request_by_branch(
        &self,
        repo: &RepoSlug,
        branch: &str,
    ) -> Result<Option<PullRequest>> {
        let head = format!("{}:{}", repo.owner, branch);
        let request = self
            .build_request(Method::GET, &Self::pulls_path(repo))
            .query(&[("head", head.as_str()), ("state", "open")]);

        let prs: Vec<PullRequest> = self.send_json(request)?;
        Ok(prs.into_iter().next())
    }

    fn create_pull_request(&self, repo: &RepoSlug, pr: &NewPullRequest) -> Result<PullRequest> {
        let request = self
            .build_request(Method::POST, &Self::pulls_path(repo))
            .json(pr);
        self.send_json(request)
    }

    fn request_reviewers(
        &self,
        repo: &RepoSlug,
        number: u64,
        reviewers: &[String],
    ) -> Result<()> {
        let path = format!("{}/{}/requested_reviewers", Self::pulls_path(repo), number);
        let request = self
            .build_request(Method::POST, &path)
            .json(&ReviewerRequest { reviewers });
        self.send(request)?;
        Ok(())
    }

    fn update_pull_request_body(
        &self,
        repo: &RepoSlug,
        number: u64,
        body: &str,
    ) -> Result<PullRequest> {
        let path = format!("{}/{}", Self::pulls_path(repo), number);
        let request = self
            .build_request(Method::PATCH, &path)
            .json(&BodyUpdate { body });
        self.send_json(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{AUTHORIZATION, HeaderValue};

    #[test]
    fn test_auth_header_presence() {
        let client = GitHubClient::new(
            "https://api.github.com".to_string(),
            Some("ghp_secret".to_string()),
        )
        .unwrap();

        let request = client.build_request(Method::GET, "/user").build().unwrap();

        let auth_header = request.headers().get(AUTHORIZATION);
        assert!(
            auth_header.is_some(),
            "Authorization header should be present"
        );
        let auth_str = auth_header.unwrap().to_str().unwrap();
        assert!(
            auth_str.starts_with("Bearer "),
            "Authorization header should be a bearer token"
        );
    }

    #[test]
    fn test_no_auth_header() {
        let client = GitHubClient::new("https://api.github.com".to_string(), None).unwrap();

        let request = client.build_request(Method::GET, "/user").build().unwrap();

        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert!(request.headers().get(USER_AGENT).is_some());
    }

    #[test]
    fn test_build_request_joins_paths_and_keeps_absolute_urls() {
        let client = GitHubClient::new("https://api.github.com/".to_string(), None).unwrap();

        let relative = client
            .build_request(Method::GET, "/repos/a/b/pulls")
            .build()
            .unwrap();
        assert_eq!(relative.url().as_str(), "https://api.github.com/repos/a/b/pulls");

        let absolute = client
            .build_request(Method::GET, "https://api.github.com/repositories/1/pulls?page=2")
            .build()
            .unwrap();
        assert_eq!(
            absolute.url().as_str(),
            "https://api.github.com/repositories/1/pulls?page=2"
        );
    }

    #[test]
    fn test_next_page_from_link_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                "<https://api.github.com/repositories/1/pulls?page=2>; rel=\"next\", \
                 <https://api.github.com/repositories/1/pulls?page=5>; rel=\"last\"",
            ),
        );
        assert_eq!(
            next_page(&headers).as_deref(),
            Some("https://api.github.com/repositories/1/pulls?page=2")
        );

        let mut last_page = HeaderMap::new();
        last_page.insert(
            LINK,
            HeaderValue::from_static("<https://api.github.com/x?page=1>; rel=\"prev\""),
        );
        assert!(next_page(&last_page).is_none());
        assert!(next_page(&HeaderMap::new()).is_none());
    }
}
