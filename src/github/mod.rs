pub mod types;

pub use types::{ChangedFile, FileStatus, PostOutcome};

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
}

/// Where accepted review output goes. The GitHub client is the real sink;
/// tests and `--dry-run` swap in recording/printing sinks.
#[async_trait]
pub trait CommentSink: Send + Sync {
    /// Post an inline review comment anchored to a line on the diff's
    /// right-hand side.
    async fn post_inline(
        &self,
        path: &str,
        line: u64,
        body: &str,
    ) -> Result<PostOutcome, GithubError>;

    /// Post a non-anchored issue-style comment on the pull request.
    async fn post_summary(&self, body: &str) -> Result<PostOutcome, GithubError>;
}

/// Client for the two GitHub surfaces the reviewer touches: the PR files
/// listing and the two comment-posting endpoints.
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
    pr_number: u64,
    commit_sha: String,
}

const USER_AGENT: &str = "swift-reviewer";

impl GithubClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: config.github.token.clone(),
            owner: config.github.owner.clone(),
            repo: config.github.repo.clone(),
            pr_number: config.github.pr_number,
            commit_sha: config.github.commit_sha.clone(),
        }
    }

    fn api_url(&self, tail: &str) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/{}",
            self.owner, self.repo, tail
        )
    }

    /// Fetch the list of files changed in the pull request.
    #[instrument(skip(self), fields(pr = self.pr_number))]
    pub async fn list_changed_files(&self) -> Result<Vec<ChangedFile>, GithubError> {
        let url = self.api_url(&format!("pulls/{}/files?per_page=100", self.pr_number));
        debug!("fetching changed files");
        let response = self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Status {
                endpoint: "pulls/files",
                status: status.as_u16(),
                body,
            });
        }

        let files = response.json::<Vec<ChangedFile>>().await?;
        debug!(files = files.len(), "received changed files");
        Ok(files)
    }

    async fn post_json(
        &self,
        endpoint: &'static str,
        url: &str,
        payload: serde_json::Value,
    ) -> Result<PostOutcome, GithubError> {
        let response = self
            .http
            .post(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        let outcome = PostOutcome::from_status(response.status().as_u16());
        if let PostOutcome::Rejected(status) = outcome {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint, status, body = %body.chars().take(200).collect::<String>(), "comment post rejected");
        }
        Ok(outcome)
    }
}

#[async_trait]
impl CommentSink for GithubClient {
    #[instrument(skip(self, body), fields(pr = self.pr_number))]
    async fn post_inline(
        &self,
        path: &str,
        line: u64,
        body: &str,
    ) -> Result<PostOutcome, GithubError> {
        let url = self.api_url(&format!("pulls/{}/comments", self.pr_number));
        let payload = json!({
            "body": body,
            "commit_id": self.commit_sha,
            "path": path,
            "line": line,
            "side": "RIGHT",
        });
        let outcome = self.post_json("pulls/comments", &url, payload).await?;
        match outcome {
            PostOutcome::Created => info!(path, line, "posted inline comment"),
            PostOutcome::InvalidLine => warn!(path, line, "line not commentable in diff"),
            PostOutcome::RateLimited => warn!(path, line, "rate limited posting inline comment"),
            PostOutcome::Rejected(_) => {}
        }
        Ok(outcome)
    }

    #[instrument(skip(self, body), fields(pr = self.pr_number))]
    async fn post_summary(&self, body: &str) -> Result<PostOutcome, GithubError> {
        let url = self.api_url(&format!("issues/{}/comments", self.pr_number));
        let outcome = self
            .post_json("issues/comments", &url, json!({ "body": body }))
            .await?;
        if outcome.is_created() {
            info!("posted summary comment");
        }
        Ok(outcome)
    }
}

/// Sink for `--dry-run`: prints would-be comments to stdout instead of
/// posting them.
pub struct DryRunSink;

#[async_trait]
impl CommentSink for DryRunSink {
    async fn post_inline(
        &self,
        path: &str,
        line: u64,
        body: &str,
    ) -> Result<PostOutcome, GithubError> {
        println!("[dry-run] {path}:{line}\n  {body}");
        Ok(PostOutcome::Created)
    }

    async fn post_summary(&self, body: &str) -> Result<PostOutcome, GithubError> {
        println!("[dry-run] summary comment:\n{body}");
        Ok(PostOutcome::Created)
    }
}
