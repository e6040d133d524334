use serde::Deserialize;

/// Change status reported by the pull-request files endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
}

/// One changed file in the pull request, as returned by
/// `GET /repos/{owner}/{repo}/pulls/{number}/files`.
///
/// `patch` is absent for binary files and for very large diffs; such files
/// are filtered out before review.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    pub status: FileStatus,
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

/// Outcome of posting a comment, mapped from the response status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// 201: comment created
    Created,
    /// 422: line not actually commentable in the diff; not retryable
    InvalidLine,
    /// 403: rate limited; transient
    RateLimited,
    /// Anything else; logged and skipped
    Rejected(u16),
}

impl PostOutcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            201 => PostOutcome::Created,
            422 => PostOutcome::InvalidLine,
            403 => PostOutcome::RateLimited,
            other => PostOutcome::Rejected(other),
        }
    }

    pub fn is_created(self) -> bool {
        self == PostOutcome::Created
    }
}
