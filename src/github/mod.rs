pub mod event;
pub mod types;

pub use types::{Comment, EventPayload, PrCoords, PullRequest};

use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, instrument};

const USER_AGENT: &str = "asset-watch";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub token not found in config or environment")]
    MissingToken,
}

/// Thin client over the handful of REST calls this tool makes.
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(token: String, api_url: String) -> GithubClient {
        GithubClient {
            http: reqwest::Client::new(),
            api_url,
            token,
        }
    }

    /// GET /repos/{owner}/{repo}/pulls/{number}
    pub async fn get_pull_request(&self, coords: &PrCoords) -> Result<PullRequest, GithubError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url, coords.owner, coords.repo, coords.number
        );
        debug!(%url, "fetching pull request");
        let response = self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// GET /repos/{owner}/{repo}/issues/{number}/comments
    ///
    /// One page only; a PR with more comments than the default page size may
    /// hide an older summary comment.
    pub async fn list_comments(&self, coords: &PrCoords) -> Result<Vec<Comment>, GithubError> {
        let url = self.comments_url(coords);
        debug!(%url, "listing comments");
        let response = self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// POST /repos/{owner}/{repo}/issues/{number}/comments
    pub async fn create_comment(&self, coords: &PrCoords, body: &str) -> Result<(), GithubError> {
        let url = self.comments_url(coords);
        debug!(%url, "creating comment");
        self.http
            .post(&url)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .json(&json!({ "body": body }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// PATCH /repos/{owner}/{repo}/issues/comments/{id}
    pub async fn update_comment(
        &self,
        coords: &PrCoords,
        comment_id: u64,
        body: &str,
    ) -> Result<(), GithubError> {
        let url = self.comment_url(coords, comment_id);
        debug!(%url, "updating comment");
        self.http
            .patch(&url)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .json(&json!({ "body": body }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// DELETE /repos/{owner}/{repo}/issues/comments/{id}
    pub async fn delete_comment(
        &self,
        coords: &PrCoords,
        comment_id: u64,
    ) -> Result<(), GithubError> {
        let url = self.comment_url(coords, comment_id);
        debug!(%url, "deleting comment");
        self.http
            .delete(&url)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn comments_url(&self, coords: &PrCoords) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, coords.owner, coords.repo, coords.number
        )
    }

    fn comment_url(&self, coords: &PrCoords, comment_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.api_url, coords.owner, coords.repo, comment_id
        )
    }
}

/// Resolve the pull request the run is about.
///
/// Returns `Ok(None)` without touching the API when the event payload
/// carries no pull request — the workflow was triggered by something else,
/// which is a successful no-op for this tool.
pub async fn resolve_pull_request(
    payload: &EventPayload,
    client: &GithubClient,
) -> Result<Option<PullRequest>, GithubError> {
    let Some(event_pr) = &payload.pull_request else {
        info!("event payload carries no pull request, nothing to do");
        return Ok(None);
    };
    let pull_request = client.get_pull_request(&event_pr.coords()).await?;
    Ok(Some(pull_request))
}

/// Find the summary comment a previous run left, by marker substring and
/// bot authorship, over plain comment records.
pub fn find_marked_comment<'a>(comments: &'a [Comment], marker: &str) -> Option<&'a Comment> {
    comments.iter().find(|comment| {
        comment.user.is_bot()
            && comment
                .body
                .as_deref()
                .is_some_and(|body| body.contains(marker))
    })
}

/// The single mutating call an upsert performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Create,
    Update(u64),
    Delete(u64),
}

/// Decide what to do with the summary comment given what already exists.
///
/// No existing comment means create, whatever the body; an existing comment
/// is deleted when the new body is empty and updated otherwise.
pub fn plan_upsert(existing: Option<&Comment>, body: &str) -> UpsertAction {
    match existing {
        None => UpsertAction::Create,
        Some(comment) if body.is_empty() => UpsertAction::Delete(comment.id),
        Some(comment) => UpsertAction::Update(comment.id),
    }
}

/// Create, update, or delete the summary comment so that at most one marked
/// comment exists afterwards. Exactly one mutating call per invocation.
#[instrument(skip(client, body), fields(owner = %coords.owner, repo = %coords.repo, pr = coords.number))]
pub async fn upsert_comment(
    client: &GithubClient,
    coords: &PrCoords,
    body: &str,
) -> Result<UpsertAction, GithubError> {
    let comments = client.list_comments(coords).await?;
    let existing = find_marked_comment(&comments, crate::report::COMMENT_MARKER);
    if let Some(comment) = existing {
        debug!(comment_id = comment.id, author = %comment.user.login, "found existing summary comment");
    }
    let action = plan_upsert(existing, body);
    match action {
        UpsertAction::Create => client.create_comment(coords, body).await?,
        UpsertAction::Update(id) => client.update_comment(coords, id, body).await?,
        UpsertAction::Delete(id) => client.delete_comment(coords, id).await?,
    }
    info!(?action, "summary comment reconciled");
    Ok(action)
}
