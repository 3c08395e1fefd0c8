use serde::Deserialize;

/// The webhook payload GitHub hands a workflow run, reduced to the part
/// this tool consumes. `pull_request` is absent when the triggering event
/// was not PR-related.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub pull_request: Option<PullRequest>,
}

/// A pull request record, as it appears both in the webhook payload and in
/// the REST response for a single PR.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub head: BranchRef,
    pub base: BaseRef,
}

impl PullRequest {
    /// Coordinates for every API call about this PR, taken from the base
    /// repository (the repository the PR targets).
    pub fn coords(&self) -> PrCoords {
        PrCoords {
            owner: self.base.repo.owner.login.clone(),
            repo: self.base.repo.name.clone(),
            number: self.number,
        }
    }
}

/// The head side of a PR; only the commit is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    pub sha: String,
}

/// The base side of a PR, which also names the repository to talk to.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseRef {
    pub sha: String,
    pub repo: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Account,
}

/// A user, bot, or organization account.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Account {
    pub fn is_bot(&self) -> bool {
        self.kind == "Bot"
    }
}

/// An issue comment on a pull request. `body` is nullable in the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: Option<String>,
    pub user: Account,
}

/// Owner, repository, and PR number — the address of every REST call this
/// tool makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrCoords {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_coords_use_base_repo() {
        let json = r#"{
            "number": 42,
            "head": {"sha": "feedface"},
            "base": {
                "sha": "cafebabe",
                "repo": {"name": "web-app", "owner": {"login": "acme", "type": "Organization"}}
            }
        }"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        let coords = pr.coords();
        assert_eq!(
            coords,
            PrCoords {
                owner: "acme".to_string(),
                repo: "web-app".to_string(),
                number: 42
            }
        );
        assert_eq!(pr.head.sha, "feedface");
        assert_eq!(pr.base.sha, "cafebabe");
    }

    #[test]
    fn test_account_bot_detection() {
        let bot: Account =
            serde_json::from_str(r#"{"login": "github-actions[bot]", "type": "Bot"}"#).unwrap();
        let user: Account = serde_json::from_str(r#"{"login": "alice", "type": "User"}"#).unwrap();
        assert!(bot.is_bot());
        assert!(!user.is_bot());
    }

    #[test]
    fn test_comment_body_may_be_null() {
        let comment: Comment = serde_json::from_str(
            r#"{"id": 7, "body": null, "user": {"login": "alice", "type": "User"}}"#,
        )
        .unwrap();
        assert!(comment.body.is_none());
    }
}
