use super::types::EventPayload;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Failed to read event payload: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse event payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No event payload path given and GITHUB_EVENT_PATH is unset")]
    MissingPath,
}

/// Load the webhook payload from the file GitHub Actions points at via
/// GITHUB_EVENT_PATH (or an explicit `--event` path).
pub fn load_event(path: &Path) -> Result<EventPayload, EventError> {
    let contents = std::fs::read_to_string(path)?;
    let payload: EventPayload = serde_json::from_str(&contents)?;
    debug!(
        path = %path.display(),
        has_pull_request = payload.pull_request.is_some(),
        "loaded event payload"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PR_EVENT: &str = r#"{
        "action": "synchronize",
        "pull_request": {
            "number": 42,
            "head": {"sha": "feedface"},
            "base": {
                "sha": "cafebabe",
                "repo": {"name": "web-app", "owner": {"login": "acme", "type": "Organization"}}
            }
        }
    }"#;

    #[test]
    fn test_load_event_with_pull_request() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PR_EVENT.as_bytes()).unwrap();
        let payload = load_event(file.path()).unwrap();
        assert_eq!(payload.pull_request.unwrap().number, 42);
    }

    #[test]
    fn test_load_event_without_pull_request() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"action": "push", "ref": "refs/heads/main"}"#)
            .unwrap();
        let payload = load_event(file.path()).unwrap();
        assert!(payload.pull_request.is_none());
    }

    #[test]
    fn test_load_event_missing_file_is_an_error() {
        let err = load_event(Path::new("/nonexistent/event.json")).unwrap_err();
        assert!(matches!(err, EventError::FileRead(_)));
    }

    #[test]
    fn test_load_event_malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        let err = load_event(file.path()).unwrap_err();
        assert!(matches!(err, EventError::Parse(_)));
    }
}
