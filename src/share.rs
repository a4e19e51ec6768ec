//! Optional score sharing
//!
//! Sharing is a capability the host may or may not offer. When no
//! [`ShareTarget`] is configured the app simply hides the affordance.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const SHARE_TITLE: &str = "Snake";
pub const SHARE_URL: &str = "https://github.com/topics/snake-game";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("failed to write share payload to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode share payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Title, message and link handed to the share target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn for_score(score: u32) -> Self {
        Self {
            title: SHARE_TITLE.to_string(),
            text: format!("I scored {score} points in Snake! Can you beat me?"),
            url: SHARE_URL.to_string(),
        }
    }
}

pub trait ShareTarget {
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// Appends each shared payload as one JSON line to a file
#[derive(Debug, Clone)]
pub struct FileShareTarget {
    path: PathBuf,
}

impl FileShareTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ShareTarget for FileShareTarget {
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError> {
        use std::io::Write;

        let mut line = serde_json::to_string(payload)?;
        line.push('\n');

        let write_error = |source: std::io::Error| ShareError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_error)?;

        file.write_all(line.as_bytes()).map_err(write_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_payload_mentions_score() {
        let payload = SharePayload::for_score(120);

        assert_eq!(payload.title, SHARE_TITLE);
        assert!(payload.text.contains("120"));
        assert_eq!(payload.url, SHARE_URL);
    }

    #[test]
    fn test_file_target_appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shares.jsonl");
        let mut target = FileShareTarget::new(&path);

        target.share(&SharePayload::for_score(10)).unwrap();
        target.share(&SharePayload::for_score(20)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let payloads: Vec<SharePayload> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(
            payloads,
            vec![SharePayload::for_score(10), SharePayload::for_score(20)]
        );
    }

    #[test]
    fn test_file_target_reports_missing_directory() {
        let dir = TempDir::new().unwrap();
        let mut target = FileShareTarget::new(dir.path().join("missing").join("shares.jsonl"));

        let err = target.share(&SharePayload::for_score(10)).unwrap_err();
        assert!(matches!(err, ShareError::Write { .. }));
    }
}
