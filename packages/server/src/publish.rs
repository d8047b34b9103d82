//! # Publishing
//!
//! Commits and pushes the served directory with git:
//!
//! ```text
//! status --porcelain ──empty──▶ "No changes to publish"
//!        │
//!        ▼
//! add -A ─▶ commit -m "Update <local time>" ─▶ push ─▶ "Published successfully"
//!        (any failing step ─▶ "Git error: <stderr>")
//! ```

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

/// Runs one git invocation and returns its stdout
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(&self, args: &[&str]) -> Result<String, GitError>;
}

/// Shells out to the `git` binary inside `dir`
#[derive(Debug, Clone)]
pub struct SystemGit {
    dir: PathBuf,
}

impl SystemGit {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("git {} exited with {}", args.join(" "), output.status)
            } else {
                stderr
            };
            Err(GitError::Failed(message))
        }
    }
}

/// JSON body returned by `POST /publish`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReply {
    pub success: bool,
    pub message: String,
}

impl PublishReply {
    fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

pub fn commit_message(now: NaiveDateTime) -> String {
    format!("Update {}", now.format("%Y-%m-%d %H:%M"))
}

pub async fn publish(git: &dyn GitRunner, now: NaiveDateTime) -> PublishReply {
    match run_publish(git, now).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("publish failed: {}", e);
            PublishReply::failed(format!("Git error: {}", e))
        }
    }
}

async fn run_publish(git: &dyn GitRunner, now: NaiveDateTime) -> Result<PublishReply, GitError> {
    let status = git.run(&["status", "--porcelain"]).await?;
    if status.trim().is_empty() {
        return Ok(PublishReply::failed("No changes to publish"));
    }

    let message = commit_message(now);
    git.run(&["add", "-A"]).await?;
    git.run(&["commit", "-m", &message]).await?;
    git.run(&["push"]).await?;

    tracing::info!("published: {}", message);
    Ok(PublishReply::ok("Published successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_commit_message_format() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 59)
            .unwrap();
        assert_eq!(commit_message(now), "Update 2024-03-09 07:05");
    }

    #[tokio::test]
    async fn test_system_git_reports_spawn_or_status_failure() {
        let dir = tempfile::tempdir().unwrap();
        let git = SystemGit::new(dir.path());
        // Not a repository, so this fails whether or not git is installed
        assert!(git.run(&["status", "--porcelain"]).await.is_err());
    }
}
