//! User-facing status messages.
//!
//! The action controller never hands errors to its caller. Each action ends by
//! recording one [`StatusMessage`] that the interface shows as a one-line
//! notice. Error details go to the log instead.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMessage {
    StatusFetchFailed,

    NothingToStage,
    Staged { count: usize },
    StagingFailed { filename: String },
    StagingPartiallyFailed { staged: usize, failed: usize },

    NothingToUnstage,
    Unstaged { count: usize },
    UnstagingFailed { filename: String },
    UnstagingPartiallyFailed { unstaged: usize, failed: usize },

    NothingToCommit,
    EmptyCommitMessage,
    Committed { short_hash: String },
    CommitFailed,

    RemoteNotConfigured,
    Pushed,
    PushFailed,
    Pulled,
    PullFailed,
}

impl StatusMessage {
    /// Whether the message reports a failed or refused action
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            StatusMessage::Staged { .. }
                | StatusMessage::Unstaged { .. }
                | StatusMessage::Committed { .. }
                | StatusMessage::Pushed
                | StatusMessage::Pulled
        )
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::StatusFetchFailed => write!(f, "Status fetch failed"),
            StatusMessage::NothingToStage => write!(f, "No changes to stage"),
            StatusMessage::Staged { count } => write!(f, "Staged {count} file(s)"),
            StatusMessage::StagingFailed { filename } => {
                write!(f, "Staging failed for {filename}")
            }
            StatusMessage::StagingPartiallyFailed { staged, failed } => {
                write!(f, "Staged {staged} file(s), staging failed for {failed}")
            }
            StatusMessage::NothingToUnstage => write!(f, "No staged changes to unstage"),
            StatusMessage::Unstaged { count } => write!(f, "Unstaged {count} file(s)"),
            StatusMessage::UnstagingFailed { filename } => {
                write!(f, "Unstaging failed for {filename}")
            }
            StatusMessage::UnstagingPartiallyFailed { unstaged, failed } => {
                write!(f, "Unstaged {unstaged} file(s), unstaging failed for {failed}")
            }
            StatusMessage::NothingToCommit => write!(f, "Nothing staged to commit"),
            StatusMessage::EmptyCommitMessage => write!(f, "Commit message is empty"),
            StatusMessage::Committed { short_hash } => write!(f, "Committed {short_hash}"),
            StatusMessage::CommitFailed => write!(f, "Commit failed"),
            StatusMessage::RemoteNotConfigured => {
                write!(f, "Remote URL and token must be configured")
            }
            StatusMessage::Pushed => write!(f, "Pushed to remote"),
            StatusMessage::PushFailed => write!(f, "Push failed"),
            StatusMessage::Pulled => write!(f, "Pulled from remote"),
            StatusMessage::PullFailed => write!(f, "Pull failed"),
        }
    }
}
