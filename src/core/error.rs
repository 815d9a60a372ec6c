//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`NoteGitError`] which covers every failure notegit can
//! hit: libgit2 calls, settings persistence, the notes store and status matrix
//! validation. It uses `thiserror` for the definitions and offers constructor
//! helpers for the variants that carry context.
//!
//! # Public API
//! - [`NoteGitError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, NoteGitError>`
//!
//! # Error Categories
//! - **Git operations**: Repository not found, git2 library errors, sync failures
//! - **Status matrix**: Out-of-range status codes at the backend boundary
//! - **Settings**: Missing root directory, JSON and I/O failures
//! - **Notes**: Invalid, missing or clashing note paths

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for notegit
#[derive(Error, Debug)]
pub enum NoteGitError {
    // Git repository errors
    #[error("Not in a git repository: {path}")]
    NotInGitRepo { path: PathBuf },

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    #[error("Repository has no working directory")]
    BareRepository,

    #[error("Cannot {action} on a detached HEAD")]
    DetachedHead { action: String },

    #[error("Pull cannot fast-forward '{branch}': local and remote histories have diverged")]
    NonFastForward { branch: String },

    #[error("Remote rejected update of '{reference}': {message}")]
    PushRejected { reference: String, message: String },

    // Status matrix errors
    #[error("Invalid {column} status code {code} for '{filename}'")]
    InvalidStatusCode {
        filename: String,
        column: &'static str,
        code: u8,
    },

    // Settings errors
    #[error("Notes directory is not configured. Run 'notegit config set-root <path>' first.")]
    RootDirNotConfigured,

    #[error("Could not find configuration directory")]
    ConfigDirectoryNotFound,

    // Note store errors
    #[error("Invalid note path '{path}': must be relative and stay inside the notes directory")]
    InvalidNotePath { path: PathBuf },

    #[error("Note does not exist: {path}")]
    NoteNotFound { path: PathBuf },

    #[error("Note already exists: {path}")]
    NoteAlreadyExists { path: PathBuf },

    // Controller outcome
    #[error("{message}")]
    ActionFailed { message: String },

    // Runtime errors
    #[error("Background git task failed: {0}")]
    BackgroundTask(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using NoteGitError
pub type Result<T> = std::result::Result<T, NoteGitError>;

impl NoteGitError {
    /// Create a not-in-repository error for a path
    pub fn not_in_git_repo(path: impl Into<PathBuf>) -> Self {
        Self::NotInGitRepo { path: path.into() }
    }

    /// Create an invalid status code error for one matrix column
    pub fn invalid_status_code(filename: impl Into<String>, column: &'static str, code: u8) -> Self {
        Self::InvalidStatusCode {
            filename: filename.into(),
            column,
            code,
        }
    }

    /// Create a detached HEAD error for the attempted action
    pub fn detached_head(action: impl Into<String>) -> Self {
        Self::DetachedHead {
            action: action.into(),
        }
    }

    /// Create a non fast-forward error for a branch
    pub fn non_fast_forward(branch: impl Into<String>) -> Self {
        Self::NonFastForward {
            branch: branch.into(),
        }
    }

    /// Create a push rejected error
    pub fn push_rejected(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PushRejected {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create an action failed error from a controller message
    pub fn action_failed(message: impl std::fmt::Display) -> Self {
        Self::ActionFailed {
            message: message.to_string(),
        }
    }

    /// Create an invalid note path error
    pub fn invalid_note_path(path: impl Into<PathBuf>) -> Self {
        Self::InvalidNotePath { path: path.into() }
    }

    /// Create a note not found error
    pub fn note_not_found(path: impl Into<PathBuf>) -> Self {
        Self::NoteNotFound { path: path.into() }
    }

    /// Create a note already exists error
    pub fn note_already_exists(path: impl Into<PathBuf>) -> Self {
        Self::NoteAlreadyExists { path: path.into() }
    }
}
