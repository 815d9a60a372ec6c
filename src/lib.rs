//! Notegit - markdown notes kept in a git repository.
//!
//! Notes live as files in a directory tracked by git. This library classifies
//! the repository's three-way status matrix into staged and unstaged changes
//! and drives staging, commits, push and pull through an action controller.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module:
//! - Status matrix types and the [`classify`] function
//! - The [`GitBackend`] capability and its libgit2 implementation
//! - The [`GitActionController`] state machine
//! - Settings, the notes store, and error types

pub mod commands;
pub mod core;

pub use crate::core::{
    classify,
    Author,
    BatchFailure,
    BatchReport,
    ClassifiedStatus,
    ControllerConfig,
    ControllerState,
    FileChange,
    Git2Backend,
    GitActionController,
    GitBackend,
    HeadState,
    NoteGitError,
    NoteStore,
    RemoteAuth,
    Result,
    Settings,
    StageState,
    StatusMatrixEntry,
    StatusMessage,
    WorkTreeState,
};
