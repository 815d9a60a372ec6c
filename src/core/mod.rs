//! Core functionality for notegit.
//!
//! This module provides the status matrix model and its classifier, the git
//! capability and its libgit2 implementation, the action controller that
//! drives them, settings persistence, the notes store and terminal output.

pub mod backend;
pub mod classifier;
pub mod command_init;
pub mod config;
pub mod controller;
pub mod dirs;
pub mod error;
pub mod git;
pub mod messages;
pub mod notes;
pub mod output;
pub mod status_matrix;

// === Error handling ===
pub use error::{NoteGitError, Result};

// === Status matrix and classification ===
// Closed three-way status model and the pure staged/unstaged split
pub use classifier::{classify, ClassifiedStatus, FileChange};
pub use status_matrix::{HeadState, StageState, StatusMatrixEntry, WorkTreeState};

// === Git capability ===
pub use backend::{GitBackend, RemoteAuth};
pub use git::Git2Backend;

// === Action controller ===
pub use controller::{BatchFailure, BatchReport, ControllerState, GitActionController};
pub use messages::StatusMessage;

// === Command initialization ===
pub use command_init::{CommandContext, CommandInit};

// === Settings ===
pub use config::{Author, ControllerConfig, Settings};

// === Notes ===
pub use notes::NoteStore;

// === Output formatting ===
pub use output::{
    format_change, print_error, print_info, print_section_header, print_status_message,
    print_success,
};
