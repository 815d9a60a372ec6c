//! Boundary to the version-control engine.
//!
//! The action controller talks to git only through [`GitBackend`]. Every call
//! is an asynchronous request/response with no streaming or partial results.
//! [`crate::core::git::Git2Backend`] is the libgit2 implementation; tests
//! substitute an in-memory one.

use crate::core::config::Author;
use crate::core::error::Result;
use crate::core::status_matrix::StatusMatrixEntry;
use std::fmt;

/// Remote location plus the token used to authenticate against it.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteAuth {
    pub url: String,
    pub token: String,
}

impl RemoteAuth {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for RemoteAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteAuth")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait::async_trait]
pub trait GitBackend: Send + Sync {
    /// Three-way status of every file the engine knows about.
    async fn status_matrix(&self) -> Result<Vec<StatusMatrixEntry>>;

    /// Record the working copy of `filename` in the index.
    async fn stage(&self, filename: &str) -> Result<()>;

    /// Put the index entry for `filename` back to its HEAD state.
    async fn unstage(&self, filename: &str) -> Result<()>;

    /// Commit the index and return the new commit's hex id.
    async fn commit(&self, message: &str, author: &Author) -> Result<String>;

    async fn push(&self, remote: &RemoteAuth) -> Result<()>;

    async fn pull(&self, remote: &RemoteAuth) -> Result<()>;
}
