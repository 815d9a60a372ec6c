//! Git action orchestration.
//!
//! [`GitActionController`] sits between the interface and a [`GitBackend`]. It
//! owns the derived [`ClassifiedStatus`], the last [`StatusMessage`] and a
//! two-state Idle/Loading flag, and re-classifies the repository after every
//! mutating action.
//!
//! # State Machine
//! - Every mutating action (stage, unstage, stage all, unstage all, commit,
//!   push, pull) moves the controller to [`ControllerState::Loading`] for the
//!   duration of its backend calls.
//! - The return to [`ControllerState::Idle`] happens in a drop guard, so it
//!   also happens when the action fails, panics or its future is dropped.
//! - Actions whose preconditions fail (nothing to stage, empty commit message,
//!   no remote) only set a message and never enter Loading.
//!
//! The state is published on a `tokio::sync::watch` channel; interfaces
//! subscribe with [`GitActionController::subscribe`] to disable their controls
//! while loading.

use crate::core::{
    backend::GitBackend,
    classifier::{classify, ClassifiedStatus, FileChange},
    config::ControllerConfig,
    messages::StatusMessage,
};
use std::sync::Arc;
use tokio::sync::watch;

const SHORT_HASH_LEN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Loading,
}

/// Per-file failure inside a stage-all or unstage-all batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub filename: String,
    pub error: String,
}

/// Outcome of a stage-all or unstage-all batch.
///
/// Batches never stop at the first failure: every file is attempted and the
/// failures are collected here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub attempted: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexOp {
    Stage,
    Unstage,
}

/// Holds the controller in Loading until dropped.
struct LoadingGuard {
    state: Arc<watch::Sender<ControllerState>>,
}

impl LoadingGuard {
    fn enter(state: &Arc<watch::Sender<ControllerState>>) -> Self {
        state.send_replace(ControllerState::Loading);
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.send_replace(ControllerState::Idle);
    }
}

pub struct GitActionController<B: GitBackend> {
    backend: B,
    config: ControllerConfig,
    state: Arc<watch::Sender<ControllerState>>,
    status: ClassifiedStatus,
    message: Option<StatusMessage>,
    draft_message: String,
}

impl<B: GitBackend> GitActionController<B> {
    pub fn new(backend: B, config: ControllerConfig) -> Self {
        let (state, _) = watch::channel(ControllerState::Idle);
        Self {
            backend,
            config,
            state: Arc::new(state),
            status: ClassifiedStatus::default(),
            message: None,
            draft_message: String::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Swap in a new configuration snapshot between actions
    pub fn update_config(&mut self, config: ControllerConfig) {
        self.config = config;
    }

    pub fn state(&self) -> ControllerState {
        *self.state.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.state() == ControllerState::Loading
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    pub fn status(&self) -> &ClassifiedStatus {
        &self.status
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn draft_message(&self) -> &str {
        &self.draft_message
    }

    pub fn set_draft_message(&mut self, message: impl Into<String>) {
        self.draft_message = message.into();
    }

    /// Fetch a fresh status matrix and re-classify it.
    ///
    /// On failure the previous classification is kept, a
    /// [`StatusMessage::StatusFetchFailed`] is recorded and `false` is returned.
    pub async fn refresh_status(&mut self) -> bool {
        match self.backend.status_matrix().await {
            Ok(matrix) => {
                self.status = classify(&matrix);
                log::debug!(
                    "Refreshed status: {} staged, {} unstaged",
                    self.status.staged.len(),
                    self.status.unstaged.len()
                );
                true
            }
            Err(e) => {
                log::warn!("Status fetch failed: {e}");
                self.message = Some(StatusMessage::StatusFetchFailed);
                false
            }
        }
    }

    pub async fn stage_file(&mut self, filename: &str) {
        self.single_file(IndexOp::Stage, filename).await;
    }

    pub async fn unstage_file(&mut self, filename: &str) {
        self.single_file(IndexOp::Unstage, filename).await;
    }

    /// Stage every unstaged change, one file at a time
    pub async fn stage_all(&mut self) -> BatchReport {
        if !self.status.has_unstaged() {
            self.message = Some(StatusMessage::NothingToStage);
            return BatchReport::default();
        }
        let files = self.status.unstaged.clone();
        self.batch(IndexOp::Stage, &files).await
    }

    /// Unstage every staged change, one file at a time
    pub async fn unstage_all(&mut self) -> BatchReport {
        if !self.status.has_staged() {
            self.message = Some(StatusMessage::NothingToUnstage);
            return BatchReport::default();
        }
        let files = self.status.staged.clone();
        self.batch(IndexOp::Unstage, &files).await
    }

    /// Commit the staged changes, returning the full commit id on success
    pub async fn commit(&mut self, message: &str) -> Option<String> {
        if !self.status.has_staged() {
            self.message = Some(StatusMessage::NothingToCommit);
            return None;
        }
        if message.trim().is_empty() {
            self.message = Some(StatusMessage::EmptyCommitMessage);
            return None;
        }

        let _loading = LoadingGuard::enter(&self.state);
        match self.backend.commit(message, &self.config.author).await {
            Ok(hash) => {
                let short_hash: String = hash.chars().take(SHORT_HASH_LEN).collect();
                log::info!("Committed {hash}");
                self.draft_message.clear();
                self.refresh_status().await;
                // the commit exists even if the refresh failed
                self.message = Some(StatusMessage::Committed { short_hash });
                Some(hash)
            }
            Err(e) => {
                log::warn!("Commit failed: {e}");
                self.message = Some(StatusMessage::CommitFailed);
                None
            }
        }
    }

    /// Commit using the pending draft message
    pub async fn commit_draft(&mut self) -> Option<String> {
        let message = self.draft_message.clone();
        self.commit(&message).await
    }

    pub async fn push(&mut self) -> bool {
        let Some(remote) = self.config.remote.clone() else {
            self.message = Some(StatusMessage::RemoteNotConfigured);
            return false;
        };

        let _loading = LoadingGuard::enter(&self.state);
        match self.backend.push(&remote).await {
            Ok(()) => {
                self.message = Some(StatusMessage::Pushed);
                true
            }
            Err(e) => {
                log::warn!("Push to {} failed: {e}", remote.url);
                self.message = Some(StatusMessage::PushFailed);
                false
            }
        }
    }

    pub async fn pull(&mut self) -> bool {
        let Some(remote) = self.config.remote.clone() else {
            self.message = Some(StatusMessage::RemoteNotConfigured);
            return false;
        };

        let _loading = LoadingGuard::enter(&self.state);
        match self.backend.pull(&remote).await {
            Ok(()) => {
                self.refresh_status().await;
                self.message = Some(StatusMessage::Pulled);
                true
            }
            Err(e) => {
                log::warn!("Pull from {} failed: {e}", remote.url);
                self.message = Some(StatusMessage::PullFailed);
                false
            }
        }
    }

    async fn apply(&self, op: IndexOp, filename: &str) -> crate::core::error::Result<()> {
        match op {
            IndexOp::Stage => self.backend.stage(filename).await,
            IndexOp::Unstage => self.backend.unstage(filename).await,
        }
    }

    async fn single_file(&mut self, op: IndexOp, filename: &str) {
        let _loading = LoadingGuard::enter(&self.state);

        self.message = Some(match self.apply(op, filename).await {
            Ok(()) => match op {
                IndexOp::Stage => StatusMessage::Staged { count: 1 },
                IndexOp::Unstage => StatusMessage::Unstaged { count: 1 },
            },
            Err(e) => {
                log::warn!("{op:?} failed for {filename}: {e}");
                let filename = filename.to_string();
                match op {
                    IndexOp::Stage => StatusMessage::StagingFailed { filename },
                    IndexOp::Unstage => StatusMessage::UnstagingFailed { filename },
                }
            }
        });

        self.refresh_status().await;
    }

    async fn batch(&mut self, op: IndexOp, files: &[FileChange]) -> BatchReport {
        let _loading = LoadingGuard::enter(&self.state);
        let mut report = BatchReport {
            attempted: files.len(),
            failures: Vec::new(),
        };

        // sequential so the final refresh sees a settled index
        for change in files {
            if let Err(e) = self.apply(op, &change.filename).await {
                log::warn!("{op:?} failed for {}: {e}", change.filename);
                report.failures.push(BatchFailure {
                    filename: change.filename.clone(),
                    error: e.to_string(),
                });
            }
        }

        let done = report.succeeded();
        let failed = report.failures.len();
        self.message = Some(match (op, failed) {
            (IndexOp::Stage, 0) => StatusMessage::Staged { count: done },
            (IndexOp::Unstage, 0) => StatusMessage::Unstaged { count: done },
            (IndexOp::Stage, _) => StatusMessage::StagingPartiallyFailed {
                staged: done,
                failed,
            },
            (IndexOp::Unstage, _) => StatusMessage::UnstagingPartiallyFailed {
                unstaged: done,
                failed,
            },
        });

        self.refresh_status().await;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::RemoteAuth;
    use crate::core::config::Author;
    use crate::core::error::{NoteGitError, Result};
    use crate::core::status_matrix::StatusMatrixEntry;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        StatusMatrix,
        Stage(String),
        Unstage(String),
        Commit(String, String),
        Push(String),
        Pull(String),
    }

    /// In-memory backend recording every call and the controller state seen by it.
    #[derive(Default)]
    struct RecordingBackend {
        matrix: Mutex<Vec<StatusMatrixEntry>>,
        calls: Mutex<Vec<Call>>,
        failing: HashSet<String>,
        fail_status: Mutex<bool>,
        fail_remote: bool,
        hang_on_stage: bool,
        probe: Mutex<Option<watch::Receiver<ControllerState>>>,
        observed: Mutex<Vec<ControllerState>>,
    }

    impl RecordingBackend {
        fn with_matrix(rows: &[(&str, u8, u8, u8)]) -> Self {
            let matrix = rows
                .iter()
                .map(|(name, head, workdir, stage)| {
                    StatusMatrixEntry::from_codes(*name, *head, *workdir, *stage).unwrap()
                })
                .collect();
            Self {
                matrix: Mutex::new(matrix),
                ..Default::default()
            }
        }

        fn record(&self, call: Call) {
            if let Some(probe) = self.probe.lock().unwrap().as_ref() {
                self.observed.lock().unwrap().push(*probe.borrow());
            }
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
            self.calls().iter().filter(|call| predicate(call)).count()
        }

        fn fail(&self, filename: &str) -> Result<()> {
            if self.failing.contains(filename) {
                Err(NoteGitError::InvalidUtf8Path)
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl GitBackend for RecordingBackend {
        async fn status_matrix(&self) -> Result<Vec<StatusMatrixEntry>> {
            self.calls.lock().unwrap().push(Call::StatusMatrix);
            if *self.fail_status.lock().unwrap() {
                return Err(NoteGitError::BareRepository);
            }
            Ok(self.matrix.lock().unwrap().clone())
        }

        async fn stage(&self, filename: &str) -> Result<()> {
            self.record(Call::Stage(filename.to_string()));
            if self.hang_on_stage {
                std::future::pending::<()>().await;
            }
            self.fail(filename)
        }

        async fn unstage(&self, filename: &str) -> Result<()> {
            self.record(Call::Unstage(filename.to_string()));
            self.fail(filename)
        }

        async fn commit(&self, message: &str, author: &Author) -> Result<String> {
            self.record(Call::Commit(message.to_string(), author.name.clone()));
            self.fail(message)?;
            Ok("0123456789abcdef0123456789abcdef01234567".to_string())
        }

        async fn push(&self, remote: &RemoteAuth) -> Result<()> {
            self.record(Call::Push(remote.url.clone()));
            if self.fail_remote {
                return Err(NoteGitError::non_fast_forward("main"));
            }
            Ok(())
        }

        async fn pull(&self, remote: &RemoteAuth) -> Result<()> {
            self.record(Call::Pull(remote.url.clone()));
            if self.fail_remote {
                return Err(NoteGitError::non_fast_forward("main"));
            }
            Ok(())
        }
    }

    fn remote_config() -> ControllerConfig {
        ControllerConfig {
            author: Author {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            remote: Some(RemoteAuth::new("https://example.com/notes.git", "tok")),
        }
    }

    async fn controller(backend: RecordingBackend) -> GitActionController<RecordingBackend> {
        let mut controller = GitActionController::new(backend, remote_config());
        *controller.backend().probe.lock().unwrap() = Some(controller.subscribe());
        assert!(controller.refresh_status().await);
        controller.backend().calls.lock().unwrap().clear();
        controller
    }

    #[tokio::test]
    async fn test_refresh_classifies_matrix() {
        let backend = RecordingBackend::with_matrix(&[("a.md", 0, 2, 0), ("b.md", 1, 0, 0)]);
        let controller = controller(backend).await;

        assert_eq!(controller.status().unstaged, vec![FileChange::new("a.md", false)]);
        assert_eq!(controller.status().staged, vec![FileChange::new("b.md", true)]);
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_status() {
        let backend = RecordingBackend::with_matrix(&[("a.md", 0, 2, 0)]);
        let mut controller = controller(backend).await;
        let before = controller.status().clone();

        *controller.backend().fail_status.lock().unwrap() = true;
        assert!(!controller.refresh_status().await);

        assert_eq!(controller.status(), &before);
        assert_eq!(controller.message(), Some(&StatusMessage::StatusFetchFailed));
    }

    #[tokio::test]
    async fn test_stage_all_stages_each_file_then_refreshes_once() {
        let backend = RecordingBackend::with_matrix(&[("x", 0, 2, 0), ("y", 1, 0, 1)]);
        let mut controller = controller(backend).await;

        let report = controller.stage_all().await;

        assert_eq!(report.attempted, 2);
        assert!(report.is_success());
        assert_eq!(
            controller.backend().calls(),
            vec![
                Call::Stage("x".to_string()),
                Call::Stage("y".to_string()),
                Call::StatusMatrix,
            ]
        );
        assert_eq!(controller.message(), Some(&StatusMessage::Staged { count: 2 }));
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_stage_all_continues_past_failures() {
        let mut backend =
            RecordingBackend::with_matrix(&[("x", 0, 2, 0), ("bad", 0, 2, 0), ("z", 1, 2, 1)]);
        backend.failing.insert("bad".to_string());
        let mut controller = controller(backend).await;

        let report = controller.stage_all().await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].filename, "bad");
        assert_eq!(controller.backend().count(|c| matches!(c, Call::Stage(_))), 3);
        assert_eq!(
            controller.message(),
            Some(&StatusMessage::StagingPartiallyFailed { staged: 2, failed: 1 })
        );
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_stage_all_with_nothing_unstaged_does_nothing() {
        let backend = RecordingBackend::with_matrix(&[("a.md", 1, 1, 1)]);
        let mut controller = controller(backend).await;

        let report = controller.stage_all().await;

        assert_eq!(report, BatchReport::default());
        assert!(controller.backend().calls().is_empty());
        assert_eq!(controller.message(), Some(&StatusMessage::NothingToStage));
    }

    #[tokio::test]
    async fn test_unstage_all_covers_staged_list() {
        let backend =
            RecordingBackend::with_matrix(&[("a.md", 1, 2, 2), ("b.md", 1, 0, 0), ("c.md", 1, 2, 3)]);
        let mut controller = controller(backend).await;

        let report = controller.unstage_all().await;

        assert_eq!(report.attempted, 3);
        assert_eq!(
            controller.backend().calls(),
            vec![
                Call::Unstage("a.md".to_string()),
                Call::Unstage("b.md".to_string()),
                Call::Unstage("c.md".to_string()),
                Call::StatusMatrix,
            ]
        );
        assert_eq!(controller.message(), Some(&StatusMessage::Unstaged { count: 3 }));
    }

    #[tokio::test]
    async fn test_mutating_calls_run_while_loading() {
        let backend = RecordingBackend::with_matrix(&[("x", 0, 2, 0)]);
        let mut controller = controller(backend).await;

        controller.stage_file("x").await;
        controller.unstage_file("x").await;

        let observed = controller.backend().observed.lock().unwrap().clone();
        assert_eq!(observed, vec![ControllerState::Loading, ControllerState::Loading]);
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_stage_file_failure_reports_and_returns_to_idle() {
        let mut backend = RecordingBackend::with_matrix(&[("x", 0, 2, 0)]);
        backend.failing.insert("x".to_string());
        let mut controller = controller(backend).await;

        controller.stage_file("x").await;

        assert_eq!(
            controller.message(),
            Some(&StatusMessage::StagingFailed {
                filename: "x".to_string()
            })
        );
        assert_eq!(controller.backend().count(|c| *c == Call::StatusMatrix), 1);
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_dropped_action_returns_to_idle() {
        let mut backend = RecordingBackend::with_matrix(&[("x", 0, 2, 0)]);
        backend.hang_on_stage = true;
        let mut controller = controller(backend).await;

        let result =
            tokio::time::timeout(Duration::from_millis(20), controller.stage_file("x")).await;

        assert!(result.is_err());
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_commit_reports_short_hash_and_clears_draft() {
        let backend = RecordingBackend::with_matrix(&[("a.md", 0, 2, 2)]);
        let mut controller = controller(backend).await;
        controller.set_draft_message("add a");

        let hash = controller.commit_draft().await;

        assert_eq!(hash.as_deref(), Some("0123456789abcdef0123456789abcdef01234567"));
        assert_eq!(
            controller.message(),
            Some(&StatusMessage::Committed {
                short_hash: "0123456".to_string()
            })
        );
        assert_eq!(controller.draft_message(), "");
        assert_eq!(
            controller.backend().calls(),
            vec![
                Call::Commit("add a".to_string(), "Ada".to_string()),
                Call::StatusMatrix,
            ]
        );
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_commit_outcome_survives_failed_refresh() {
        let backend = RecordingBackend::with_matrix(&[("a.md", 0, 2, 2)]);
        let mut controller = controller(backend).await;
        *controller.backend().fail_status.lock().unwrap() = true;

        let hash = controller.commit("add a").await;

        assert!(hash.is_some());
        assert_eq!(
            controller.message(),
            Some(&StatusMessage::Committed {
                short_hash: "0123456".to_string()
            })
        );
        assert_eq!(controller.backend().count(|c| *c == Call::StatusMatrix), 1);
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_pull_outcome_survives_failed_refresh() {
        let backend = RecordingBackend::with_matrix(&[]);
        let mut controller = controller(backend).await;
        *controller.backend().fail_status.lock().unwrap() = true;

        assert!(controller.pull().await);
        assert_eq!(controller.message(), Some(&StatusMessage::Pulled));
    }

    #[tokio::test]
    async fn test_commit_preconditions() {
        let backend = RecordingBackend::with_matrix(&[("a.md", 0, 2, 0)]);
        let mut controller = controller(backend).await;

        assert!(controller.commit("message").await.is_none());
        assert_eq!(controller.message(), Some(&StatusMessage::NothingToCommit));

        let backend = RecordingBackend::with_matrix(&[("a.md", 0, 2, 2)]);
        let mut controller = self::controller(backend).await;
        assert!(controller.commit("   ").await.is_none());
        assert_eq!(controller.message(), Some(&StatusMessage::EmptyCommitMessage));
        assert!(controller.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_commit_failure_keeps_draft() {
        let mut backend = RecordingBackend::with_matrix(&[("a.md", 0, 2, 2)]);
        backend.failing.insert("boom".to_string());
        let mut controller = controller(backend).await;
        controller.set_draft_message("boom");

        assert!(controller.commit_draft().await.is_none());
        assert_eq!(controller.message(), Some(&StatusMessage::CommitFailed));
        assert_eq!(controller.draft_message(), "boom");
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_push_and_pull_require_remote() {
        let backend = RecordingBackend::with_matrix(&[]);
        let mut controller = controller(backend).await;
        controller.update_config(ControllerConfig::default());

        assert!(!controller.push().await);
        assert_eq!(controller.message(), Some(&StatusMessage::RemoteNotConfigured));
        assert!(!controller.pull().await);
        assert!(controller.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_pull_refreshes_but_push_does_not() {
        let backend = RecordingBackend::with_matrix(&[]);
        let mut controller = controller(backend).await;

        assert!(controller.push().await);
        assert_eq!(controller.message(), Some(&StatusMessage::Pushed));
        assert!(controller.pull().await);
        assert_eq!(controller.message(), Some(&StatusMessage::Pulled));

        let url = "https://example.com/notes.git".to_string();
        assert_eq!(
            controller.backend().calls(),
            vec![Call::Push(url.clone()), Call::Pull(url), Call::StatusMatrix]
        );
    }

    #[tokio::test]
    async fn test_remote_failures_are_reported() {
        let mut backend = RecordingBackend::with_matrix(&[]);
        backend.fail_remote = true;
        let mut controller = controller(backend).await;

        assert!(!controller.push().await);
        assert_eq!(controller.message(), Some(&StatusMessage::PushFailed));
        assert!(!controller.pull().await);
        assert_eq!(controller.message(), Some(&StatusMessage::PullFailed));
        assert_eq!(controller.backend().count(|c| *c == Call::StatusMatrix), 0);
        assert_eq!(controller.state(), ControllerState::Idle);
    }
}
