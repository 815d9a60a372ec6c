//! Predefined repository scenarios

#![allow(dead_code)]

use super::repository::*;
use notegit::core::error::Result;
use std::path::{Path, PathBuf};

/// Scenario: one committed note changed, one new note, nothing staged
pub fn create_mixed_changes_repo() -> Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;

    create_file(&repo.path, "welcome.md", "# Welcome\n\nEdited.\n")?;
    create_file(&repo.path, "journal/today.md", "# Today\n")?;

    Ok(repo)
}

/// Scenario: two new notes already staged with the git CLI
pub fn create_staged_repo() -> Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;

    create_file(&repo.path, "a.md", "a\n")?;
    create_file(&repo.path, "b.md", "b\n")?;
    git_add(&repo.path, "a.md")?;
    git_add(&repo.path, "b.md")?;

    Ok(repo)
}

/// Create a bare repository next to the notes repository and return its path
pub fn create_bare_remote(repo: &TestRepo) -> Result<PathBuf> {
    let remote = repo.temp_dir.path().join("remote.git");
    std::fs::create_dir_all(&remote)?;
    std::process::Command::new("git")
        .args(["init", "--bare"])
        .current_dir(&remote)
        .output()?;
    std::process::Command::new("git")
        .args(["symbolic-ref", "HEAD", "refs/heads/main"])
        .current_dir(&remote)
        .output()?;
    Ok(remote)
}

/// Point the repository's settings at a remote, with a dummy token
pub fn configure_remote(repo: &TestRepo, remote: &Path) -> Result<()> {
    let mut settings = repo.settings()?;
    settings.remote_url = Some(remote.display().to_string());
    settings.token = Some("test-token-1234".to_string());
    repo.save_settings(settings)
}
