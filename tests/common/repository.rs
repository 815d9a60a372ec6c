//! Notes repository setup and git helpers
//!
//! Repositories are prepared with the git CLI so the tests exercise notegit
//! against the same on-disk state a user would have.

#![allow(dead_code)]

use notegit::core::{config::Settings, dirs::CONFIG_DIR_ENV, error::Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A temporary notes repository plus an isolated config directory.
///
/// Both `TempDir`s must stay alive for the duration of the test.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub config_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A `notegit` command bound to this repository's config directory
    pub fn notegit(&self) -> anyhow::Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("notegit")?;
        cmd.env(CONFIG_DIR_ENV, self.config_dir.path())
            .env("NO_COLOR", "1")
            .current_dir(&self.path);
        Ok(cmd)
    }

    pub fn settings(&self) -> Result<Settings> {
        Settings::load_or_create_in(self.config_dir.path())
    }

    pub fn save_settings(&self, mut settings: Settings) -> Result<()> {
        settings.save_in(self.config_dir.path())
    }
}

fn git(repo_path: &Path, args: &[&str]) -> Result<()> {
    Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;
    Ok(())
}

/// Output of a git command as a trimmed string
pub fn git_output(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Initialize a git repository on `main` with a local identity
pub fn init_git_repo(repo_path: &Path) -> Result<()> {
    fs::create_dir_all(repo_path)?;
    git(repo_path, &["init"])?;
    git(repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(repo_path, &["config", "user.name", "Test User"])?;
    git(repo_path, &["config", "user.email", "test@example.com"])?;
    Ok(())
}

/// Sets up a fresh notes repository registered as the configured notes directory
pub fn setup_test_repo() -> Result<TestRepo> {
    let repo = setup_unconfigured_repo()?;
    init_git_repo(&repo.path)?;

    let settings = Settings {
        root_dir: Some(repo.path.clone()),
        ..Settings::default()
    };
    repo.save_settings(settings)?;

    Ok(repo)
}

/// A temporary directory and config directory with no settings and no repository
pub fn setup_unconfigured_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let config_dir = TempDir::new()?;
    let path = temp_dir.path().to_path_buf();

    Ok(TestRepo {
        temp_dir,
        config_dir,
        path,
    })
}

/// Sets up a notes repository with one committed note, `welcome.md`
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_file(&repo.path, "welcome.md", "# Welcome\n")?;
    git_add(&repo.path, "welcome.md")?;
    git_commit(&repo.path, "Initial commit")?;

    Ok(repo)
}

pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn remove_file(repo_path: &Path, filename: &str) -> Result<()> {
    fs::remove_file(repo_path.join(filename))?;
    Ok(())
}

pub fn git_add(repo_path: &Path, filename: &str) -> Result<()> {
    git(repo_path, &["add", filename])
}

pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["commit", "-m", message])
}

/// `git status --porcelain` output, one line per changed path
pub fn porcelain_status(repo_path: &Path) -> Result<Vec<String>> {
    let output = Command::new("git")
        .args(["status", "--porcelain", "--untracked-files=all"])
        .current_dir(repo_path)
        .output()?;
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect())
}
