//! Markdown notes stored under the notes directory.
//!
//! [`NoteStore`] gives path-keyed access to the note files: list, read, write,
//! create, delete and rename. Every path is relative to the notes directory.
//! Absolute paths and paths with `..` are rejected before touching the disk.

use crate::core::error::{NoteGitError, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

const NOTE_EXTENSION: &str = "md";
const GIT_DIR: &str = ".git";

#[derive(Debug, Clone)]
pub struct NoteStore {
    root: PathBuf,
}

impl NoteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let is_plain = path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if path.as_os_str().is_empty() || !is_plain {
            return Err(NoteGitError::invalid_note_path(path));
        }
        Ok(self.root.join(path))
    }

    /// All markdown notes, as sorted paths relative to the notes directory
    pub async fn list(&self) -> Result<Vec<PathBuf>> {
        let mut notes = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;

                if file_type.is_dir() {
                    if entry.file_name() != GIT_DIR {
                        pending.push(path);
                    }
                } else if path.extension().is_some_and(|ext| ext == NOTE_EXTENSION) {
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        notes.push(relative.to_path_buf());
                    }
                }
            }
        }

        notes.sort();
        Ok(notes)
    }

    pub async fn read(&self, path: impl AsRef<Path>) -> Result<String> {
        let full_path = self.resolve(path.as_ref())?;
        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| not_found_or(e, path.as_ref()))
    }

    /// Replace the note's content, creating it and its parent directories if needed
    pub async fn write(&self, path: impl AsRef<Path>, content: &str) -> Result<()> {
        let full_path = self.resolve(path.as_ref())?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, content).await?;
        log::debug!("Wrote {} bytes to {}", content.len(), full_path.display());
        Ok(())
    }

    /// Create an empty note; fails if it already exists
    pub async fn create(&self, path: impl AsRef<Path>) -> Result<()> {
        let full_path = self.resolve(path.as_ref())?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => NoteGitError::note_already_exists(path.as_ref()),
                _ => NoteGitError::Io(e),
            })?;

        Ok(())
    }

    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<()> {
        let full_path = self.resolve(path.as_ref())?;
        tokio::fs::remove_file(&full_path)
            .await
            .map_err(|e| not_found_or(e, path.as_ref()))
    }

    /// Move a note; the destination must not exist yet
    pub async fn rename(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
        let source = self.resolve(from.as_ref())?;
        let target = self.resolve(to.as_ref())?;

        if !tokio::fs::try_exists(&source).await? {
            return Err(NoteGitError::note_not_found(from.as_ref()));
        }
        if tokio::fs::try_exists(&target).await? {
            return Err(NoteGitError::note_already_exists(to.as_ref()));
        }
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::rename(&source, &target).await?;
        Ok(())
    }
}

fn not_found_or(error: std::io::Error, path: &Path) -> NoteGitError {
    match error.kind() {
        ErrorKind::NotFound => NoteGitError::note_not_found(path),
        _ => NoteGitError::Io(error),
    }
}
