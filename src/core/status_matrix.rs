//! Three-way status matrix types.
//!
//! A status matrix row describes one file's relationship between the three
//! trees git keeps: HEAD (last commit), the working tree (files on disk) and
//! the stage (index). Each column is a closed enumeration so consumers can
//! match on it exhaustively.
//!
//! # Public API
//! - [`StatusMatrixEntry`]: One `(filename, head, workdir, stage)` row
//! - [`HeadState`], [`WorkTreeState`], [`StageState`]: Column values
//!
//! # Numeric Codes
//! Each column also has the numeric code common git engines use for the matrix:
//!
//! | column  | 0      | 1         | 2        | 3              |
//! |---------|--------|-----------|----------|----------------|
//! | head    | absent | present   |          |                |
//! | workdir | absent | identical | modified |                |
//! | stage   | absent | identical | modified | modified again |
//!
//! Raw codes are converted with [`StatusMatrixEntry::from_codes`], which
//! rejects anything outside these ranges.

use crate::core::error::{NoteGitError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the file exists in the last commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadState {
    Absent,
    Present,
}

/// Working copy compared against HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkTreeState {
    /// File missing on disk
    Absent,
    /// Same content as HEAD
    Identical,
    /// Content differs from HEAD
    Modified,
}

/// Index entry compared against HEAD and the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageState {
    /// No index entry
    Absent,
    /// Index matches HEAD
    Identical,
    /// Index matches the working copy
    Modified,
    /// Index differs from both HEAD and the working copy
    ModifiedAgain,
}

impl HeadState {
    pub fn code(self) -> u8 {
        match self {
            HeadState::Absent => 0,
            HeadState::Present => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(HeadState::Absent),
            1 => Some(HeadState::Present),
            _ => None,
        }
    }
}

impl WorkTreeState {
    pub fn code(self) -> u8 {
        match self {
            WorkTreeState::Absent => 0,
            WorkTreeState::Identical => 1,
            WorkTreeState::Modified => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(WorkTreeState::Absent),
            1 => Some(WorkTreeState::Identical),
            2 => Some(WorkTreeState::Modified),
            _ => None,
        }
    }
}

impl StageState {
    pub fn code(self) -> u8 {
        match self {
            StageState::Absent => 0,
            StageState::Identical => 1,
            StageState::Modified => 2,
            StageState::ModifiedAgain => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(StageState::Absent),
            1 => Some(StageState::Identical),
            2 => Some(StageState::Modified),
            3 => Some(StageState::ModifiedAgain),
            _ => None,
        }
    }
}

/// One row of the status matrix.
///
/// Produced by the git backend and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusMatrixEntry {
    pub filename: String,
    pub head: HeadState,
    pub workdir: WorkTreeState,
    pub stage: StageState,
}

impl StatusMatrixEntry {
    pub fn new(
        filename: impl Into<String>,
        head: HeadState,
        workdir: WorkTreeState,
        stage: StageState,
    ) -> Self {
        Self {
            filename: filename.into(),
            head,
            workdir,
            stage,
        }
    }

    /// Build an entry from raw matrix codes
    ///
    /// # Errors
    /// Returns [`NoteGitError::InvalidStatusCode`] naming the first column whose
    /// code is out of range.
    pub fn from_codes(filename: impl Into<String>, head: u8, workdir: u8, stage: u8) -> Result<Self> {
        let filename = filename.into();
        let head = HeadState::from_code(head)
            .ok_or_else(|| NoteGitError::invalid_status_code(&filename, "head", head))?;
        let workdir = WorkTreeState::from_code(workdir)
            .ok_or_else(|| NoteGitError::invalid_status_code(&filename, "workdir", workdir))?;
        let stage = StageState::from_code(stage)
            .ok_or_else(|| NoteGitError::invalid_status_code(&filename, "stage", stage))?;

        Ok(Self {
            filename,
            head,
            workdir,
            stage,
        })
    }

    /// The `(head, workdir, stage)` codes of this row
    pub fn codes(&self) -> (u8, u8, u8) {
        (self.head.code(), self.workdir.code(), self.stage.code())
    }
}

impl fmt::Display for StatusMatrixEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head, workdir, stage) = self.codes();
        write!(f, "[{head} {workdir} {stage}] {}", self.filename)
    }
}
