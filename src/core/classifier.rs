//! Status classification into staged and unstaged buckets.
//!
//! [`classify`] reduces a raw status matrix to the two lists the interface
//! works with: changes that will go into the next commit ([`ClassifiedStatus::staged`])
//! and changes that will not ([`ClassifiedStatus::unstaged`]).
//!
//! | head    | workdir   | stage          | outcome                        |
//! |---------|-----------|----------------|--------------------------------|
//! | absent  | modified  | absent         | unstaged (new file)            |
//! | present | absent    | absent         | staged deletion                |
//! | any     | absent    | identical      | unstaged deletion              |
//! | any     | modified  | identical      | unstaged modification          |
//! | any     | modified  | modified       | staged modification/addition   |
//! | any     | modified  | modified again | both staged and unstaged       |
//!
//! Every other combination is a clean file and is left out of both lists.

use crate::core::status_matrix::{HeadState, StageState, StatusMatrixEntry, WorkTreeState};
use serde::{Deserialize, Serialize};

/// A single actionable change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileChange {
    pub filename: String,
    pub is_deleted: bool,
}

impl FileChange {
    pub fn new(filename: impl Into<String>, is_deleted: bool) -> Self {
        Self {
            filename: filename.into(),
            is_deleted,
        }
    }
}

/// Staged and unstaged changes derived from one status matrix.
///
/// A filename can sit in both lists when it was staged and then edited again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedStatus {
    pub staged: Vec<FileChange>,
    pub unstaged: Vec<FileChange>,
}

impl ClassifiedStatus {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty()
    }

    pub fn has_staged(&self) -> bool {
        !self.staged.is_empty()
    }

    pub fn has_unstaged(&self) -> bool {
        !self.unstaged.is_empty()
    }
}

/// Where a single matrix row lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Unstaged { is_deleted: bool },
    Staged { is_deleted: bool },
    Both,
    Clean,
}

fn bucket_for(entry: &StatusMatrixEntry) -> Bucket {
    use HeadState as H;
    use StageState as S;
    use WorkTreeState as W;

    match (entry.head, entry.workdir, entry.stage) {
        (H::Absent, W::Modified, S::Absent) => Bucket::Unstaged { is_deleted: false },
        (H::Present, W::Absent, S::Absent) => Bucket::Staged { is_deleted: true },
        (_, W::Absent, S::Identical) => Bucket::Unstaged { is_deleted: true },
        (_, W::Modified, S::Identical) => Bucket::Unstaged { is_deleted: false },
        (_, W::Modified, S::Modified) => Bucket::Staged { is_deleted: false },
        (_, W::Modified, S::ModifiedAgain) => Bucket::Both,

        (H::Absent, W::Absent, S::Absent)
        | (_, W::Identical, _)
        | (_, W::Absent, S::Modified | S::ModifiedAgain)
        | (H::Present, W::Modified, S::Absent) => Bucket::Clean,
    }
}

/// Split a status matrix into staged and unstaged changes.
///
/// Pure and deterministic. Both output lists keep the relative order of the
/// input rows.
pub fn classify<'a, I>(matrix: I) -> ClassifiedStatus
where
    I: IntoIterator<Item = &'a StatusMatrixEntry>,
{
    let mut status = ClassifiedStatus::default();

    for entry in matrix {
        match bucket_for(entry) {
            Bucket::Unstaged { is_deleted } => status
                .unstaged
                .push(FileChange::new(entry.filename.as_str(), is_deleted)),
            Bucket::Staged { is_deleted } => status
                .staged
                .push(FileChange::new(entry.filename.as_str(), is_deleted)),
            Bucket::Both => {
                status
                    .unstaged
                    .push(FileChange::new(entry.filename.as_str(), false));
                status
                    .staged
                    .push(FileChange::new(entry.filename.as_str(), false));
            }
            Bucket::Clean => {}
        }
    }

    status
}
