//! Predicates for notegit command output

#![allow(dead_code)]

use predicates::prelude::*;

pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

pub fn root_not_configured() -> impl Predicate<str> {
    predicates::str::contains("Notes directory is not configured")
}

pub fn clean_tree() -> impl Predicate<str> {
    predicates::str::contains("Nothing to commit, notes are clean")
}

pub fn has_staged_section() -> impl Predicate<str> {
    predicates::str::contains("Staged changes:")
}

pub fn has_unstaged_section() -> impl Predicate<str> {
    predicates::str::contains("Unstaged changes:")
}

/// A change line, e.g. `changed  notes/a.md`
pub fn has_change(label: &str, filename: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("{label}  {filename}"))
}
