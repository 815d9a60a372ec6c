//! Shared test utilities for notegit integration tests
//!
//! Every test gets its own temporary notes repository and its own config
//! directory, so runs never touch the user's real settings.

pub mod assertions;
pub mod fixtures;
pub mod repository;
