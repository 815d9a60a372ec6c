//! Persisted settings and the controller's configuration snapshot.
//!
//! [`Settings`] is the mutable, on-disk record (`settings.json` in the config
//! directory). The controller never reads it directly. Instead it receives a
//! [`ControllerConfig`], an immutable snapshot built once from the settings and
//! replaced only between actions.

use crate::core::backend::RemoteAuth;
use crate::core::dirs::get_config_directory;
use crate::core::error::NoteGitError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";
const MASK: &str = "****";
const MASK_VISIBLE_CHARS: usize = 4;

/// Commit author identity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: "Notegit".to_string(),
            email: "notegit@localhost".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub root_dir: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub author: Author,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Settings {
    pub fn load_or_create() -> Result<Self, NoteGitError> {
        Self::load_or_create_in(&get_config_directory()?)
    }

    pub fn load_or_create_in(config_dir: &Path) -> Result<Self, NoteGitError> {
        let settings_file = config_dir.join(SETTINGS_FILE);

        if settings_file.exists() {
            let content = std::fs::read_to_string(&settings_file)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            log::debug!("No settings at {}, creating defaults", settings_file.display());
            let mut settings = Self::default();
            settings.save_in(config_dir)?;
            Ok(settings)
        }
    }

    pub fn save(&mut self) -> Result<(), NoteGitError> {
        self.save_in(&get_config_directory()?)
    }

    pub fn save_in(&mut self, config_dir: &Path) -> Result<(), NoteGitError> {
        std::fs::create_dir_all(config_dir)?;

        self.updated_at = Some(chrono::Utc::now());
        let settings_file = config_dir.join(SETTINGS_FILE);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&settings_file, content)?;

        log::debug!("Saved settings to {}", settings_file.display());
        Ok(())
    }

    /// Notes directory, or an error telling the user how to set it
    pub fn require_root_dir(&self) -> Result<&Path, NoteGitError> {
        self.root_dir
            .as_deref()
            .ok_or(NoteGitError::RootDirNotConfigured)
    }

    /// Token with everything but the last four characters hidden; short
    /// tokens are hidden entirely
    pub fn masked_token(&self) -> Option<String> {
        self.token.as_ref().map(|token| {
            let len = token.chars().count();
            if len <= MASK_VISIBLE_CHARS {
                return MASK.to_string();
            }
            let visible: String = token.chars().skip(len - MASK_VISIBLE_CHARS).collect();
            format!("{MASK}{visible}")
        })
    }
}

/// Immutable configuration handed to the action controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerConfig {
    pub author: Author,
    /// Present only when both a remote URL and a token are configured
    pub remote: Option<RemoteAuth>,
}

impl ControllerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let remote = match (settings.remote_url.as_deref(), settings.token.as_deref()) {
            (Some(url), Some(token)) if !url.trim().is_empty() && !token.trim().is_empty() => {
                Some(RemoteAuth::new(url.trim(), token.trim()))
            }
            _ => None,
        };

        Self {
            author: settings.author.clone(),
            remote,
        }
    }
}
