//! Shared setup for commands that act on the notes repository.
//!
//! [`CommandInit`] handles the steps every repository command repeats:
//! 1. **Settings**: Load the persisted settings
//! 2. **Repository**: Open the repository at the configured notes directory
//! 3. **Controller**: Build an action controller from a configuration snapshot
//! 4. **Status**: Fetch and classify the current status matrix
//!
//! [`CommandContext::finish`] turns the controller's last message into the
//! command's outcome, so failed actions exit non-zero.

use crate::core::{
    config::{ControllerConfig, Settings},
    controller::GitActionController,
    error::{NoteGitError, Result},
    git::Git2Backend,
    output::print_success,
};

/// Initialized context for repository commands
pub struct CommandContext {
    pub settings: Settings,
    pub controller: GitActionController<Git2Backend>,
}

impl CommandContext {
    /// Print the last controller message; a failure message becomes an error
    pub fn finish(&self) -> Result<()> {
        match self.controller.message() {
            Some(message) if message.is_error() => Err(NoteGitError::action_failed(message)),
            Some(message) => {
                print_success(&message.to_string());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

pub struct CommandInit;

impl CommandInit {
    pub async fn initialize() -> Result<CommandContext> {
        let settings = Settings::load_or_create()?;
        Self::initialize_with(settings).await
    }

    pub async fn initialize_with(settings: Settings) -> Result<CommandContext> {
        let root = settings.require_root_dir()?;
        log::debug!("Opening notes repository at {}", root.display());
        let backend = Git2Backend::open(root)?;

        let mut controller =
            GitActionController::new(backend, ControllerConfig::from_settings(&settings));
        if !controller.refresh_status().await {
            if let Some(message) = controller.message() {
                return Err(NoteGitError::action_failed(message));
            }
        }

        Ok(CommandContext {
            settings,
            controller,
        })
    }
}
