use crate::commands::status::print_changes;
use crate::core::{command_init::CommandInit, error::Result};

pub async fn execute_commit(message: String) -> Result<()> {
    let mut context = CommandInit::initialize().await?;

    context.controller.set_draft_message(message);
    let hash = context.controller.commit_draft().await;
    if let Some(hash) = &hash {
        log::debug!("New commit {hash}");
    }

    context.finish()?;
    print_changes(context.controller.status());
    Ok(())
}
