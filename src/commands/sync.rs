use crate::commands::status::print_changes;
use crate::core::{command_init::CommandInit, error::Result};

pub async fn execute_push() -> Result<()> {
    let mut context = CommandInit::initialize().await?;
    context.controller.push().await;
    context.finish()
}

pub async fn execute_pull() -> Result<()> {
    let mut context = CommandInit::initialize().await?;
    context.controller.pull().await;
    context.finish()?;
    print_changes(context.controller.status());
    Ok(())
}
