use crate::commands::status::print_changes;
use crate::core::{
    command_init::{CommandContext, CommandInit},
    controller::BatchReport,
    error::{NoteGitError, Result},
    messages::StatusMessage,
    output::{print_error, print_status_message},
};

pub async fn execute_stage(files: Vec<String>, all: bool) -> Result<()> {
    let mut context = CommandInit::initialize().await?;

    if all {
        let report = context.controller.stage_all().await;
        return finish_batch(&context, &report);
    }

    let mut failures = Vec::new();
    for file in &files {
        context.controller.stage_file(file).await;
        collect_failure(&context, &mut failures);
    }
    finish_files(&context, files.len(), failures, |count| StatusMessage::Staged {
        count,
    })
}

pub async fn execute_unstage(files: Vec<String>, all: bool) -> Result<()> {
    let mut context = CommandInit::initialize().await?;

    if all {
        let report = context.controller.unstage_all().await;
        return finish_batch(&context, &report);
    }

    let mut failures = Vec::new();
    for file in &files {
        context.controller.unstage_file(file).await;
        collect_failure(&context, &mut failures);
    }
    finish_files(&context, files.len(), failures, |count| StatusMessage::Unstaged {
        count,
    })
}

fn collect_failure(context: &CommandContext, failures: &mut Vec<StatusMessage>) {
    if let Some(message) = context.controller.message().filter(|m| m.is_error()) {
        failures.push(message.clone());
    }
}

fn finish_files(
    context: &CommandContext,
    requested: usize,
    failures: Vec<StatusMessage>,
    success: impl Fn(usize) -> StatusMessage,
) -> Result<()> {
    let succeeded = requested - failures.len();
    if succeeded > 0 {
        print_status_message(&success(succeeded));
    }
    print_changes(context.controller.status());

    match failures.split_last() {
        None => Ok(()),
        Some((last, rest)) => {
            for failure in rest {
                print_error(&failure.to_string());
            }
            Err(NoteGitError::action_failed(last))
        }
    }
}

fn finish_batch(context: &CommandContext, report: &BatchReport) -> Result<()> {
    for failure in &report.failures {
        log::debug!("{}: {}", failure.filename, failure.error);
        print_error(&format!("{}: {}", failure.filename, failure.error));
    }
    let outcome = context.finish();
    print_changes(context.controller.status());
    outcome
}
