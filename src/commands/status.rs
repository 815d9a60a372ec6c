use crate::core::{
    classifier::ClassifiedStatus,
    command_init::CommandInit,
    error::Result,
    output::{format_change, print_info, print_section_header},
};

pub async fn execute_status() -> Result<()> {
    let context = CommandInit::initialize().await?;
    print_changes(context.controller.status());
    Ok(())
}

/// Print the staged and unstaged lists, or a clean-tree notice
pub fn print_changes(status: &ClassifiedStatus) {
    if status.is_clean() {
        print_info("Nothing to commit, notes are clean");
        return;
    }

    for line in render_changes(status) {
        match line {
            ChangeLine::Header(header) => print_section_header(header),
            ChangeLine::Entry(entry) => println!("{entry}"),
        }
    }
    println!();
}

#[derive(Debug, PartialEq, Eq)]
enum ChangeLine {
    Header(&'static str),
    Entry(String),
}

fn render_changes(status: &ClassifiedStatus) -> Vec<ChangeLine> {
    let mut lines = Vec::with_capacity(status.staged.len() + status.unstaged.len() + 2);

    if status.has_staged() {
        lines.push(ChangeLine::Header("Staged changes"));
        lines.extend(
            status
                .staged
                .iter()
                .map(|change| ChangeLine::Entry(format_change(change, true))),
        );
    }

    if status.has_unstaged() {
        lines.push(ChangeLine::Header("Unstaged changes"));
        lines.extend(
            status
                .unstaged
                .iter()
                .map(|change| ChangeLine::Entry(format_change(change, false))),
        );
    }

    lines
}
