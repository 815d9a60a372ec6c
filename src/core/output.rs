//! Terminal output helpers shared by every command.
//!
//! Red for errors, green for successes, bright_black for secondary detail.
//! Each helper prints a blank line around its message so consecutive command
//! outputs stay readable.

use crate::core::classifier::FileChange;
use crate::core::messages::StatusMessage;
use colored::*;

/// Prints `✕ Error: <message>` in red
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Prints `✓ <message>` with a green checkmark
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// Print a controller message as either a success or an error line
pub fn print_status_message(message: &StatusMessage) {
    if message.is_error() {
        print_error(&message.to_string());
    } else {
        print_success(&message.to_string());
    }
}

/// One line of a change list, e.g. `  deleted  notes/old.md`
pub fn format_change(change: &FileChange, staged: bool) -> String {
    let (label, path) = match (change.is_deleted, staged) {
        (true, true) => ("deleted ".red(), change.filename.red()),
        (true, false) => ("deleted ".red(), change.filename.white()),
        (false, true) => ("changed ".green(), change.filename.green()),
        (false, false) => ("changed ".yellow(), change.filename.white()),
    };
    format!("  {label} {path}")
}
