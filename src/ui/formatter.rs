//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from verbosity handling.

use std::path::Path;

use console::style;

use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a dimmed diagnostic line.
pub fn display_debug(message: &str) {
    println!("{}", style(message).dim());
}

/// Display the version transition.
///
/// # Arguments
/// * `current` - Current version string
/// * `new` - New version string
pub fn display_version_change(current: &str, new: &str) {
    println!("\n{}", style("Version change:").bold());
    println!("  From: {}", style(current).red());
    println!("  To:   {}", style(new).green());
}

/// Display a file rewrite, or the rewrite that would happen in a dry run.
pub fn display_file_change(path: &Path, old: &str, new: &str, dry_run: bool) {
    let verb = if dry_run { "Would change" } else { "Changed" };
    println!(
        "  {} {}: {} → {}",
        verb,
        style(path.display()).bold(),
        old,
        new
    );
}

/// Display a boundary warning in yellow.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("WARNING:").yellow().bold(), warning);
}
