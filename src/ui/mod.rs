//! User interface module - verbosity handling and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Deciding what gets shown for a verbosity level

use std::path::Path;

use crate::boundary::BoundaryWarning;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_debug, display_error, display_file_change,
    display_status, display_success, display_version_change,
};

/// How much the tool prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Progress and warnings
    #[default]
    Info,
    /// Everything, including resolved settings
    Debug,
}

impl Verbosity {
    /// Map `-q` / `-v` flags to a level
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Info,
            (false, _) => Verbosity::Debug,
        }
    }
}

/// Verbosity-gated console output
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    verbosity: Verbosity,
}

impl Console {
    pub fn new(verbosity: Verbosity) -> Self {
        Console { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn shows(&self, level: Verbosity) -> bool {
        level <= self.verbosity
    }

    /// Errors are always shown
    pub fn error(&self, message: &str) {
        display_error(message);
    }

    pub fn warning(&self, warning: &BoundaryWarning) {
        if self.shows(Verbosity::Info) {
            display_boundary_warning(warning);
        }
    }

    pub fn status(&self, message: &str) {
        if self.shows(Verbosity::Info) {
            display_status(message);
        }
    }

    pub fn success(&self, message: &str) {
        if self.shows(Verbosity::Info) {
            display_success(message);
        }
    }

    pub fn debug(&self, message: &str) {
        if self.shows(Verbosity::Debug) {
            display_debug(message);
        }
    }

    pub fn version_change(&self, current: &str, new: &str) {
        if self.shows(Verbosity::Info) {
            display_version_change(current, new);
        }
    }

    pub fn file_change(&self, path: &Path, old: &str, new: &str, dry_run: bool) {
        if self.shows(Verbosity::Info) {
            display_file_change(path, old, new, dry_run);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Info);
        assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(true, 1), Verbosity::Quiet);
    }

    #[test]
    fn test_console_levels() {
        let quiet = Console::new(Verbosity::Quiet);
        assert!(!quiet.shows(Verbosity::Info));

        let info = Console::default();
        assert!(info.shows(Verbosity::Info));
        assert!(!info.shows(Verbosity::Debug));

        let debug = Console::new(Verbosity::Debug);
        assert!(debug.shows(Verbosity::Info));
        assert_eq!(debug.verbosity(), Verbosity::Debug);
    }
}
