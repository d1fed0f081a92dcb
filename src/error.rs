use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for bumpversion operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Version format error: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown scheme: '{0}'")]
    UnknownScheme(String),

    #[error("Cannot resolve component: {0}")]
    Resolution(String),

    #[error("Pattern '{search}' was not found in file {}", .path.display())]
    PatternNotFound { search: String, path: PathBuf },

    #[error("Working directory is dirty, modified paths: {}", format_paths(.paths))]
    DirtyRepository { paths: Vec<PathBuf> },

    #[error("Version part '{0}' cannot be increased")]
    Increment(String),

    #[error("Version control operation failed: {0}")]
    Vcs(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in bumpversion
pub type Result<T> = std::result::Result<T, BumpError>;

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl BumpError {
    /// Create a format error with context
    pub fn format(msg: impl Into<String>) -> Self {
        BumpError::Format(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Configuration(msg.into())
    }

    /// Create a resolution error with context
    pub fn resolution(msg: impl Into<String>) -> Self {
        BumpError::Resolution(msg.into())
    }

    /// Create a version control error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        BumpError::Vcs(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BumpError::config("missing parser");
        assert_eq!(err.to_string(), "Configuration error: missing parser");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BumpError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_pattern_not_found_names_file() {
        let err = BumpError::PatternNotFound {
            search: "1.2.3".to_string(),
            path: PathBuf::from("setup.py"),
        };
        let msg = err.to_string();
        assert!(msg.contains("1.2.3"));
        assert!(msg.contains("setup.py"));
    }

    #[test]
    fn test_dirty_repository_lists_paths() {
        let err = BumpError::DirtyRepository {
            paths: vec![PathBuf::from("a.txt"), PathBuf::from("src/b.rs")],
        };
        assert!(err.to_string().ends_with("a.txt, src/b.rs"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (BumpError::format("x"), "Version format error"),
            (BumpError::config("x"), "Configuration error"),
            (BumpError::resolution("x"), "Cannot resolve component"),
            (BumpError::vcs("x"), "Version control operation failed"),
            (BumpError::UnknownScheme("x".to_string()), "Unknown scheme"),
            (BumpError::Increment("abc".to_string()), "Version part 'abc'"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
