use std::fmt;
use std::path::PathBuf;

/// Warnings raised while bumping that do not stop the run.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Uncommitted changes were found but the run continues (allow_dirty or dry run)
    DirtyRepositoryIgnored { paths: Vec<PathBuf> },
    /// No file is configured, only the version itself is computed
    NoManagedFiles,
    /// The new version renders the same as the current one
    UnchangedVersion { version: String },
    /// A tag is created on HEAD although the bump itself is not committed
    TagWithoutCommit { tag: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::DirtyRepositoryIgnored { paths } => {
                let shown: Vec<String> = paths
                    .iter()
                    .take(5)
                    .map(|p| p.display().to_string())
                    .collect();
                write!(f, "Working directory is dirty ({}", shown.join(", "))?;
                if paths.len() > 5 {
                    write!(f, " and {} more", paths.len() - 5)?;
                }
                write!(f, "), continuing anyway")
            }
            BoundaryWarning::NoManagedFiles => {
                write!(f, "No files configured, nothing will be rewritten")
            }
            BoundaryWarning::UnchangedVersion { version } => {
                write!(f, "New version '{}' is the same as the current one", version)
            }
            BoundaryWarning::TagWithoutCommit { tag } => {
                write!(
                    f,
                    "Tag '{}' will point to the previous commit since committing is disabled",
                    tag
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_warning_truncates_paths() {
        let paths = (0..7).map(|i| PathBuf::from(format!("f{}.txt", i))).collect();
        let msg = BoundaryWarning::DirtyRepositoryIgnored { paths }.to_string();
        assert!(msg.contains("f4.txt"));
        assert!(!msg.contains("f5.txt"));
        assert!(msg.contains("and 2 more"));
    }

    #[test]
    fn test_tag_without_commit_names_tag() {
        let msg = BoundaryWarning::TagWithoutCommit {
            tag: "v1.2.0".to_string(),
        }
        .to_string();
        assert!(msg.contains("v1.2.0"));
    }
}
