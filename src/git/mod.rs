//! Version control abstraction layer
//!
//! The bump workflow talks to version control only through the [Vcs] trait:
//!
//! - [repository::Git2Vcs]: a real implementation using the `git2` crate
//! - [mock::MockVcs]: a recording implementation for testing
//!
//! # Usage
//!
//! ```rust
//! # use bumpversion::git::Vcs;
//! # fn example<V: Vcs>(vcs: &V) -> bumpversion::Result<()> {
//! if vcs.list_dirty_paths()?.is_empty() {
//!     vcs.commit("Bump version: 1.0.0 → 1.1.0", &[])?;
//!     vcs.tag("v1.1.0", None, false)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{MockVcs, VcsCall};
pub use repository::Git2Vcs;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Version control operations needed to record a version bump
///
/// ## Error Handling
///
/// Implementations map their failures to [crate::error::BumpError::Vcs] or
/// [crate::error::BumpError::Git].
pub trait Vcs {
    /// Paths with uncommitted modifications, untracked files excluded
    fn list_dirty_paths(&self) -> Result<Vec<PathBuf>>;

    /// Add a file to the next commit
    ///
    /// # Arguments
    /// * `path` - File path, absolute or relative to the working directory
    fn stage(&self, path: &Path) -> Result<()>;

    /// Commit staged changes
    ///
    /// # Arguments
    /// * `message` - Commit message
    /// * `extra_args` - Additional arguments for the commit command (e.g. `--no-verify`)
    fn commit(&self, message: &str, extra_args: &[String]) -> Result<()>;

    /// Tag the current HEAD
    ///
    /// # Arguments
    /// * `name` - Tag name
    /// * `message` - Annotation message; `None` creates a lightweight tag
    /// * `sign` - Create a signed tag
    fn tag(&self, name: &str, message: Option<&str>, sign: bool) -> Result<()>;
}
