use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;
use crate::git::Vcs;

/// A call received by [MockVcs]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    ListDirtyPaths,
    Stage(PathBuf),
    Commit {
        message: String,
        extra_args: Vec<String>,
    },
    Tag {
        name: String,
        message: Option<String>,
        sign: bool,
    },
}

/// Mock version control for testing without actual git operations
pub struct MockVcs {
    dirty: Vec<PathBuf>,
    calls: Mutex<Vec<VcsCall>>,
}

impl MockVcs {
    /// Create a clean mock repository
    pub fn new() -> Self {
        MockVcs {
            dirty: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mark a path as modified
    pub fn add_dirty(&mut self, path: impl Into<PathBuf>) {
        self.dirty.push(path.into());
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Calls that change the repository
    pub fn mutating_calls(&self) -> Vec<VcsCall> {
        self.calls()
            .into_iter()
            .filter(|call| *call != VcsCall::ListDirtyPaths)
            .collect()
    }

    fn record(&self, call: VcsCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for MockVcs {
    fn list_dirty_paths(&self) -> Result<Vec<PathBuf>> {
        self.record(VcsCall::ListDirtyPaths);
        Ok(self.dirty.clone())
    }

    fn stage(&self, path: &Path) -> Result<()> {
        self.record(VcsCall::Stage(path.to_path_buf()));
        Ok(())
    }

    fn commit(&self, message: &str, extra_args: &[String]) -> Result<()> {
        self.record(VcsCall::Commit {
            message: message.to_string(),
            extra_args: extra_args.to_vec(),
        });
        Ok(())
    }

    fn tag(&self, name: &str, message: Option<&str>, sign: bool) -> Result<()> {
        self.record(VcsCall::Tag {
            name: name.to_string(),
            message: message.map(String::from),
            sign,
        });
        Ok(())
    }
}
