use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{Commit, ErrorCode, ObjectType, Repository, StatusOptions};
use tracing::debug;

use super::Vcs;
use crate::error::{BumpError, Result};

/// Git repository accessed through `git2`.
///
/// Extra commit arguments and signed tags have no `git2` equivalent; those
/// calls run the `git` executable in the working directory instead.
pub struct Git2Vcs {
    repo: Repository,
}

impl Git2Vcs {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;

        Ok(Git2Vcs { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Repository) -> Self {
        Git2Vcs { repo }
    }

    fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| BumpError::vcs("Repository has no working directory"))
    }

    /// Path relative to the repository root, as the index expects it
    fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self.workdir()?.canonicalize()?;
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let absolute = absolute.canonicalize()?;

        absolute
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                BumpError::vcs(format!(
                    "{} is outside of the repository {}",
                    path.display(),
                    workdir.display()
                ))
            })
    }

    fn run_git(&self, args: &[&str]) -> Result<()> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(self.workdir()?)
            .output()?;

        if output.status.success() {
            Ok(())
        } else {
            Err(BumpError::vcs(format!(
                "git {} failed: {}",
                args.first().copied().unwrap_or_default(),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Vcs for Git2Vcs {
    fn list_dirty_paths(&self) -> Result<Vec<PathBuf>> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .filter(|entry| !entry.status().is_wt_new() && !entry.status().is_ignored())
            .filter_map(|entry| entry.path().map(PathBuf::from))
            .collect())
    }

    fn stage(&self, path: &Path) -> Result<()> {
        let relative = self.relative_path(path)?;
        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;
        debug!(path = %relative.display(), "staged file");
        Ok(())
    }

    fn commit(&self, message: &str, extra_args: &[String]) -> Result<()> {
        if !extra_args.is_empty() {
            let mut args = vec!["commit", "--message", message];
            args.extend(extra_args.iter().map(String::as_str));
            return self.run_git(&args);
        }

        let signature = self.repo.signature()?;
        let mut index = self.repo.index()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        debug!(%oid, "created commit");
        Ok(())
    }

    fn tag(&self, name: &str, message: Option<&str>, sign: bool) -> Result<()> {
        if sign {
            return self.run_git(&["tag", "--sign", name, "--message", message.unwrap_or(name)]);
        }

        let target = self
            .head_commit()?
            .ok_or_else(|| BumpError::vcs(format!("Cannot tag '{}': no commits yet", name)))?;
        let object = target.as_object();

        match message {
            Some(message) => {
                let signature = self.repo.signature()?;
                self.repo.tag(name, object, &signature, message, false)?;
            }
            None => {
                self.repo.tag_lightweight(name, object, false)?;
            }
        }
        debug!(name, "created tag");
        Ok(())
    }
}
