//! Main workflow orchestration logic
//!
//! Computes the version transition, rewrites the managed files and records
//! the result in version control. Kept apart from `main.rs` so the workflow
//! can be driven programmatically without clap.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::boundary::BoundaryWarning;
use crate::components::{ComponentLoader, Replacer, Serializer};
use crate::config::Settings;
use crate::domain::{version_fields, BumpRequest, StructuredVersion};
use crate::error::{BumpError, Result};
use crate::git::Vcs;
use crate::ui::Console;

/// Result of a successful bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The version before the bump
    pub current_version: String,

    /// The version after the bump
    pub new_version: String,

    /// Files rewritten (or that would be rewritten in a dry run)
    pub files: Vec<PathBuf>,

    /// Whether a commit was created
    pub committed: bool,

    /// The tag that was created
    pub tag: Option<String>,
}

/// A file rewrite prepared before anything is touched
struct PlannedChange {
    path: PathBuf,
    old: String,
    new: String,
    replacer: Box<dyn Replacer>,
}

/// Version strings used in commit and tag templates
fn display_versions(
    settings: &Settings,
    request: &BumpRequest,
    loader: &ComponentLoader,
    current: &StructuredVersion,
    new: &StructuredVersion,
) -> Result<(String, String)> {
    let descriptor = settings
        .serializer
        .as_ref()
        .or_else(|| settings.files.first().map(|file| &file.serializer));

    match (descriptor, request) {
        (Some(descriptor), _) => {
            let serializer = loader.load_serializer(descriptor)?;
            render(serializer.as_ref(), current, new)
        }
        (None, BumpRequest::Explicit(new_version)) => {
            Ok((settings.current_version.clone(), new_version.clone()))
        }
        (None, BumpRequest::Parts(_)) => Err(BumpError::config(
            "No serializer configured to render the new version",
        )),
    }
}

fn render(
    serializer: &dyn Serializer,
    current: &StructuredVersion,
    new: &StructuredVersion,
) -> Result<(String, String)> {
    Ok((serializer.serialize(current)?, serializer.serialize(new)?))
}

/// Main bump workflow
///
/// Orchestrates the whole invocation:
/// 1. Parse the current version and compute the new one
/// 2. Load the components of every managed file and render both versions
/// 3. Check the working directory for uncommitted changes
/// 4. Rewrite the managed files in order
/// 5. Optionally commit and tag
///
/// Everything that can fail on bad input happens before step 4. A failing
/// file in step 4 stops the run; files rewritten before it stay rewritten.
///
/// # Arguments
///
/// * `settings` - Validated settings
/// * `request` - Explicit new version or parts to bump
/// * `loader` - Component catalog
/// * `vcs` - Version control, `None` outside of a repository
/// * `console` - User-facing output
pub fn run_bump_workflow(
    settings: &Settings,
    request: &BumpRequest,
    loader: &ComponentLoader,
    vcs: Option<&dyn Vcs>,
    console: &Console,
) -> Result<WorkflowResult> {
    if vcs.is_none() && (settings.commit || settings.tag) {
        return Err(BumpError::config(
            "Commit or tag requested but no version control repository was found",
        ));
    }

    let parser = loader.load_parser(&settings.parser)?;
    let current = parser.parse(&settings.current_version)?;

    let new = match request {
        BumpRequest::Explicit(new_version) => parser.parse(new_version)?,
        BumpRequest::Parts(parts) => {
            let descriptor = settings
                .bumper
                .as_ref()
                .ok_or_else(|| BumpError::config("No bumper configured to bump parts"))?;
            loader.load_bumper(descriptor)?.bump(&current, parts)?
        }
    };
    debug!(?current, ?new, "computed version transition");

    let (current_version, new_version) =
        display_versions(settings, request, loader, &current, &new)?;
    console.version_change(&current_version, &new_version);
    if current_version == new_version {
        console.warning(&BoundaryWarning::UnchangedVersion {
            version: new_version.clone(),
        });
    }

    let mut planned = Vec::with_capacity(settings.files.len());
    for file in &settings.files {
        let serializer = loader.load_serializer(&file.serializer)?;
        let replacer = loader.load_replacer(&file.replacer)?;
        let (old_text, new_text) = render(serializer.as_ref(), &current, &new)?;
        replacer.prepare(&old_text, &new_text)?;
        planned.push(PlannedChange {
            path: file.path.clone(),
            old: old_text,
            new: new_text,
            replacer,
        });
    }
    if planned.is_empty() {
        console.warning(&BoundaryWarning::NoManagedFiles);
    }

    let fields = version_fields(&current_version, &new_version);
    let commit_message = settings
        .commit
        .then(|| settings.message.format(&fields))
        .transpose()?;
    let tag = if settings.tag {
        let name = settings.tag_name.format(&fields)?;
        let message = settings
            .tag_message
            .as_ref()
            .map(|template| template.format(&fields))
            .transpose()?;
        Some((name, message))
    } else {
        None
    };

    if let Some(vcs) = vcs {
        let dirty = vcs.list_dirty_paths()?;
        if !dirty.is_empty() {
            if settings.allow_dirty || settings.dry_run {
                console.warning(&BoundaryWarning::DirtyRepositoryIgnored { paths: dirty });
            } else {
                return Err(BumpError::DirtyRepository { paths: dirty });
            }
        }
    }

    if settings.dry_run {
        console.status("Dry run, no files will be changed");
    }

    for change in &planned {
        console.file_change(&change.path, &change.old, &change.new, settings.dry_run);
        if !settings.dry_run {
            change
                .replacer
                .replace(&change.path, &change.old, &change.new)?;
            info!(path = %change.path.display(), "updated file");
        }
    }

    let mut committed = false;
    if let (Some(vcs), Some(message)) = (vcs, commit_message.as_deref()) {
        if settings.dry_run {
            console.status(&format!("Would commit: {}", message));
        } else {
            for change in &planned {
                vcs.stage(&change.path)?;
            }
            vcs.commit(message, &settings.commit_args)?;
            committed = true;
            console.success(&format!("Committed: {}", message));
        }
    }

    let mut created_tag = None;
    if let (Some(vcs), Some((name, message))) = (vcs, tag) {
        if !settings.commit {
            console.warning(&BoundaryWarning::TagWithoutCommit { tag: name.clone() });
        }
        if settings.dry_run {
            console.status(&format!("Would tag: {}", name));
        } else {
            vcs.tag(&name, message.as_deref(), settings.sign_tags)?;
            console.success(&format!("Tagged: {}", name));
            created_tag = Some(name);
        }
    }

    Ok(WorkflowResult {
        current_version,
        new_version,
        files: planned.into_iter().map(|change| change.path).collect(),
        committed,
        tag: created_tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{MockVcs, VcsCall};
    use crate::scheme::Scheme;
    use std::fs;
    use tempfile::TempDir;

    fn parts(names: &[&str]) -> BumpRequest {
        BumpRequest::Parts(names.iter().map(|s| s.to_string()).collect())
    }

    fn quiet() -> Console {
        Console::new(crate::ui::Verbosity::Quiet)
    }

    #[test]
    fn test_bump_without_files() {
        let settings = Settings::for_scheme(Scheme::SemVer, "1.2.3", Vec::<PathBuf>::new());
        let loader = ComponentLoader::with_builtins();
        let result =
            run_bump_workflow(&settings, &parts(&["minor"]), &loader, None, &quiet()).unwrap();
        assert_eq!(result.current_version, "1.2.3");
        assert_eq!(result.new_version, "1.3.0");
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_explicit_version_is_validated() {
        let settings = Settings::for_scheme(Scheme::SemVer, "1.2.3", Vec::<PathBuf>::new());
        let loader = ComponentLoader::with_builtins();
        let err = run_bump_workflow(
            &settings,
            &BumpRequest::Explicit("2.0".to_string()),
            &loader,
            None,
            &quiet(),
        )
        .unwrap_err();
        assert!(matches!(err, BumpError::Format(_)));
    }

    #[test]
    fn test_commit_requires_repository() {
        let mut settings = Settings::for_scheme(Scheme::SemVer, "1.2.3", Vec::<PathBuf>::new());
        settings.commit = true;
        let loader = ComponentLoader::with_builtins();
        let err =
            run_bump_workflow(&settings, &parts(&["patch"]), &loader, None, &quiet()).unwrap_err();
        assert!(matches!(err, BumpError::Configuration(_)));
    }

    #[test]
    fn test_dirty_repository_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("VERSION");
        fs::write(&file, "1.2.3").unwrap();

        let settings = Settings::for_scheme(Scheme::SemVer, "1.2.3", [&file]);
        let mut vcs = MockVcs::new();
        vcs.add_dirty("README.md");

        let loader = ComponentLoader::with_builtins();
        let err = run_bump_workflow(&settings, &parts(&["patch"]), &loader, Some(&vcs), &quiet())
            .unwrap_err();
        assert!(matches!(err, BumpError::DirtyRepository { .. }));
        assert_eq!(fs::read_to_string(&file).unwrap(), "1.2.3");
        assert!(vcs.mutating_calls().is_empty());
    }

    #[test]
    fn test_commit_and_tag() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("VERSION");
        fs::write(&file, "1.2.3").unwrap();

        let mut settings = Settings::for_scheme(Scheme::SemVer, "1.2.3", [&file]);
        settings.commit = true;
        settings.tag = true;
        settings.commit_args = vec!["--no-verify".to_string()];
        let vcs = MockVcs::new();

        let loader = ComponentLoader::with_builtins();
        let result =
            run_bump_workflow(&settings, &parts(&["major"]), &loader, Some(&vcs), &quiet())
                .unwrap();

        assert!(result.committed);
        assert_eq!(result.tag.as_deref(), Some("v2.0.0"));
        assert_eq!(
            vcs.mutating_calls(),
            vec![
                VcsCall::Stage(file.clone()),
                VcsCall::Commit {
                    message: "Bump version: 1.2.3 → 2.0.0".to_string(),
                    extra_args: vec!["--no-verify".to_string()],
                },
                VcsCall::Tag {
                    name: "v2.0.0".to_string(),
                    message: None,
                    sign: false,
                },
            ]
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("VERSION");
        fs::write(&file, "1.2.3").unwrap();

        let mut settings = Settings::for_scheme(Scheme::SemVer, "1.2.3", [&file]);
        settings.dry_run = true;
        settings.commit = true;
        settings.tag = true;
        let mut vcs = MockVcs::new();
        vcs.add_dirty("VERSION");

        let loader = ComponentLoader::with_builtins();
        let result =
            run_bump_workflow(&settings, &parts(&["patch"]), &loader, Some(&vcs), &quiet())
                .unwrap();

        assert_eq!(result.new_version, "1.2.4");
        assert_eq!(result.files, vec![file.clone()]);
        assert!(!result.committed);
        assert_eq!(result.tag, None);
        assert_eq!(fs::read_to_string(&file).unwrap(), "1.2.3");
        assert!(vcs.mutating_calls().is_empty());
    }

    #[test]
    fn test_invalid_tag_template_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("VERSION");
        fs::write(&file, "1.2.3").unwrap();

        let mut settings = Settings::for_scheme(Scheme::SemVer, "1.2.3", [&file]);
        settings.tag = true;
        settings.tag_name = crate::domain::Template::new("v{version}");
        let vcs = MockVcs::new();

        let loader = ComponentLoader::with_builtins();
        let err = run_bump_workflow(&settings, &parts(&["patch"]), &loader, Some(&vcs), &quiet())
            .unwrap_err();
        assert!(matches!(err, BumpError::Configuration(_)));
        assert_eq!(fs::read_to_string(&file).unwrap(), "1.2.3");
    }
}
