use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bumpversion::cli::run_bump_workflow;
use bumpversion::components::ComponentLoader;
use bumpversion::config::{self, Overrides};
use bumpversion::domain::BumpRequest;
use bumpversion::git::{Git2Vcs, Vcs};
use bumpversion::ui::{Console, Verbosity};

#[derive(clap::Parser)]
#[command(
    name = "bumpversion",
    version,
    about = "Bump the version string in your project files, then commit and tag"
)]
#[command(group(
    ArgGroup::new("request")
        .required(true)
        .args(["parts", "new_version"])
))]
struct Args {
    #[arg(help = "Version parts to bump, in order (e.g. major, minor, patch)")]
    parts: Vec<String>,

    #[arg(long, help = "Set this exact version instead of bumping parts")]
    new_version: Option<String>,

    #[arg(long, help = "Custom configuration file path")]
    config_file: Option<PathBuf>,

    #[arg(long, help = "Override the current version from the configuration")]
    current_version: Option<String>,

    #[arg(long, help = "Version scheme to use (semver, pep440)")]
    schema: Option<String>,

    #[arg(short = 'n', long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Continue even if the working directory has uncommitted changes")]
    allow_dirty: bool,

    #[arg(long, overrides_with = "no_commit", help = "Commit the changed files")]
    commit: bool,

    #[arg(long, overrides_with = "commit", help = "Do not commit")]
    no_commit: bool,

    #[arg(long, overrides_with = "no_tag", help = "Create a tag for the new version")]
    tag: bool,

    #[arg(long, overrides_with = "tag", help = "Do not tag")]
    no_tag: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Print more details")]
    verbose: u8,

    #[arg(short, long, conflicts_with = "verbose", help = "Only print errors")]
    quiet: bool,
}

/// Resolve a `--flag` / `--no-flag` pair
fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn init_tracing(verbosity: Verbosity) {
    let default_level = match verbosity {
        Verbosity::Debug => "bumpversion=debug",
        _ => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let args = Args::parse();

    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);
    init_tracing(verbosity);
    let console = Console::new(verbosity);

    if let Err(e) = run(args, &console) {
        console.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args, console: &Console) -> Result<()> {
    let loaded = config::load_config(args.config_file.as_deref())?;
    match &loaded.path {
        Some(path) => console.debug(&format!("Using configuration {}", path.display())),
        None => console.debug("No configuration file found, using command line only"),
    }

    let mut config = loaded.config;
    config.apply(Overrides {
        current_version: args.current_version,
        schema: args.schema,
        dry_run: args.dry_run,
        allow_dirty: args.allow_dirty,
        commit: flag_pair(args.commit, args.no_commit),
        tag: flag_pair(args.tag, args.no_tag),
    });
    let settings = config.into_settings(loaded.path.as_deref())?;
    debug!(?settings, "resolved settings");

    let request = match args.new_version {
        Some(version) => BumpRequest::Explicit(version),
        None => BumpRequest::Parts(args.parts),
    };

    let vcs = match Git2Vcs::open(".") {
        Ok(vcs) => Some(vcs),
        Err(e) => {
            debug!(error = %e, "no git repository");
            None
        }
    };

    let loader = ComponentLoader::with_builtins();
    let result = run_bump_workflow(
        &settings,
        &request,
        &loader,
        vcs.as_ref().map(|vcs| vcs as &dyn Vcs),
        console,
    )?;

    if settings.dry_run {
        console.status(&format!(
            "Dry run complete: {} → {}",
            result.current_version, result.new_version
        ));
    } else {
        console.success(&format!(
            "Bumped {} → {} ({} file(s))",
            result.current_version,
            result.new_version,
            result.files.len()
        ));
    }

    Ok(())
}
