use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::components::{ComponentDescriptor, Role};
use crate::domain::Template;
use crate::error::{BumpError, Result};
use crate::scheme::Scheme;

/// Configuration files looked up in the working directory, with the table
/// path of the bumpversion section inside each.
pub const CONFIG_FILES: [(&str, &[&str]); 2] = [
    ("bumpversion.toml", &["bumpversion"]),
    ("pyproject.toml", &["tool", "bumpversion"]),
];

/// Raw settings as written in the configuration file.
///
/// Either `schema` or explicit components describe how versions are handled;
/// explicit components override the scheme's choice for their role.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub current_version: Option<String>,

    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default)]
    pub parser: Option<ComponentDescriptor>,

    #[serde(default)]
    pub bumper: Option<ComponentDescriptor>,

    #[serde(default)]
    pub serializer: Option<ComponentDescriptor>,

    #[serde(default)]
    pub replacer: Option<ComponentDescriptor>,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub commit: bool,

    #[serde(default)]
    pub tag: bool,

    #[serde(default)]
    pub allow_dirty: bool,

    #[serde(default)]
    pub sign_tags: bool,

    #[serde(default = "default_message")]
    pub message: String,

    #[serde(default = "default_tag_name")]
    pub tag_name: String,

    #[serde(default)]
    pub tag_message: Option<String>,

    #[serde(default)]
    pub commit_args: Vec<String>,

    #[serde(default)]
    pub file: Vec<FileConfig>,
}

/// A `[[file]]` entry: a managed file with optional component overrides
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    pub path: PathBuf,

    #[serde(default)]
    pub serializer: Option<ComponentDescriptor>,

    #[serde(default)]
    pub replacer: Option<ComponentDescriptor>,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileConfig {
            path: path.into(),
            serializer: None,
            replacer: None,
        }
    }
}

/// Returns the default commit message template.
fn default_message() -> String {
    "Bump version: {current_version} → {new_version}".to_string()
}

/// Returns the default tag name template.
fn default_tag_name() -> String {
    "v{new_version}".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            current_version: None,
            schema: None,
            parser: None,
            bumper: None,
            serializer: None,
            replacer: None,
            dry_run: false,
            commit: false,
            tag: false,
            allow_dirty: false,
            sign_tags: false,
            message: default_message(),
            tag_name: default_tag_name(),
            tag_message: None,
            commit_args: Vec::new(),
            file: Vec::new(),
        }
    }
}

/// Values given on the command line, taking precedence over the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub current_version: Option<String>,
    pub schema: Option<String>,
    pub dry_run: bool,
    pub allow_dirty: bool,
    pub commit: Option<bool>,
    pub tag: Option<bool>,
}

impl Config {
    /// Apply command line values on top of the file settings
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(current_version) = overrides.current_version {
            self.current_version = Some(current_version);
        }
        if let Some(schema) = overrides.schema {
            self.schema = Some(schema);
        }
        self.dry_run |= overrides.dry_run;
        self.allow_dirty |= overrides.allow_dirty;
        if let Some(commit) = overrides.commit {
            self.commit = commit;
        }
        if let Some(tag) = overrides.tag {
            self.tag = tag;
        }
    }

    /// Validate and resolve into [Settings].
    ///
    /// `config_path` is the file these settings came from; it is managed like
    /// any `[[file]]` entry so its `current_version` gets rewritten too.
    pub fn into_settings(self, config_path: Option<&Path>) -> Result<Settings> {
        let current_version = self
            .current_version
            .ok_or_else(|| BumpError::config("current_version is not set"))?;

        let scheme = self.schema.as_deref().map(str::parse::<Scheme>).transpose()?;

        let explicit = [&self.parser, &self.bumper, &self.serializer, &self.replacer];
        if scheme.is_some() && explicit.iter().all(|d| d.is_some()) {
            return Err(BumpError::config(
                "Both a schema and all four components are set, use one or the other",
            ));
        }

        let root = |explicit: Option<ComponentDescriptor>, role: Role| {
            explicit.or_else(|| scheme.map(|s| s.descriptor(role)))
        };
        let parser = root(self.parser, Role::Parser).ok_or_else(|| {
            BumpError::config("Incomplete schema definition: set `schema` or a `parser`")
        })?;
        let bumper = root(self.bumper, Role::Bumper);
        let serializer = root(self.serializer, Role::Serializer);
        let replacer = root(self.replacer, Role::Replacer);

        let mut file_configs = self.file;
        if let Some(path) = config_path {
            if !file_configs.iter().any(|file| same_path(&file.path, path)) {
                file_configs.push(FileConfig::new(path));
            }
        }

        let files = file_configs
            .into_iter()
            .map(|file| -> Result<ManagedFile> {
                let serializer = file.serializer.or_else(|| serializer.clone()).ok_or_else(|| {
                    BumpError::config(format!(
                        "{} setting is missing serializer option",
                        file.path.display()
                    ))
                })?;
                let replacer = file.replacer.or_else(|| replacer.clone()).ok_or_else(|| {
                    BumpError::config(format!(
                        "{} setting is missing replacer option",
                        file.path.display()
                    ))
                })?;
                Ok(ManagedFile {
                    path: file.path,
                    serializer,
                    replacer,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Settings {
            current_version,
            parser,
            bumper,
            serializer,
            files,
            dry_run: self.dry_run,
            commit: self.commit,
            tag: self.tag,
            allow_dirty: self.allow_dirty,
            sign_tags: self.sign_tags,
            message: Template::new(self.message),
            tag_name: Template::new(self.tag_name),
            tag_message: self.tag_message.map(Template::new),
            commit_args: self.commit_args,
        })
    }
}

/// Whether two paths name the same file, ignoring `./` and resolving
/// through the filesystem when both exist
fn same_path(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (fs::canonicalize(a), fs::canonicalize(b)) {
        return a == b;
    }
    fn significant(p: &Path) -> Vec<Component<'_>> {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect::<Vec<_>>()
    }
    significant(a) == significant(b)
}

/// A file whose version string gets rewritten, with its resolved components
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedFile {
    pub path: PathBuf,
    pub serializer: ComponentDescriptor,
    pub replacer: ComponentDescriptor,
}

/// Validated settings of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub current_version: String,
    pub parser: ComponentDescriptor,
    /// Only needed when parts are bumped
    pub bumper: Option<ComponentDescriptor>,
    /// Root serializer, used for commit and tag messages
    pub serializer: Option<ComponentDescriptor>,
    pub files: Vec<ManagedFile>,
    pub dry_run: bool,
    pub commit: bool,
    pub tag: bool,
    pub allow_dirty: bool,
    pub sign_tags: bool,
    pub message: Template,
    pub tag_name: Template,
    pub tag_message: Option<Template>,
    pub commit_args: Vec<String>,
}

impl Settings {
    /// Settings using a built-in scheme for every role and default options
    pub fn for_scheme<P: Into<PathBuf>>(
        scheme: Scheme,
        current_version: impl Into<String>,
        files: impl IntoIterator<Item = P>,
    ) -> Self {
        let files = files
            .into_iter()
            .map(|path| ManagedFile {
                path: path.into(),
                serializer: scheme.descriptor(Role::Serializer),
                replacer: scheme.descriptor(Role::Replacer),
            })
            .collect();

        Settings {
            current_version: current_version.into(),
            parser: scheme.descriptor(Role::Parser),
            bumper: Some(scheme.descriptor(Role::Bumper)),
            serializer: Some(scheme.descriptor(Role::Serializer)),
            files,
            dry_run: false,
            commit: false,
            tag: false,
            allow_dirty: false,
            sign_tags: false,
            message: Template::new(default_message()),
            tag_name: Template::new(default_tag_name()),
            tag_message: None,
            commit_args: Vec::new(),
        }
    }
}

/// Configuration read from disk together with the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

/// Parse the bumpversion section of a configuration file.
///
/// Returns `Ok(None)` when the file has no such section.
fn read_section(path: &Path, sections: &[&str]) -> Result<Option<Config>> {
    let content = fs::read_to_string(path)?;
    let mut table: toml::Table = toml::from_str(&content)?;

    for section in sections {
        match table.remove(*section) {
            Some(toml::Value::Table(inner)) => table = inner,
            Some(_) => {
                return Err(BumpError::config(format!(
                    "[{}] in {} is not a table",
                    sections.join("."),
                    path.display()
                )))
            }
            None => return Ok(None),
        }
    }

    Ok(Some(toml::Value::Table(table).try_into()?))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `bumpversion.toml` in `dir` (`[bumpversion]` section)
/// 3. `pyproject.toml` in `dir` (`[tool.bumpversion]` section)
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `dir` - Directory searched for configuration files
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(LoadedConfig)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config_in(dir: &Path, config_path: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = config_path {
        let is_pyproject = path.file_name().is_some_and(|name| name == "pyproject.toml");
        let sections: &[&str] = if is_pyproject {
            &["tool", "bumpversion"]
        } else {
            &["bumpversion"]
        };
        let config = read_section(path, sections)?.ok_or_else(|| {
            BumpError::config(format!(
                "{} has no [{}] section",
                path.display(),
                sections.join(".")
            ))
        })?;
        debug!(path = %path.display(), "loaded configuration");
        return Ok(LoadedConfig {
            config,
            path: Some(path.to_path_buf()),
        });
    }

    for (name, sections) in CONFIG_FILES {
        let candidate = dir.join(name);
        if !candidate.is_file() {
            continue;
        }
        if let Some(config) = read_section(&candidate, sections)? {
            debug!(path = %candidate.display(), "discovered configuration");
            return Ok(LoadedConfig {
                config,
                path: Some(candidate),
            });
        }
    }

    Ok(LoadedConfig {
        config: Config::default(),
        path: None,
    })
}

/// Loads configuration relative to the current working directory.
///
/// See [load_config_in].
pub fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    load_config_in(Path::new("."), config_path)
}
