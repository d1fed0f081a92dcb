//! Pluggable version components
//!
//! A version transition is computed by four roles, each behind its own trait:
//!
//! - [Parser]: version string -> [StructuredVersion]
//! - [Bumper]: increments named parts of a [StructuredVersion]
//! - [Serializer]: [StructuredVersion] -> version string
//! - [Replacer]: rewrites the old version string to the new one in a file
//!
//! Implementations are described by a [ComponentDescriptor] (an identifier plus
//! options) and instantiated through the [loader::ComponentLoader] catalog.

pub mod bumper;
pub mod loader;
pub mod parser;
pub mod replacer;
pub mod serializer;

pub use bumper::{increase_number, RegexBumper, SemVerBumper};
pub use loader::ComponentLoader;
pub use parser::{RegexParser, SemVerParser};
pub use replacer::SearchReplaceReplacer;
pub use serializer::{Pep440Serializer, SemVerSerializer};

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::StructuredVersion;
use crate::error::{BumpError, Result};

/// Turns a version string into a [StructuredVersion]
pub trait Parser {
    /// Fails with [BumpError::Format] when `version` does not match the grammar
    fn parse(&self, version: &str) -> Result<StructuredVersion>;
}

/// Computes the next [StructuredVersion] from the current one
pub trait Bumper {
    /// Applies `parts` left to right and returns a new version.
    /// The input is never modified.
    fn bump(&self, version: &StructuredVersion, parts: &[String]) -> Result<StructuredVersion>;
}

/// Renders a [StructuredVersion] back into a string
pub trait Serializer {
    fn serialize(&self, version: &StructuredVersion) -> Result<String>;
}

/// Writes a version transition into a file
pub trait Replacer {
    /// Checks that the transition can be written without touching any file,
    /// so configuration mistakes surface before the first rewrite.
    fn prepare(&self, _current_version: &str, _new_version: &str) -> Result<()> {
        Ok(())
    }

    /// Fails with [BumpError::PatternNotFound] and leaves the file untouched
    /// when the search text is absent.
    fn replace(&self, path: &Path, current_version: &str, new_version: &str) -> Result<()>;
}

/// The four component roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Parser,
    Bumper,
    Serializer,
    Replacer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Parser, Role::Bumper, Role::Serializer, Role::Replacer];

    /// Settings key of the role
    pub fn key(&self) -> &'static str {
        match self {
            Role::Parser => "parser",
            Role::Bumper => "bumper",
            Role::Serializer => "serializer",
            Role::Replacer => "replacer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Identifies a component implementation plus its options.
///
/// In TOML: `{ cls = "RegexBumper", preserve_zero_padding = true }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentDescriptor {
    pub cls: String,

    #[serde(flatten)]
    pub options: toml::Table,
}

impl ComponentDescriptor {
    /// Create a descriptor without options
    pub fn new(cls: impl Into<String>) -> Self {
        ComponentDescriptor {
            cls: cls.into(),
            options: toml::Table::new(),
        }
    }

    /// Builder-style option setter
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Deserialize component options into their typed form.
///
/// Option structs use `deny_unknown_fields`, so stray keys surface here as a
/// configuration error naming the component.
pub fn parse_options<T: DeserializeOwned>(cls: &str, options: &toml::Table) -> Result<T> {
    toml::Value::Table(options.clone())
        .try_into()
        .map_err(|e| BumpError::config(format!("Invalid options for '{}': {}", cls, e)))
}
