use std::collections::BTreeMap;

use serde::Deserialize;

use super::parser::to_semver;
use super::{parse_options, Serializer};
use crate::domain::StructuredVersion;
use crate::error::{BumpError, Result};

/// Renders `major.minor.patch[-prerelease][+build]`
#[derive(Debug, Clone, Default)]
pub struct SemVerSerializer;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SemVerSerializerOptions {}

impl SemVerSerializer {
    pub fn new() -> Self {
        SemVerSerializer
    }

    pub fn from_options(options: &toml::Table) -> Result<Self> {
        let _: SemVerSerializerOptions = parse_options("SemVerSerializer", options)?;
        Ok(SemVerSerializer)
    }
}

impl Serializer for SemVerSerializer {
    fn serialize(&self, version: &StructuredVersion) -> Result<String> {
        Ok(to_semver(version)?.to_string())
    }
}

/// Delimiters written before numeric PEP 440 parts
pub fn default_delimiters() -> BTreeMap<String, String> {
    [
        ("minor", "."),
        ("patch", "."),
        ("pre", "rc"),
        ("post", ".post"),
        ("dev", ".dev"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Renders parts in slot order.
///
/// A numeric part is prefixed with its delimiter; a part that kept its own
/// prefix when parsed ("rc1", ".post2") is written verbatim.
#[derive(Debug, Clone)]
pub struct Pep440Serializer {
    delimiters: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Pep440SerializerOptions {
    #[serde(default)]
    delimiters: BTreeMap<String, String>,
}

impl Default for Pep440Serializer {
    fn default() -> Self {
        Pep440Serializer {
            delimiters: default_delimiters(),
        }
    }
}

impl Pep440Serializer {
    /// Serializer with `overrides` applied on top of the default delimiters
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        let mut delimiters = default_delimiters();
        delimiters.extend(overrides);
        Pep440Serializer { delimiters }
    }

    pub fn from_options(options: &toml::Table) -> Result<Self> {
        let opts: Pep440SerializerOptions = parse_options("PEP440Serializer", options)?;
        Ok(Self::new(opts.delimiters))
    }
}

impl Serializer for Pep440Serializer {
    fn serialize(&self, version: &StructuredVersion) -> Result<String> {
        let mut out = String::new();
        for (name, value) in version.parts() {
            if value.is_numeric() {
                if let Some(delimiter) = self.delimiters.get(name) {
                    // The leading part never gets a delimiter
                    if !out.is_empty() {
                        out.push_str(delimiter);
                    }
                }
            }
            out.push_str(&value.to_string());
        }

        if out.is_empty() {
            return Err(BumpError::format("Cannot serialize a version without parts"));
        }
        Ok(out)
    }
}
