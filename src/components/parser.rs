use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::{parse_options, Parser};
use crate::domain::{PartValue, StructuredVersion};
use crate::error::{BumpError, Result};

/// Slots produced by [SemVerParser], most significant first
pub const SEMVER_PARTS: [&str; 5] = ["major", "minor", "patch", "prerelease", "build"];

/// Default pattern of [RegexParser]: a PEP 440 subset
/// (release, optional pre/post/dev segments)
pub const PEP440_PATTERN: &str = r"^(?P<major>\d+)(?:\.(?P<minor>\d+))?(?:\.(?P<patch>\d+))?(?P<pre>(?:a|b|rc)\d+)?(?P<post>\.post\d+)?(?P<dev>\.dev\d+)?$";

/// Parses `major.minor.patch[-prerelease][+build]`
#[derive(Debug, Clone, Default)]
pub struct SemVerParser;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SemVerParserOptions {}

impl SemVerParser {
    pub fn new() -> Self {
        SemVerParser
    }

    pub fn from_options(options: &toml::Table) -> Result<Self> {
        let _: SemVerParserOptions = parse_options("SemVerParser", options)?;
        Ok(SemVerParser)
    }
}

impl Parser for SemVerParser {
    fn parse(&self, version: &str) -> Result<StructuredVersion> {
        let parsed = semver::Version::parse(version.trim()).map_err(|e| {
            BumpError::format(format!("'{}' is not a valid SemVer version: {}", version, e))
        })?;
        Ok(from_semver(&parsed))
    }
}

/// Convert a `semver::Version` into its structured form
pub(crate) fn from_semver(version: &semver::Version) -> StructuredVersion {
    let mut structured = StructuredVersion::with_slots(SEMVER_PARTS)
        .with("major", version.major)
        .with("minor", version.minor)
        .with("patch", version.patch);
    if !version.pre.is_empty() {
        structured = structured.with("prerelease", version.pre.as_str());
    }
    if !version.build.is_empty() {
        structured = structured.with("build", version.build.as_str());
    }
    structured
}

/// Convert a structured version back into a `semver::Version`.
///
/// Fails when a numeric field is missing or not a number, or when the
/// prerelease/build identifiers are not valid SemVer.
pub(crate) fn to_semver(version: &StructuredVersion) -> Result<semver::Version> {
    let number = |name: &str| -> Result<u64> {
        match version.get(name) {
            Some(PartValue::Number(n)) => Ok(*n),
            Some(PartValue::Text(s)) => s.parse::<u64>().map_err(|_| {
                BumpError::format(format!("SemVer part '{}' is not a number: '{}'", name, s))
            }),
            None => Err(BumpError::format(format!(
                "SemVer part '{}' is missing",
                name
            ))),
        }
    };

    let mut parsed = semver::Version::new(number("major")?, number("minor")?, number("patch")?);
    if let Some(pre) = version.get("prerelease") {
        parsed.pre = semver::Prerelease::new(&pre.to_string()).map_err(|e| {
            BumpError::format(format!("Invalid prerelease '{}': {}", pre, e))
        })?;
    }
    if let Some(build) = version.get("build") {
        parsed.build = semver::BuildMetadata::new(&build.to_string()).map_err(|e| {
            BumpError::format(format!("Invalid build metadata '{}': {}", build, e))
        })?;
    }
    Ok(parsed)
}

/// Parses a version with a regular expression of named groups.
///
/// Every named group listed in `parts` becomes a slot, in that order; groups
/// that did not take part in the match stay absent.
#[derive(Debug, Clone)]
pub struct RegexParser {
    regex: Regex,
    parts: Vec<String>,
}

fn default_pattern() -> String {
    PEP440_PATTERN.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegexParserOptions {
    #[serde(default = "default_pattern")]
    regex: String,

    #[serde(default)]
    parts: Vec<String>,
}

impl RegexParser {
    /// Compile `pattern`; an empty `parts` list takes the named groups in pattern order.
    ///
    /// The pattern is anchored so it must match the whole version string.
    pub fn new(pattern: &str, parts: Vec<String>) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| BumpError::resolution(format!("Invalid regex '{}': {}", pattern, e)))?;

        let group_names: Vec<String> = regex.capture_names().flatten().map(String::from).collect();
        let parts = if parts.is_empty() {
            group_names
        } else {
            if let Some(unknown) = parts.iter().find(|p| !group_names.contains(p)) {
                return Err(BumpError::config(format!(
                    "Part '{}' is not a named group of regex '{}'",
                    unknown, pattern
                )));
            }
            parts
        };

        if parts.is_empty() {
            return Err(BumpError::config(format!(
                "Regex '{}' has no named groups",
                pattern
            )));
        }

        Ok(RegexParser { regex, parts })
    }

    /// Parser with the built-in PEP 440 pattern
    pub fn pep440() -> Result<Self> {
        Self::new(PEP440_PATTERN, Vec::new())
    }

    pub fn from_options(options: &toml::Table) -> Result<Self> {
        let opts: RegexParserOptions = parse_options("PEP440Parser", options)?;
        Self::new(&opts.regex, opts.parts)
    }

    /// Part names in significance order
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl Parser for RegexParser {
    fn parse(&self, version: &str) -> Result<StructuredVersion> {
        let caps = self.regex.captures(version.trim()).ok_or_else(|| {
            BumpError::format(format!(
                "'{}' does not match pattern '{}'",
                version,
                self.regex.as_str()
            ))
        })?;

        let structured = self
            .parts
            .iter()
            .fold(StructuredVersion::with_slots(&self.parts), |acc, name| {
                match caps.name(name) {
                    Some(m) => acc.with(name, m.as_str()),
                    None => acc,
                }
            });

        debug!(version, ?structured, "parsed version");
        Ok(structured)
    }
}
