use regex::Regex;
use semver::{BuildMetadata, Prerelease};
use serde::Deserialize;
use tracing::debug;

use super::parser::{from_semver, to_semver};
use super::{parse_options, Bumper};
use crate::domain::{PartValue, StructuredVersion};
use crate::error::{BumpError, Result};

/// Non-digit prefix followed by the digits to increase, e.g. "rc" + "1"
const PREFIXED_NUMBER: &str = r"^(?P<prefix>\D*)(?P<num>\d+)$";

/// Last run of digits inside an identifier, e.g. "rc." + "9" + ""
const LAST_NUMBER: &str = r"^(?P<head>.*?)(?P<num>\d+)(?P<tail>\D*)$";

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| BumpError::format(format!("Invalid pattern '{}': {}", pattern, e)))
}

/// Increment a run of digits, optionally keeping its width ("09" -> "10", "007" -> "008")
fn increment_digits(original: &str, digits: &str, preserve_width: bool) -> Result<String> {
    let next = digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| BumpError::Increment(original.to_string()))?;

    if preserve_width {
        Ok(format!("{:0width$}", next, width = digits.len()))
    } else {
        Ok(next.to_string())
    }
}

/// Increase a version part value.
///
/// Purely numeric values are incremented directly ("9" -> "10"). Otherwise the
/// value must be a non-numeric prefix followed by digits, and only the trailing
/// digits change ("rc1" -> "rc2", ".post3" -> ".post4"). Anything else, such as
/// "abc" or "1a2", fails with [BumpError::Increment].
pub fn increase_number(value: &str, preserve_zero_padding: bool) -> Result<String> {
    let caps = compile(PREFIXED_NUMBER)?
        .captures(value)
        .ok_or_else(|| BumpError::Increment(value.to_string()))?;

    let bumped = increment_digits(value, &caps["num"], preserve_zero_padding)?;
    Ok(format!("{}{}", &caps["prefix"], bumped))
}

/// Bumps parts of a version matched by a regex.
///
/// Bumping a part increments it (or sets it to "1" when absent) and resets every
/// less significant part: numeric parts become "0", others are removed.
#[derive(Debug, Clone, Default)]
pub struct RegexBumper {
    preserve_zero_padding: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegexBumperOptions {
    #[serde(default)]
    preserve_zero_padding: bool,
}

impl RegexBumper {
    pub fn new(preserve_zero_padding: bool) -> Self {
        RegexBumper {
            preserve_zero_padding,
        }
    }

    pub fn from_options(options: &toml::Table) -> Result<Self> {
        let opts: RegexBumperOptions = parse_options("RegexBumper", options)?;
        Ok(Self::new(opts.preserve_zero_padding))
    }

    fn increase(&self, value: &PartValue) -> Result<PartValue> {
        match value {
            PartValue::Number(n) => n
                .checked_add(1)
                .map(PartValue::Number)
                .ok_or_else(|| BumpError::Increment(n.to_string())),
            PartValue::Text(s) => {
                increase_number(s, self.preserve_zero_padding).map(PartValue::Text)
            }
        }
    }
}

impl Bumper for RegexBumper {
    fn bump(&self, version: &StructuredVersion, parts: &[String]) -> Result<StructuredVersion> {
        parts.iter().try_fold(version.clone(), |current, part| -> Result<StructuredVersion> {
            let index = current.position(part).ok_or_else(|| {
                BumpError::config(format!("Unknown version part '{}'", part))
            })?;

            let next = match current.get(part) {
                Some(value) => self.increase(value)?,
                None => PartValue::from("1"),
            };
            debug!(part = part.as_str(), value = %next, "bumped part");

            Ok(current.replaced_at(index, Some(next), |lower| {
                lower.is_numeric().then(|| lower.zero())
            }))
        })
    }
}

fn default_separator() -> String {
    ".".to_string()
}

/// Bumps a version following SemVer precedence
/// (major > minor > patch > prerelease > build).
#[derive(Debug, Clone)]
pub struct SemVerBumper {
    prerelease_token: Option<String>,
    build_token: Option<String>,
    separator: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SemVerBumperOptions {
    #[serde(default)]
    prerelease_token: Option<String>,

    #[serde(default)]
    build_token: Option<String>,

    #[serde(default = "default_separator")]
    separator: String,
}

impl Default for SemVerBumper {
    fn default() -> Self {
        SemVerBumper {
            prerelease_token: None,
            build_token: None,
            separator: default_separator(),
        }
    }
}

impl SemVerBumper {
    pub fn new(
        prerelease_token: Option<String>,
        build_token: Option<String>,
        separator: impl Into<String>,
    ) -> Self {
        SemVerBumper {
            prerelease_token,
            build_token,
            separator: separator.into(),
        }
    }

    pub fn from_options(options: &toml::Table) -> Result<Self> {
        let opts: SemVerBumperOptions = parse_options("SemVerBumper", options)?;
        Ok(Self::new(
            opts.prerelease_token,
            opts.build_token,
            opts.separator,
        ))
    }

    /// Next value of a prerelease or build identifier.
    ///
    /// Increments the last number ("rc.1" -> "rc.2"), appends one when there is
    /// none ("rc" -> "rc.1"), or starts from the configured token when absent.
    fn next_identifier(&self, part: &str, current: &str, token: Option<&str>) -> Result<String> {
        if current.is_empty() {
            return match token {
                Some(token) => Ok(format!("{}{}1", token, self.separator)),
                None => Err(BumpError::config(format!(
                    "Cannot bump absent '{}' without a configured {}_token",
                    part, part
                ))),
            };
        }

        match compile(LAST_NUMBER)?.captures(current) {
            Some(caps) => {
                let bumped = increment_digits(current, &caps["num"], true)?;
                Ok(format!("{}{}{}", &caps["head"], bumped, &caps["tail"]))
            }
            None => Ok(format!("{}{}1", current, self.separator)),
        }
    }
}

fn increment(value: u64, part: &str) -> Result<u64> {
    value
        .checked_add(1)
        .ok_or_else(|| BumpError::Increment(part.to_string()))
}

impl Bumper for SemVerBumper {
    fn bump(&self, version: &StructuredVersion, parts: &[String]) -> Result<StructuredVersion> {
        let mut next = to_semver(version)?;

        for part in parts {
            match part.as_str() {
                "major" => {
                    next.major = increment(next.major, part)?;
                    next.minor = 0;
                    next.patch = 0;
                    next.pre = Prerelease::EMPTY;
                    next.build = BuildMetadata::EMPTY;
                }
                "minor" => {
                    next.minor = increment(next.minor, part)?;
                    next.patch = 0;
                    next.pre = Prerelease::EMPTY;
                    next.build = BuildMetadata::EMPTY;
                }
                "patch" => {
                    next.patch = increment(next.patch, part)?;
                    next.pre = Prerelease::EMPTY;
                    next.build = BuildMetadata::EMPTY;
                }
                "prerelease" => {
                    let pre = self.next_identifier(
                        part,
                        next.pre.as_str(),
                        self.prerelease_token.as_deref(),
                    )?;
                    next.pre = Prerelease::new(&pre).map_err(|e| {
                        BumpError::format(format!("Invalid prerelease '{}': {}", pre, e))
                    })?;
                    next.build = BuildMetadata::EMPTY;
                }
                "build" => {
                    let build =
                        self.next_identifier(part, next.build.as_str(), self.build_token.as_deref())?;
                    next.build = BuildMetadata::new(&build).map_err(|e| {
                        BumpError::format(format!("Invalid build metadata '{}': {}", build, e))
                    })?;
                }
                other => {
                    return Err(BumpError::config(format!(
                        "Unknown SemVer part '{}', expected major, minor, patch, prerelease or build",
                        other
                    )))
                }
            }
            debug!(part = part.as_str(), version = %next, "bumped part");
        }

        Ok(from_semver(&next))
    }
}
