//! Built-in versioning schemes
//!
//! A scheme names a fixed set of parser, bumper, serializer and replacer
//! components that work together.

use std::fmt;
use std::str::FromStr;

use crate::components::{ComponentDescriptor, Role};
use crate::error::{BumpError, Result};

/// Closed catalog of versioning schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    SemVer,
    Pep440,
}

impl Scheme {
    pub const ALL: [Scheme; 2] = [Scheme::SemVer, Scheme::Pep440];

    /// Scheme name as used in settings
    pub fn name(&self) -> &'static str {
        match self {
            Scheme::SemVer => "semver",
            Scheme::Pep440 => "pep440",
        }
    }

    /// Component identifier the scheme uses for `role`
    pub fn component(&self, role: Role) -> &'static str {
        match (self, role) {
            (Scheme::SemVer, Role::Parser) => "SemVerParser",
            (Scheme::SemVer, Role::Bumper) => "SemVerBumper",
            (Scheme::SemVer, Role::Serializer) => "SemVerSerializer",
            (Scheme::Pep440, Role::Parser) => "PEP440Parser",
            (Scheme::Pep440, Role::Bumper) => "RegexBumper",
            (Scheme::Pep440, Role::Serializer) => "PEP440Serializer",
            (_, Role::Replacer) => "SearchReplaceReplacer",
        }
    }

    /// Descriptor for `role`, without options
    pub fn descriptor(&self, role: Role) -> ComponentDescriptor {
        ComponentDescriptor::new(self.component(role))
    }
}

impl FromStr for Scheme {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.name() == s)
            .ok_or_else(|| BumpError::UnknownScheme(s.to_string()))
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Descriptor of `role` in the scheme called `scheme_name`
pub fn resolve(scheme_name: &str, role: Role) -> Result<ComponentDescriptor> {
    Ok(scheme_name.parse::<Scheme>()?.descriptor(role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentLoader;

    #[test]
    fn test_resolve_semver() {
        assert_eq!(resolve("semver", Role::Parser).unwrap().cls, "SemVerParser");
        assert_eq!(resolve("semver", Role::Bumper).unwrap().cls, "SemVerBumper");
        assert_eq!(
            resolve("semver", Role::Replacer).unwrap().cls,
            "SearchReplaceReplacer"
        );
    }

    #[test]
    fn test_resolve_pep440() {
        assert_eq!(resolve("pep440", Role::Parser).unwrap().cls, "PEP440Parser");
        assert_eq!(resolve("pep440", Role::Bumper).unwrap().cls, "RegexBumper");
        assert_eq!(
            resolve("pep440", Role::Serializer).unwrap().cls,
            "PEP440Serializer"
        );
    }

    #[test]
    fn test_resolve_unknown_scheme() {
        let err = resolve("calver", Role::Parser).unwrap_err();
        assert!(matches!(err, BumpError::UnknownScheme(name) if name == "calver"));
    }

    #[test]
    fn test_scheme_display_roundtrip() {
        for scheme in Scheme::ALL {
            assert_eq!(scheme.to_string().parse::<Scheme>().unwrap(), scheme);
        }
    }

    #[test]
    fn test_every_scheme_component_is_loadable() {
        let loader = ComponentLoader::with_builtins();
        for scheme in Scheme::ALL {
            assert!(loader.load_parser(&scheme.descriptor(Role::Parser)).is_ok());
            assert!(loader.load_bumper(&scheme.descriptor(Role::Bumper)).is_ok());
            assert!(loader
                .load_serializer(&scheme.descriptor(Role::Serializer))
                .is_ok());
            assert!(loader
                .load_replacer(&scheme.descriptor(Role::Replacer))
                .is_ok());
        }
    }
}
