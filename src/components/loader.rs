//! Component catalog
//!
//! Maps component identifiers to factories, one catalog per role. The built-in
//! catalog is closed; applications add their own implementations with the
//! `register_*` methods before loading settings.

use std::collections::BTreeMap;

use tracing::debug;

use super::{
    Bumper, ComponentDescriptor, Parser, Pep440Serializer, RegexBumper, RegexParser, Replacer,
    Role, SearchReplaceReplacer, SemVerBumper, SemVerParser, SemVerSerializer, Serializer,
};
use crate::error::{BumpError, Result};

/// Prefix accepted in front of built-in identifiers ("bumpversion.SemVerBumper")
pub const BUILTIN_PREFIX: &str = "bumpversion.";

/// Builds a component from its descriptor options
pub type Factory<T> = Box<dyn Fn(&toml::Table) -> Result<Box<T>>>;

struct Catalog<T: ?Sized> {
    role: Role,
    entries: BTreeMap<String, Factory<T>>,
}

impl<T: ?Sized> Catalog<T> {
    fn new(role: Role) -> Self {
        Catalog {
            role,
            entries: BTreeMap::new(),
        }
    }

    fn register(&mut self, name: impl Into<String>, factory: Factory<T>) {
        self.entries.insert(name.into(), factory);
    }

    fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn load(&self, descriptor: &ComponentDescriptor) -> Result<Box<T>> {
        let cls = descriptor.cls.as_str();
        let factory = self
            .entries
            .get(cls)
            .or_else(|| {
                cls.strip_prefix(BUILTIN_PREFIX)
                    .and_then(|name| self.entries.get(name))
            })
            .ok_or_else(|| {
                BumpError::resolution(format!(
                    "Unknown {} '{}', available: {}",
                    self.role,
                    cls,
                    self.names().join(", ")
                ))
            })?;

        debug!(role = %self.role, cls, "loading component");
        factory(&descriptor.options)
    }
}

/// Resolves [ComponentDescriptor]s into component instances
pub struct ComponentLoader {
    parsers: Catalog<dyn Parser>,
    bumpers: Catalog<dyn Bumper>,
    serializers: Catalog<dyn Serializer>,
    replacers: Catalog<dyn Replacer>,
}

impl ComponentLoader {
    /// A loader without any registered component
    pub fn empty() -> Self {
        ComponentLoader {
            parsers: Catalog::new(Role::Parser),
            bumpers: Catalog::new(Role::Bumper),
            serializers: Catalog::new(Role::Serializer),
            replacers: Catalog::new(Role::Replacer),
        }
    }

    /// A loader with the built-in catalog registered
    pub fn with_builtins() -> Self {
        let mut loader = Self::empty();

        loader.register_parser("SemVerParser", |o| Ok(Box::new(SemVerParser::from_options(o)?)));
        loader.register_parser("PEP440Parser", |o| Ok(Box::new(RegexParser::from_options(o)?)));
        loader.register_parser("RegexParser", |o| Ok(Box::new(RegexParser::from_options(o)?)));

        loader.register_bumper("SemVerBumper", |o| Ok(Box::new(SemVerBumper::from_options(o)?)));
        loader.register_bumper("RegexBumper", |o| Ok(Box::new(RegexBumper::from_options(o)?)));

        loader.register_serializer("SemVerSerializer", |o| {
            Ok(Box::new(SemVerSerializer::from_options(o)?))
        });
        loader.register_serializer("PEP440Serializer", |o| {
            Ok(Box::new(Pep440Serializer::from_options(o)?))
        });

        loader.register_replacer("SearchReplaceReplacer", |o| {
            Ok(Box::new(SearchReplaceReplacer::from_options(o)?))
        });

        loader
    }

    pub fn register_parser<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&toml::Table) -> Result<Box<dyn Parser>> + 'static,
    {
        self.parsers.register(name, Box::new(factory));
    }

    pub fn register_bumper<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&toml::Table) -> Result<Box<dyn Bumper>> + 'static,
    {
        self.bumpers.register(name, Box::new(factory));
    }

    pub fn register_serializer<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&toml::Table) -> Result<Box<dyn Serializer>> + 'static,
    {
        self.serializers.register(name, Box::new(factory));
    }

    pub fn register_replacer<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&toml::Table) -> Result<Box<dyn Replacer>> + 'static,
    {
        self.replacers.register(name, Box::new(factory));
    }

    pub fn load_parser(&self, descriptor: &ComponentDescriptor) -> Result<Box<dyn Parser>> {
        self.parsers.load(descriptor)
    }

    pub fn load_bumper(&self, descriptor: &ComponentDescriptor) -> Result<Box<dyn Bumper>> {
        self.bumpers.load(descriptor)
    }

    pub fn load_serializer(&self, descriptor: &ComponentDescriptor) -> Result<Box<dyn Serializer>> {
        self.serializers.load(descriptor)
    }

    pub fn load_replacer(&self, descriptor: &ComponentDescriptor) -> Result<Box<dyn Replacer>> {
        self.replacers.load(descriptor)
    }

    /// Registered identifiers for a role, sorted
    pub fn names(&self, role: Role) -> Vec<String> {
        match role {
            Role::Parser => self.parsers.names(),
            Role::Bumper => self.bumpers.names(),
            Role::Serializer => self.serializers.names(),
            Role::Replacer => self.replacers.names(),
        }
    }
}

impl Default for ComponentLoader {
    fn default() -> Self {
        Self::with_builtins()
    }
}
