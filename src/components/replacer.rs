use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{parse_options, Replacer};
use crate::domain::{version_fields, Template};
use crate::error::{BumpError, Result};

fn default_search() -> String {
    "{old_version}".to_string()
}

fn default_replace() -> String {
    "{new_version}".to_string()
}

/// Replaces every occurrence of the formatted `search` template with the
/// formatted `replace` template.
///
/// The file is read whole and written back whole; nothing is written when the
/// search text is missing.
#[derive(Debug, Clone)]
pub struct SearchReplaceReplacer {
    search: Template,
    replace: Template,
    context: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchReplaceOptions {
    #[serde(default = "default_search")]
    search: String,

    #[serde(default = "default_replace")]
    replace: String,

    #[serde(default)]
    context: BTreeMap<String, String>,
}

impl Default for SearchReplaceReplacer {
    fn default() -> Self {
        Self::new(default_search(), default_replace())
    }
}

impl SearchReplaceReplacer {
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        SearchReplaceReplacer {
            search: Template::new(search),
            replace: Template::new(replace),
            context: BTreeMap::new(),
        }
    }

    /// Extra named fields available to both templates
    pub fn with_context(mut self, context: BTreeMap<String, String>) -> Self {
        self.context = context;
        self
    }

    pub fn from_options(options: &toml::Table) -> Result<Self> {
        let opts: SearchReplaceOptions = parse_options("SearchReplaceReplacer", options)?;
        Ok(Self::new(opts.search, opts.replace).with_context(opts.context))
    }

    /// Formatted search and replace strings for a transition
    pub fn render(&self, current_version: &str, new_version: &str) -> Result<(String, String)> {
        let mut fields = self.context.clone();
        fields.extend(version_fields(current_version, new_version));

        let search = self.search.format(&fields)?;
        if search.is_empty() {
            return Err(BumpError::config("Search template renders to an empty string"));
        }
        let replace = self.replace.format(&fields)?;
        Ok((search, replace))
    }
}

impl Replacer for SearchReplaceReplacer {
    fn prepare(&self, current_version: &str, new_version: &str) -> Result<()> {
        self.render(current_version, new_version).map(|_| ())
    }

    fn replace(&self, path: &Path, current_version: &str, new_version: &str) -> Result<()> {
        let (search, replace) = self.render(current_version, new_version)?;
        let content = fs::read_to_string(path)?;

        if !content.contains(&search) {
            return Err(BumpError::PatternNotFound {
                search,
                path: path.to_path_buf(),
            });
        }

        let count = content.matches(&search).count();
        fs::write(path, content.replace(&search, &replace))?;
        debug!(path = %path.display(), count, "replaced version");
        Ok(())
    }
}
