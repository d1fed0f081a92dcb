use std::collections::BTreeMap;

use crate::error::{BumpError, Result};

/// A `{name}` placeholder template (e.g. "v{new_version}", "version = {old_version}")
///
/// `{{` and `}}` render literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub pattern: String,
}

impl Template {
    /// Create a new template
    pub fn new(pattern: impl Into<String>) -> Self {
        Template {
            pattern: pattern.into(),
        }
    }

    /// Substitute every placeholder from `fields`.
    ///
    /// Fails with a configuration error on unknown fields or unbalanced braces.
    pub fn format(&self, fields: &BTreeMap<String, String>) -> Result<String> {
        let mut out = String::with_capacity(self.pattern.len());
        let mut chars = self.pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => {
                                return Err(BumpError::config(format!(
                                    "Unclosed placeholder in template '{}'",
                                    self.pattern
                                )))
                            }
                        }
                    }
                    let value = fields.get(&name).ok_or_else(|| {
                        BumpError::config(format!(
                            "Unknown field '{{{}}}' in template '{}'",
                            name, self.pattern
                        ))
                    })?;
                    out.push_str(value);
                }
                '}' => {
                    return Err(BumpError::config(format!(
                        "Single '}}' in template '{}'",
                        self.pattern
                    )))
                }
                other => out.push(other),
            }
        }

        Ok(out)
    }
}

/// Fields shared by every version template
pub fn version_fields(current_version: &str, new_version: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    fields.insert("current_version".to_string(), current_version.to_string());
    fields.insert("old_version".to_string(), current_version.to_string());
    fields.insert("new_version".to_string(), new_version.to_string());
    fields
}
