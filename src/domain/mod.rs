//! Domain logic - version representation and templates, independent of files and git

pub mod template;
pub mod version;

pub use template::{version_fields, Template};
pub use version::{BumpRequest, PartValue, StructuredVersion};
