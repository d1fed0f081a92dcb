pub mod boundary;
pub mod cli;
pub mod components;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod scheme;
pub mod ui;

pub use error::{BumpError, Result};
