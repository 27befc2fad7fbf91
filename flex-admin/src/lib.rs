//! # Flex Admin
//!
//! Command-line administration for flex search documents: category mapping
//! management, ad-hoc searches and bulk loads against OpenSearch.
//!
//! ## Modules
//!
//! - [`commands`]: Subcommands and their execution against a `FlexService`
//! - [`config`]: Connection mode and dependency initialization
//! - [`errors`]: Error types for the admin tool

pub mod commands;
pub mod config;
pub mod errors;

pub use commands::{execute, CategoryArgs, Command};
pub use config::Dependencies;
pub use errors::AdminError;
