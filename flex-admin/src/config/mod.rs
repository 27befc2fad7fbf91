//! Configuration and dependency initialization for the admin tool.

mod dependencies;

pub use dependencies::{ConnectionMode, Dependencies};
