//! Error types for the flex repository.
//!
//! This module provides a unified error type for all search and sync operations.

mod flex_error;

pub use flex_error::FlexError;
