//! This module defines the core data structures used across the document sync layer.
//! It re-exports the address, value, query, result and bulk types.

pub mod bulk;
pub mod canonical_date_time;
pub mod document;
pub mod field_value;
pub mod query_body;
pub mod search_result;
pub mod write_outcome;

pub use document::{DocumentAddress, DocumentKey, IndexTarget};
pub use write_outcome::WriteOutcome;
