//! # Flex Shared
//!
//! This crate defines the data structures shared between the search provider
//! and the document sync service: document addresses, attribute values, query
//! bodies, search hits, bulk items and write outcomes.

pub mod types;

pub use types::canonical_date_time;
pub use types::bulk::{BulkAction, BulkItemResult, BulkOperation, BulkResponse, BulkSummary};
pub use types::document::{DocumentAddress, DocumentKey, IndexTarget};
pub use types::field_value::{to_document, FieldValue, Fields, CANONICAL_DATE_TIME_FORMAT};
pub use types::query_body::{
    MoreLikeThisOptions, QueryBody, DEFAULT_FUZZINESS, DEFAULT_RESULT_SIZE, DEFAULT_SHAPE_TYPE,
};
pub use types::search_result::{
    DocumentHit, DocumentMeta, RawHit, RawSearchResponse, RawTotal, SearchResults,
};
pub use types::write_outcome::WriteOutcome;
