//! Query body types for the query shortcuts.
//!
//! Each shortcut produces a fixed query shape plus a result-size cap. The body
//! is opaque to the rest of the system and is sent to the engine unmodified.

use serde_json::{json, Value};

use crate::types::document::DocumentKey;

/// Default cap on the number of hits a shortcut asks for.
pub const DEFAULT_RESULT_SIZE: usize = 1000;

/// Default fuzziness for fuzzy queries.
pub const DEFAULT_FUZZINESS: &str = "AUTO";

/// Default shape type for geo-shape queries.
pub const DEFAULT_SHAPE_TYPE: &str = "envelope";

/// Tuning parameters for a more-like-this query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoreLikeThisOptions {
    /// Minimum term frequency below which terms are ignored in the input documents.
    pub min_term_freq: u32,
    /// Share of the selected terms a document must match, between 0 and 1.
    pub percent_terms_to_match: f64,
    /// Minimum word length below which terms are ignored.
    pub min_word_length: u32,
}

impl Default for MoreLikeThisOptions {
    fn default() -> Self {
        Self {
            min_term_freq: 1,
            percent_terms_to_match: 0.5,
            min_word_length: 3,
        }
    }
}

impl MoreLikeThisOptions {
    /// Render the match share as the engine's percentage string, e.g. `0.5` -> `"50%"`.
    pub fn minimum_should_match(&self) -> String {
        format!("{}%", (self.percent_terms_to_match * 100.0).round() as i64)
    }
}

/// A query plus its result-size cap.
///
/// # Example
///
/// ```
/// use flex_shared::QueryBody;
/// use serde_json::json;
///
/// let body = QueryBody::match_field("title", "rust").with_size(10).into_body();
/// assert_eq!(body, json!({"query": {"match": {"title": "rust"}}, "size": 10}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBody {
    query: Value,
    size: usize,
}

impl QueryBody {
    /// Wrap an arbitrary query clause.
    pub fn new(query: Value) -> Self {
        Self {
            query,
            size: DEFAULT_RESULT_SIZE,
        }
    }

    /// `match` query on a single field.
    pub fn match_field(field: &str, value: impl Into<Value>) -> Self {
        Self::new(json!({
            "match": { field: value.into() }
        }))
    }

    /// `multi_match` query across several fields.
    pub fn multi_match<I, S>(fields: I, value: impl Into<Value>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(json!({
            "multi_match": {
                "query": value.into(),
                "fields": collect_strings(fields),
            }
        }))
    }

    /// `fuzzy` query with `AUTO` fuzziness.
    pub fn fuzzy(field: &str, value: impl Into<Value>) -> Self {
        Self::fuzzy_with(field, value, DEFAULT_FUZZINESS)
    }

    /// `fuzzy` query with explicit fuzziness (`"AUTO"`, `"1"`, `"2"`, ...).
    pub fn fuzzy_with(field: &str, value: impl Into<Value>, fuzziness: &str) -> Self {
        Self::new(json!({
            "fuzzy": {
                field: {
                    "value": value.into(),
                    "fuzziness": fuzziness,
                }
            }
        }))
    }

    /// `geo_shape` query with an `envelope` shape.
    pub fn geoshape(field: &str, coordinates: Value) -> Self {
        Self::geoshape_with_type(field, coordinates, DEFAULT_SHAPE_TYPE)
    }

    /// `geo_shape` query with an explicit shape type.
    pub fn geoshape_with_type(field: &str, coordinates: Value, shape_type: &str) -> Self {
        Self::new(json!({
            "geo_shape": {
                field: {
                    "shape": {
                        "type": shape_type,
                        "coordinates": coordinates,
                    }
                }
            }
        }))
    }

    /// `ids` query.
    pub fn ids<I>(values: I) -> Self
    where
        I: IntoIterator<Item = DocumentKey>,
    {
        let values: Vec<String> = values.into_iter().map(|key| key.to_string()).collect();
        Self::new(json!({
            "ids": { "values": values }
        }))
    }

    /// `more_like_this` query seeded with the given documents.
    pub fn more_like_this<I, S, K>(fields: I, ids: K, options: MoreLikeThisOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        K: IntoIterator<Item = DocumentKey>,
    {
        let like: Vec<Value> = ids
            .into_iter()
            .map(|key| json!({ "_id": key.to_string() }))
            .collect();

        Self::new(json!({
            "more_like_this": {
                "fields": collect_strings(fields),
                "like": like,
                "min_term_freq": options.min_term_freq,
                "minimum_should_match": options.minimum_should_match(),
                "min_word_length": options.min_word_length,
            }
        }))
    }

    /// Set the result-size cap.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn query(&self) -> &Value {
        &self.query
    }

    /// Build the request body sent to the engine.
    pub fn into_body(self) -> Value {
        json!({
            "query": self.query,
            "size": self.size,
        })
    }
}

fn collect_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
