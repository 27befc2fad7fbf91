//! Search result types.
//!
//! The engine's raw response is parsed into [`RawSearchResponse`]; hits are
//! then hydrated into entities and wrapped as [`DocumentHit`]s carrying the
//! search-derived metadata.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Total hit count as reported by the engine.
///
/// Older engines report a bare number, newer ones an object with `value`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

impl RawTotal {
    pub fn value(&self) -> u64 {
        match self {
            RawTotal::Count(value) | RawTotal::Object { value } => *value,
        }
    }
}

/// A single hit from the engine.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_version", default)]
    pub version: Option<i64>,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
    #[serde(default)]
    pub highlight: HashMap<String, Vec<String>>,
}

impl RawHit {
    /// Extract the search-derived metadata. Only the first snippet of each
    /// highlighted field is kept.
    pub fn meta(&self) -> DocumentMeta {
        let highlights = self
            .highlight
            .iter()
            .filter_map(|(field, snippets)| {
                snippets
                    .first()
                    .map(|snippet| (field.clone(), snippet.clone()))
            })
            .collect();

        DocumentMeta {
            score: self.score,
            version: self.version,
            highlights,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawHits {
    #[serde(default)]
    pub total: Option<RawTotal>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// The subset of a search response this crate interprets.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub took: u64,
    pub hits: RawHits,
}

/// Metadata attached to an entity materialized from a search hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentMeta {
    /// Relevance score, when the engine reported one.
    pub score: Option<f64>,
    /// Stored document version, when the engine reported one.
    pub version: Option<i64>,
    /// First highlighted snippet per field.
    pub highlights: HashMap<String, String>,
}

/// An entity hydrated from a search hit.
///
/// Dereferences to the entity itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHit<T> {
    pub entity: T,
    pub meta: DocumentMeta,
}

impl<T> DocumentHit<T> {
    pub fn new(entity: T, meta: DocumentMeta) -> Self {
        Self { entity, meta }
    }

    /// Hydrated hits always represent a search document.
    pub fn is_document(&self) -> bool {
        true
    }

    pub fn document_score(&self) -> Option<f64> {
        self.meta.score
    }

    pub fn document_version(&self) -> Option<i64> {
        self.meta.version
    }

    /// The highlighted snippet for `field`, if any.
    pub fn highlight(&self, field: &str) -> Option<&str> {
        self.meta.highlights.get(field).map(String::as_str)
    }

    pub fn into_entity(self) -> T {
        self.entity
    }
}

impl<T> Deref for DocumentHit<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.entity
    }
}

impl<T> DerefMut for DocumentHit<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.entity
    }
}

/// Hydrated search response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults<T> {
    /// The hits, in engine order.
    pub hits: Vec<DocumentHit<T>>,
    /// Total number of matching documents.
    /// May be greater than the number of returned hits due to the size cap.
    pub total: u64,
    /// Time taken to execute the search in milliseconds.
    pub took_ms: u64,
    pub max_score: Option<f64>,
}

impl<T> SearchResults<T> {
    /// Create an empty result set.
    pub fn empty() -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            took_ms: 0,
            max_score: None,
        }
    }

    /// Returns true if there are no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Returns the number of hits in this response.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocumentHit<T>> {
        self.hits.iter()
    }

    /// Drop the metadata and keep the entities.
    pub fn into_entities(self) -> Vec<T> {
        self.hits.into_iter().map(DocumentHit::into_entity).collect()
    }
}

impl<T> IntoIterator for SearchResults<T> {
    type Item = DocumentHit<T>;
    type IntoIter = std::vec::IntoIter<DocumentHit<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}
