//! Document addressing types.
//!
//! A document is addressed by the collection (index) name, the category (type)
//! name and the entity's primary key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary key of a persisted entity.
///
/// Keys are either integers (auto-increment rows) or strings (natural or UUID keys).
/// Both render to the same string form used as the document `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKey::Int(id) => write!(f, "{}", id),
            DocumentKey::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for DocumentKey {
    fn from(id: i64) -> Self {
        DocumentKey::Int(id)
    }
}

impl From<i32> for DocumentKey {
    fn from(id: i32) -> Self {
        DocumentKey::Int(i64::from(id))
    }
}

impl From<u32> for DocumentKey {
    fn from(id: u32) -> Self {
        DocumentKey::Int(i64::from(id))
    }
}

impl From<String> for DocumentKey {
    fn from(id: String) -> Self {
        DocumentKey::Text(id)
    }
}

impl From<&str> for DocumentKey {
    fn from(id: &str) -> Self {
        DocumentKey::Text(id.to_string())
    }
}

/// The (collection, category) pair a group of documents lives under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexTarget {
    /// Collection name (the configured index unless overridden by the entity).
    pub index: String,
    /// Category name (the entity's table unless overridden).
    pub type_name: String,
}

impl IndexTarget {
    pub fn new(index: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            type_name: type_name.into(),
        }
    }

    /// Address a single document under this target.
    pub fn document(&self, key: Option<DocumentKey>) -> DocumentAddress {
        DocumentAddress {
            target: self.clone(),
            key,
        }
    }
}

impl fmt::Display for IndexTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.type_name)
    }
}

/// Full address of a single document.
///
/// The key is absent for entities that have not been persisted yet; the engine
/// assigns an id when such a document is indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentAddress {
    pub target: IndexTarget,
    pub key: Option<DocumentKey>,
}

impl DocumentAddress {
    pub fn new(
        index: impl Into<String>,
        type_name: impl Into<String>,
        key: Option<DocumentKey>,
    ) -> Self {
        IndexTarget::new(index, type_name).document(key)
    }

    pub fn index(&self) -> &str {
        &self.target.index
    }

    pub fn type_name(&self) -> &str {
        &self.target.type_name
    }

    /// Generate the document ID used in the search index, if the key is known.
    pub fn document_id(&self) -> Option<String> {
        self.key.as_ref().map(ToString::to_string)
    }
}

impl fmt::Display for DocumentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}/{}", self.target, key),
            None => write!(f, "{}/<unassigned>", self.target),
        }
    }
}
