//! The capability an entity implements to be kept in the search index.

use flex_shared::{DocumentKey, FieldValue, Fields};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::FlexError;

/// An application entity that can be indexed as a search document.
///
/// Only `table`, `key`, `attributes` and `hydrate` are required; the rest have
/// defaults matching the common case (no overrides, full attribute payload,
/// no explicit mapping).
///
/// # Example
///
/// ```
/// use chrono::NaiveDateTime;
/// use flex_repository::{Indexable, FlexError};
/// use flex_repository::indexable::{fields_from_json, hydrate_from_source};
/// use flex_shared::{DocumentKey, Fields};
/// use serde::{Deserialize, Serialize};
/// use serde_json::{Map, Value};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// struct Article {
///     id: Option<i64>,
///     title: String,
///     #[serde(default, with = "flex_shared::canonical_date_time::option")]
///     published_at: Option<NaiveDateTime>,
/// }
///
/// impl Indexable for Article {
///     fn table(&self) -> &str {
///         "articles"
///     }
///
///     fn key(&self) -> Option<DocumentKey> {
///         self.id.map(DocumentKey::from)
///     }
///
///     fn attributes(&self) -> Fields {
///         fields_from_json(serde_json::to_value(self).unwrap_or_default())
///     }
///
///     fn hydrate(&self, source: Map<String, Value>) -> Result<Self, FlexError> {
///         hydrate_from_source(source)
///     }
/// }
/// ```
pub trait Indexable: Send + Sync + Sized {
    /// Table the entity is persisted in; the default category name.
    fn table(&self) -> &str;

    /// Primary key, `None` until the entity has been inserted.
    fn key(&self) -> Option<DocumentKey>;

    /// All persisted attributes.
    fn attributes(&self) -> Fields;

    /// Attributes changed since the entity was loaded or last saved.
    fn dirty_attributes(&self) -> Fields {
        Fields::new()
    }

    /// Collection name override. `None` uses the configured index.
    fn index_name(&self) -> Option<&str> {
        None
    }

    /// Category name override. `None` uses the table name.
    fn type_name(&self) -> Option<&str> {
        None
    }

    /// Mapping properties for the entity's category.
    fn mapping_properties(&self) -> Value {
        Value::Object(Map::new())
    }

    /// The attributes written as the document body.
    fn document_fields(&self) -> Fields {
        self.attributes()
    }

    /// Build a fresh, unsaved-state instance from a document `_source`.
    ///
    /// Called on a prototype instance, so runtime configuration such as a
    /// dynamic table name can be carried over.
    ///
    /// Date-times arrive in the canonical `YYYY-MM-DD HH:MM:SS` form they
    /// were indexed in. Serde-based implementations must read them through
    /// [`flex_shared::canonical_date_time`]; chrono's default format rejects
    /// them.
    fn hydrate(&self, source: Map<String, Value>) -> Result<Self, FlexError>;
}

/// Turn a JSON object into attribute fields. Non-objects yield no fields.
pub fn fields_from_json(value: Value) -> Fields {
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, value)| (name, FieldValue::Json(value)))
            .collect(),
        _ => Fields::new(),
    }
}

/// Deserialize an entity from a document `_source`.
///
/// Date-time fields need `#[serde(with = "flex_shared::canonical_date_time")]`
/// (or its `option` variant) to read the indexed format.
pub fn hydrate_from_source<T: DeserializeOwned>(source: Map<String, Value>) -> Result<T, FlexError> {
    serde_json::from_value(Value::Object(source))
        .map_err(|e| FlexError::serialization(format!("Failed to hydrate entity: {}", e)))
}
