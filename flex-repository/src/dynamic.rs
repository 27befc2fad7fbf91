//! A schema-less entity configured at runtime.
//!
//! `DynamicEntity` keeps its attributes in a [`Fields`] map and tracks which
//! of them changed since load, so it can be synced without a dedicated Rust
//! type. The admin tool uses it to address arbitrary categories.

use flex_shared::{DocumentKey, FieldValue, Fields};
use serde_json::{Map, Value};

use crate::errors::FlexError;
use crate::indexable::{fields_from_json, Indexable};

/// Name of the primary key attribute unless configured otherwise.
pub const DEFAULT_KEY_FIELD: &str = "id";

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicEntity {
    table: String,
    key_field: String,
    attributes: Fields,
    original: Fields,
    index_name: Option<String>,
    type_name: Option<String>,
    mapping: Value,
}

impl DynamicEntity {
    /// A new, unsaved entity for `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key_field: DEFAULT_KEY_FIELD.to_string(),
            attributes: Fields::new(),
            original: Fields::new(),
            index_name: None,
            type_name: None,
            mapping: Value::Object(Map::new()),
        }
    }

    /// An entity loaded with `attributes`; nothing is dirty.
    pub fn loaded(table: impl Into<String>, attributes: Fields) -> Self {
        let mut entity = Self::new(table);
        entity.original = attributes.clone();
        entity.attributes = attributes;
        entity
    }

    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Mapping properties used by `put_mapping`.
    pub fn with_mapping(mut self, mapping: Value) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.attributes.get(name)
    }

    /// Set an attribute, marking it dirty if it differs from the loaded value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Assign the primary key, e.g. after an insert.
    pub fn set_key(&mut self, key: DocumentKey) {
        let value = match key {
            DocumentKey::Int(id) => Value::from(id),
            DocumentKey::Text(id) => Value::String(id),
        };
        self.attributes
            .insert(self.key_field.clone(), FieldValue::Json(value));
    }

    /// Accept the current attributes as persisted.
    pub fn sync_original(&mut self) {
        self.original = self.attributes.clone();
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty_attributes().is_empty()
    }
}

impl Indexable for DynamicEntity {
    fn table(&self) -> &str {
        &self.table
    }

    fn key(&self) -> Option<DocumentKey> {
        match self.attributes.get(&self.key_field)? {
            // Numbers outside i64 keep their exact rendering as text keys
            FieldValue::Json(Value::Number(number)) => Some(match number.as_i64() {
                Some(int) => DocumentKey::Int(int),
                None => DocumentKey::Text(number.to_string()),
            }),
            FieldValue::Json(Value::String(text)) if !text.is_empty() => {
                Some(DocumentKey::Text(text.clone()))
            }
            _ => None,
        }
    }

    fn attributes(&self) -> Fields {
        self.attributes.clone()
    }

    fn dirty_attributes(&self) -> Fields {
        self.attributes
            .iter()
            .filter(|(name, value)| self.original.get(*name) != Some(*value))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    fn mapping_properties(&self) -> Value {
        self.mapping.clone()
    }

    fn hydrate(&self, source: Map<String, Value>) -> Result<Self, FlexError> {
        let mut entity = self.clone();
        entity.attributes = fields_from_json(Value::Object(source));
        entity.sync_original();
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_entity_has_no_key() {
        let entity = DynamicEntity::new("articles");
        assert_eq!(entity.key(), None);
        assert_eq!(entity.table(), "articles");
        assert!(!entity.is_dirty());
    }

    #[test]
    fn test_dirty_tracking() {
        let mut entity = DynamicEntity::loaded(
            "articles",
            fields_from_json(json!({"id": 42, "title": "Old", "body": "text"})),
        );
        assert!(!entity.is_dirty());

        entity.set("title", "New");
        entity.set("body", "text");

        let dirty = entity.dirty_attributes();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty.get("title"), Some(&FieldValue::from("New")));

        entity.sync_original();
        assert!(!entity.is_dirty());
    }

    #[test]
    fn test_key_from_custom_field() {
        let mut entity = DynamicEntity::new("users").with_key_field("uuid");
        entity.set_key(DocumentKey::from("u-1"));
        assert_eq!(entity.key(), Some(DocumentKey::from("u-1")));
        assert!(entity.get("id").is_none());
    }

    #[test]
    fn test_hydrate_keeps_configuration() {
        let prototype = DynamicEntity::new("articles")
            .with_index_name("archive")
            .with_type_name("posts");
        let Value::Object(source) = json!({"id": 7, "title": "Traits"}) else {
            unreachable!()
        };

        let entity = prototype.hydrate(source).unwrap();

        assert_eq!(entity.key(), Some(DocumentKey::Int(7)));
        assert_eq!(entity.index_name(), Some("archive"));
        assert_eq!(entity.type_name(), Some("posts"));
        assert!(!entity.is_dirty());
    }

    #[test]
    fn test_numeric_key_outside_i64_is_kept_as_text() {
        let mut entity = DynamicEntity::loaded(
            "events",
            fields_from_json(json!({"id": u64::MAX})),
        );
        assert_eq!(
            entity.key(),
            Some(DocumentKey::from("18446744073709551615"))
        );

        entity.set("id", json!(2.5));
        assert_eq!(entity.key(), Some(DocumentKey::from("2.5")));

        entity.set("id", json!(-3));
        assert_eq!(entity.key(), Some(DocumentKey::Int(-3)));
    }
}
