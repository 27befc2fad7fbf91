//! Admin commands.
//!
//! Every command addresses one category through a [`DynamicEntity`] and
//! returns a JSON value for the binary to print.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use flex_repository::dynamic::DEFAULT_KEY_FIELD;
use flex_repository::indexable::fields_from_json;
use flex_repository::{DynamicEntity, FlexService, Indexable};
use flex_shared::{to_document, BulkResponse, DocumentKey, SearchResults};
use serde_json::{json, Value};
use tracing::info;

use crate::AdminError;

/// The category a command operates on.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct CategoryArgs {
    /// Category (entity table) name
    pub category: String,

    /// Collection override; defaults to the configured index
    #[arg(long)]
    pub collection: Option<String>,

    /// Primary key attribute of the category's documents
    #[arg(long, default_value = DEFAULT_KEY_FIELD)]
    pub key_field: String,
}

impl CategoryArgs {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            collection: None,
            key_field: DEFAULT_KEY_FIELD.to_string(),
        }
    }

    fn entity(&self) -> DynamicEntity {
        let entity = DynamicEntity::new(&self.category).with_key_field(&self.key_field);
        match &self.collection {
            Some(collection) => entity.with_index_name(collection),
            None => entity,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the stored mapping of a category
    GetMapping(CategoryArgs),
    /// Store a category mapping from a JSON file of properties
    PutMapping {
        #[command(flatten)]
        target: CategoryArgs,
        /// File holding the mapping properties object
        #[arg(long)]
        properties: PathBuf,
    },
    /// Drop a category mapping together with its documents
    DeleteMapping(CategoryArgs),
    /// Report whether a category has a non-empty mapping
    HasMapping(CategoryArgs),
    /// Drop the category mapping when present and store it again
    RebuildMapping {
        #[command(flatten)]
        target: CategoryArgs,
        #[arg(long)]
        properties: PathBuf,
    },
    /// Count documents matching a query body
    Count {
        #[command(flatten)]
        target: CategoryArgs,
        /// Query body as JSON; matches everything when omitted
        #[arg(long)]
        body: Option<String>,
    },
    /// Run a search body verbatim
    Search {
        #[command(flatten)]
        target: CategoryArgs,
        #[arg(long)]
        body: Option<String>,
    },
    /// Match a single field
    Match {
        #[command(flatten)]
        target: CategoryArgs,
        field: String,
        value: String,
        /// Hit cap; defaults to the configured result size
        #[arg(long)]
        size: Option<usize>,
    },
    /// Bulk index the documents of a JSON array file
    Load {
        #[command(flatten)]
        target: CategoryArgs,
        file: PathBuf,
    },
    /// Bulk remove documents by key
    Remove {
        #[command(flatten)]
        target: CategoryArgs,
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

/// Run `command` against `service`.
pub async fn execute(service: &FlexService, command: Command) -> Result<Value, AdminError> {
    match command {
        Command::GetMapping(target) => Ok(service.get_mapping(&target.entity()).await?),
        Command::PutMapping { target, properties } => {
            let entity = target.entity().with_mapping(read_json(&properties)?);
            Ok(service.put_mapping(&entity).await?)
        }
        Command::DeleteMapping(target) => Ok(service.delete_mapping(&target.entity()).await?),
        Command::HasMapping(target) => {
            let present = service.has_mapping(&target.entity()).await?;
            Ok(json!({ "has_mapping": present }))
        }
        Command::RebuildMapping { target, properties } => {
            let entity = target.entity().with_mapping(read_json(&properties)?);
            Ok(service.rebuild_mapping(&entity).await?)
        }
        Command::Count { target, body } => {
            let body = parse_body(body.as_deref())?;
            let count = service.scope_of(target.entity()).count(&body).await?;
            Ok(json!({ "count": count }))
        }
        Command::Search { target, body } => {
            let body = parse_body(body.as_deref())?;
            let results = service.scope_of(target.entity()).search(&body).await?;
            Ok(results_to_json(results))
        }
        Command::Match {
            target,
            field,
            value,
            size,
        } => {
            let mut scope = service.scope_of(target.entity());
            if let Some(size) = size {
                scope = scope.with_result_size(size);
            }
            let results = scope.match_query(&field, value).await?;
            Ok(results_to_json(results))
        }
        Command::Load { target, file } => {
            let entities = load_entities(&target, read_json(&file)?)?;
            let response = service.bulk_index(&entities).await?;
            info!(category = %target.category, documents = entities.len(), "Loaded documents");
            Ok(bulk_to_json(response))
        }
        Command::Remove { target, keys } => {
            let entities: Vec<DynamicEntity> = keys
                .iter()
                .map(|key| {
                    let mut entity = target.entity();
                    entity.set_key(parse_key(key));
                    entity
                })
                .collect();
            let response = service.bulk_remove_index(&entities).await?;
            Ok(bulk_to_json(response))
        }
    }
}

fn read_json(path: &Path) -> Result<Value, AdminError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| AdminError::input(format!("{} is not valid JSON: {}", path.display(), e)))
}

/// Parse a query body, defaulting to `match_all`.
pub fn parse_body(raw: Option<&str>) -> Result<Value, AdminError> {
    match raw {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AdminError::input(format!("Query body is not valid JSON: {}", e))),
        None => Ok(json!({ "query": { "match_all": {} } })),
    }
}

/// Numeric keys are sent as integers, anything else as text.
pub fn parse_key(raw: &str) -> DocumentKey {
    raw.parse::<i64>()
        .map(DocumentKey::Int)
        .unwrap_or_else(|_| DocumentKey::from(raw))
}

fn load_entities(target: &CategoryArgs, documents: Value) -> Result<Vec<DynamicEntity>, AdminError> {
    let Value::Array(documents) = documents else {
        return Err(AdminError::input("Load file must hold a JSON array"));
    };

    documents
        .into_iter()
        .map(|document| {
            if !document.is_object() {
                return Err(AdminError::input("Every loaded document must be a JSON object"));
            }
            let mut entity = DynamicEntity::loaded(&target.category, fields_from_json(document))
                .with_key_field(&target.key_field);
            if let Some(collection) = &target.collection {
                entity = entity.with_index_name(collection);
            }
            Ok(entity)
        })
        .collect()
}

fn results_to_json(results: SearchResults<DynamicEntity>) -> Value {
    let total = results.total;
    let took = results.took_ms;
    let hits: Vec<Value> = results
        .into_iter()
        .map(|hit| {
            json!({
                "_id": hit.key().map(|key| key.to_string()),
                "_score": hit.document_score(),
                "_version": hit.document_version(),
                "highlight": hit.meta.highlights,
                "_source": to_document(hit.attributes()),
            })
        })
        .collect();

    json!({ "total": total, "took": took, "hits": hits })
}

fn bulk_to_json(response: Option<BulkResponse>) -> Value {
    match response {
        Some(response) => {
            let summary = response.summary();
            let failures: Vec<Value> = summary
                .results
                .iter()
                .filter(|item| !item.success)
                .map(|item| json!({ "_id": item.id, "status": item.status, "error": item.error }))
                .collect();
            json!({
                "total": summary.total,
                "succeeded": summary.succeeded,
                "failed": summary.failed,
                "failures": failures,
            })
        }
        None => json!({ "total": 0, "succeeded": 0, "failed": 0, "failures": [] }),
    }
}
