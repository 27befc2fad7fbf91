//! Recording search client for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use flex_shared::{BulkOperation, BulkResponse, DocumentAddress, IndexTarget};
use serde_json::{json, Map, Value};

use crate::errors::FlexError;
use crate::interfaces::SearchClient;

/// A call received by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Index {
        address: DocumentAddress,
        document: Map<String, Value>,
        version: Option<i64>,
    },
    Update {
        address: DocumentAddress,
        partial: Map<String, Value>,
    },
    Delete {
        address: DocumentAddress,
    },
    Bulk {
        operations: Vec<BulkOperation>,
    },
    Search {
        target: IndexTarget,
        body: Value,
    },
    Count {
        target: IndexTarget,
        body: Value,
    },
    GetMapping {
        target: IndexTarget,
    },
    PutMapping {
        target: IndexTarget,
        mapping: Value,
    },
    DeleteMapping {
        target: IndexTarget,
    },
}

/// Records every call and answers with canned responses.
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    index_error: Option<FlexError>,
    update_error: Option<FlexError>,
    delete_error: Option<FlexError>,
    search_response: Value,
    count: u64,
    mapping: Value,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            index_error: None,
            update_error: None,
            delete_error: None,
            search_response: json!({"took": 0, "hits": {"total": {"value": 0}, "hits": []}}),
            count: 0,
            mapping: json!({}),
        }
    }

    pub fn with_index_error(mut self, error: FlexError) -> Self {
        self.index_error = Some(error);
        self
    }

    pub fn with_update_error(mut self, error: FlexError) -> Self {
        self.update_error = Some(error);
        self
    }

    pub fn with_delete_error(mut self, error: FlexError) -> Self {
        self.delete_error = Some(error);
        self
    }

    pub fn with_search_response(mut self, response: Value) -> Self {
        self.search_response = response;
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_mapping(mut self, mapping: Value) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn ack(result: &str, address: &DocumentAddress) -> Value {
    json!({"result": result, "_id": address.document_id()})
}

#[async_trait]
impl SearchClient for RecordingClient {
    async fn index_document(
        &self,
        address: &DocumentAddress,
        document: &Map<String, Value>,
        version: Option<i64>,
    ) -> Result<Value, FlexError> {
        self.record(Call::Index {
            address: address.clone(),
            document: document.clone(),
            version,
        });
        match &self.index_error {
            Some(error) => Err(error.clone()),
            None => Ok(ack("created", address)),
        }
    }

    async fn update_document(
        &self,
        address: &DocumentAddress,
        partial: &Map<String, Value>,
    ) -> Result<Value, FlexError> {
        self.record(Call::Update {
            address: address.clone(),
            partial: partial.clone(),
        });
        match &self.update_error {
            Some(error) => Err(error.clone()),
            None => Ok(ack("updated", address)),
        }
    }

    async fn delete_document(&self, address: &DocumentAddress) -> Result<Value, FlexError> {
        self.record(Call::Delete {
            address: address.clone(),
        });
        match &self.delete_error {
            Some(error) => Err(error.clone()),
            None => Ok(ack("deleted", address)),
        }
    }

    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkResponse, FlexError> {
        self.record(Call::Bulk {
            operations: operations.to_vec(),
        });
        let items = operations
            .iter()
            .map(|operation| {
                json!({
                    operation.action.as_str(): {
                        "_id": operation.address.document_id(),
                        "status": 200
                    }
                })
            })
            .collect();
        Ok(BulkResponse {
            took: 1,
            errors: false,
            items,
        })
    }

    async fn search(&self, target: &IndexTarget, body: &Value) -> Result<Value, FlexError> {
        self.record(Call::Search {
            target: target.clone(),
            body: body.clone(),
        });
        Ok(self.search_response.clone())
    }

    async fn count(&self, target: &IndexTarget, body: &Value) -> Result<u64, FlexError> {
        self.record(Call::Count {
            target: target.clone(),
            body: body.clone(),
        });
        Ok(self.count)
    }

    async fn get_mapping(&self, target: &IndexTarget) -> Result<Value, FlexError> {
        self.record(Call::GetMapping {
            target: target.clone(),
        });
        Ok(self.mapping.clone())
    }

    async fn put_mapping(&self, target: &IndexTarget, mapping: &Value) -> Result<Value, FlexError> {
        self.record(Call::PutMapping {
            target: target.clone(),
            mapping: mapping.clone(),
        });
        Ok(json!({"acknowledged": true}))
    }

    async fn delete_mapping(&self, target: &IndexTarget) -> Result<Value, FlexError> {
        self.record(Call::DeleteMapping {
            target: target.clone(),
        });
        Ok(json!({"acknowledged": true}))
    }
}
