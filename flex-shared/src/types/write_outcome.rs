//! Outcome of a single-document write.

use serde_json::Value;

/// Outcome of an index, update or delete of one document.
///
/// "Not found" and "version conflict" are expected conditions and are
/// reported here instead of as errors.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// The engine accepted the write; carries its raw acknowledgement.
    Written(Value),
    /// Nothing needed to be written, so no request was sent.
    Unchanged,
    /// The document does not exist.
    NotFound,
    /// The document exists with a different version.
    Conflict,
}

impl WriteOutcome {
    /// `Written` and `Unchanged` count as success.
    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Written(_) | WriteOutcome::Unchanged)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WriteOutcome::NotFound)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, WriteOutcome::Conflict)
    }

    /// The engine's acknowledgement, if a write happened.
    pub fn acknowledgement(&self) -> Option<&Value> {
        match self {
            WriteOutcome::Written(ack) => Some(ack),
            _ => None,
        }
    }
}
