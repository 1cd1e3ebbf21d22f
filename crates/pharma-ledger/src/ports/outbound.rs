//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the contract service.
//!
//! The host ledger is reached through [`LedgerStub`], one instance per host
//! transaction. An optional [`SecondaryIndex`] accelerates listings.

use std::cmp::Reverse;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::errors::{IndexError, LedgerError};
use crate::domain::value_objects::{DocType, Timestamp, TxId};

/// One entry of a key's change log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub tx_id: TxId,
    pub timestamp: Timestamp,
    /// Tombstone written by a deletion.
    pub is_delete: bool,
    /// Written bytes. `None` for tombstones.
    pub value: Option<Vec<u8>>,
    /// Position of the write in the ledger's commit order.
    pub sequence: u64,
}

/// Order in which a stub delivers a key's change log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryOrder {
    #[default]
    NewestFirst,
    OldestFirst,
    Unordered,
}

/// Transaction-scoped view of the host ledger.
///
/// Production: the host platform's chaincode stub.
/// Testing: `InMemoryLedger` transactions (adapters/memory_ledger.rs)
///
/// All writes made through one stub are committed together or not at all.
/// The host decides which; the contract never rolls back by hand.
pub trait LedgerStub {
    /// Committed value of a key.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Stage a write for the current transaction.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Committed records matching an equality selector.
    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    /// Full change log of a key, in [`LedgerStub::history_order`].
    fn history_for_key(&self, key: &str) -> Result<Vec<HistoryEntry>, LedgerError>;

    /// Delivery order of [`LedgerStub::history_for_key`].
    fn history_order(&self) -> HistoryOrder {
        HistoryOrder::NewestFirst
    }

    /// Id of the executing transaction.
    fn tx_id(&self) -> &str;

    /// Timestamp of the executing transaction.
    fn tx_timestamp(&self) -> Timestamp;
}

/// Read a key's change log newest first, whatever order the stub uses.
pub fn history_newest_first<S: LedgerStub + ?Sized>(
    stub: &S,
    key: &str,
) -> Result<Vec<HistoryEntry>, LedgerError> {
    let mut entries = stub.history_for_key(key)?;
    match stub.history_order() {
        HistoryOrder::NewestFirst => {}
        HistoryOrder::OldestFirst => entries.reverse(),
        HistoryOrder::Unordered => entries.sort_by_key(|e| Reverse(e.sequence)),
    }
    Ok(entries)
}

/// Optional document index over the ledger's records.
///
/// Not authoritative. Any error makes the contract fall back to
/// [`LedgerStub::query`].
pub trait SecondaryIndex: Send + Sync {
    /// Records matching an equality selector.
    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, IndexError>;

    /// Number of records of one kind.
    fn count(&self, kind: DocType) -> Result<usize, IndexError> {
        self.query(&Selector::doc_type(kind)).map(|rows| rows.len())
    }
}

impl<T: SecondaryIndex + ?Sized> SecondaryIndex for Arc<T> {
    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, IndexError> {
        (**self).query(selector)
    }

    fn count(&self, kind: DocType) -> Result<usize, IndexError> {
        (**self).count(kind)
    }
}

// =============================================================================
// SELECTOR
// =============================================================================

/// Equality selector over flat document fields.
///
/// ```
/// use pharma_ledger::ports::outbound::Selector;
/// use pharma_ledger::domain::value_objects::DocType;
///
/// let selector = Selector::doc_type(DocType::Box).eq("cartonId", "");
/// assert_eq!(
///     selector.to_couch_query(),
///     r#"{"selector":{"cartonId":"","docType":"box"}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    fields: Vec<(String, Value)>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selector matching every record of one kind.
    pub fn doc_type(kind: DocType) -> Self {
        Self::new().eq("docType", kind.as_str())
    }

    /// Add an equality condition. A later condition on the same field
    /// replaces the earlier one.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    /// Whether a document satisfies every condition.
    ///
    /// A missing field matches an empty string, so records written before a
    /// parent field existed count as unassigned.
    pub fn matches(&self, document: &Value) -> bool {
        self.fields.iter().all(|(field, expected)| match document.get(field) {
            Some(actual) => actual == expected,
            None => expected.as_str() == Some(""),
        })
    }

    /// CouchDB-style rich query string.
    pub fn to_couch_query(&self) -> String {
        let selector: Map<String, Value> = self.fields.iter().cloned().collect();
        let mut query = Map::new();
        query.insert("selector".to_string(), Value::Object(selector));
        Value::Object(query).to_string()
    }
}
