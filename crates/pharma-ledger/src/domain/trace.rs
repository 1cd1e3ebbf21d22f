//! # Trace Results
//!
//! Output shapes of the two trace modes, the transaction-id lookup and the
//! listing helpers.

use serde::{Deserialize, Serialize};

use super::entities::LedgerRecord;
use super::value_objects::{DocType, Timestamp, TxId};

/// Result of the current-state walk.
///
/// Ancestors are ordered nearest first. Descendants are the direct children
/// in sealing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub item_type: DocType,
    pub item: LedgerRecord,
    pub ancestors: Vec<LedgerRecord>,
    pub descendants: Vec<LedgerRecord>,
}

impl ScanResult {
    pub fn ancestor_ids(&self) -> Vec<&str> {
        self.ancestors.iter().map(LedgerRecord::id).collect()
    }

    pub fn descendant_ids(&self) -> Vec<&str> {
        self.descendants.iter().map(LedgerRecord::id).collect()
    }
}

/// One decoded entry of a key's change log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub tx_id: TxId,
    pub timestamp: Timestamp,
    pub is_delete: bool,
    /// Written document. `None` for tombstones and undecodable values.
    pub value: Option<serde_json::Value>,
}

/// A record reconstructed purely from its change log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalItem {
    pub item_id: String,
    pub item_type: DocType,
    /// Latest non-tombstone value in the log.
    pub current: LedgerRecord,
    /// Full log, newest first.
    pub history: Vec<HistoryRecord>,
}

/// Result of the history-based walk.
///
/// Parents run nearest first and end at the order, when one claimed the
/// top-level shipment. Children are listed depth first: each child is
/// followed by its own subtree before the next sibling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTrace {
    pub searched_item: HistoricalItem,
    pub parents: Vec<HistoricalItem>,
    pub children: Vec<HistoricalItem>,
}

impl HistoricalTrace {
    pub fn parent_ids(&self) -> Vec<&str> {
        self.parents.iter().map(|p| p.item_id.as_str()).collect()
    }

    pub fn child_ids(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.item_id.as_str()).collect()
    }
}

/// The transaction matched by a creation-transaction lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub tx_id: TxId,
    /// Timestamp of the history entry written by the transaction, if the
    /// log still holds one.
    pub timestamp: Option<Timestamp>,
    pub item_id: String,
    pub item_type: DocType,
    pub is_delete: bool,
    pub value: Option<serde_json::Value>,
}

/// Result of `find_by_creation_tx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxTrace {
    pub transaction_info: TransactionInfo,
    pub traceability: HistoricalTrace,
}

/// Number of stored records per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub strips: usize,
    pub boxes: usize,
    pub cartons: usize,
    pub shipments: usize,
    pub orders: usize,
}

impl Statistics {
    pub fn get(&self, kind: DocType) -> usize {
        match kind {
            DocType::Strip => self.strips,
            DocType::Box => self.boxes,
            DocType::Carton => self.cartons,
            DocType::Shipment => self.shipments,
            DocType::Order => self.orders,
        }
    }

    pub fn set(&mut self, kind: DocType, count: usize) {
        let slot = match kind {
            DocType::Strip => &mut self.strips,
            DocType::Box => &mut self.boxes,
            DocType::Carton => &mut self.cartons,
            DocType::Shipment => &mut self.shipments,
            DocType::Order => &mut self.orders,
        };
        *slot = count;
    }

    pub fn total(&self) -> usize {
        DocType::ALL.iter().map(|kind| self.get(*kind)).sum()
    }
}
