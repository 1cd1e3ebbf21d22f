//! # History-Based Walk
//!
//! Reconstructs records purely from their change logs. The latest value of a
//! key is the first non-tombstone entry of its log, read newest first.
//!
//! Also resolves creation transactions, first through the stored
//! `creationTxId` and then, for older records, by scanning change logs.

use super::*;
use super::helpers::validate_id;
use crate::ports::outbound::HistoryEntry;

impl PharmaContract {
    /// Decoded change log of a key, newest first.
    pub(crate) fn decoded_history<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<Vec<HistoryRecord>, ContractError> {
        Ok(history_newest_first(stub, item_id)?
            .iter()
            .map(history_record)
            .collect())
    }

    /// Record reconstructed from its change log. `None` if the log is empty
    /// or holds only tombstones.
    pub(crate) fn try_historical<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<Option<HistoricalItem>, ContractError> {
        let entries = history_newest_first(stub, item_id)?;

        let latest = entries
            .iter()
            .find(|e| !e.is_delete && e.value.is_some())
            .and_then(|e| e.value.as_deref());
        let Some(bytes) = latest else {
            return Ok(None);
        };
        let current = LedgerRecord::decode(bytes)?;

        Ok(Some(HistoricalItem {
            item_id: item_id.to_string(),
            item_type: current.doc_type(),
            current,
            history: entries.iter().map(history_record).collect(),
        }))
    }

    pub(crate) fn historical<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<HistoricalItem, ContractError> {
        self.try_historical(stub, item_id)?
            .ok_or_else(|| ContractError::item_not_found(item_id))
    }

    pub(crate) fn walk_history<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<HistoricalTrace, ContractError> {
        let searched_item = self.historical(stub, item_id)?;
        let parents = self.historical_ancestors(stub, &searched_item.current)?;
        let mut children = Vec::new();
        self.historical_descendants(stub, &searched_item.current, &mut children)?;

        debug!(
            item_id = %item_id,
            kind = %searched_item.item_type,
            parents = parents.len(),
            children = children.len(),
            "Traced item from history"
        );
        Ok(HistoricalTrace {
            searched_item,
            parents,
            children,
        })
    }

    /// Parents nearest first, ending at the order when one claimed the
    /// shipment. Only strictly larger kinds are followed.
    fn historical_ancestors<S: LedgerStub>(
        &self,
        stub: &S,
        item: &LedgerRecord,
    ) -> Result<Vec<HistoricalItem>, ContractError> {
        let mut parents = Vec::new();
        let mut kind = item.doc_type();
        let mut cursor = item.parent_id().map(str::to_string);

        while let Some(parent_id) = cursor {
            let Some(parent) = self.try_historical(stub, &parent_id)? else {
                break;
            };
            if parent.item_type <= kind {
                break;
            }
            kind = parent.item_type;
            cursor = parent.current.parent_id().map(str::to_string);
            parents.push(parent);
        }
        Ok(parents)
    }

    /// Children depth first: each child is followed by its own subtree.
    /// Only strictly smaller kinds are descended into.
    fn historical_descendants<S: LedgerStub>(
        &self,
        stub: &S,
        item: &LedgerRecord,
        out: &mut Vec<HistoricalItem>,
    ) -> Result<(), ContractError> {
        for child_id in item.child_ids() {
            let Some(child) = self.try_historical(stub, child_id)? else {
                debug!(child_id = %child_id, "Skipping child with no live history");
                continue;
            };
            let subtree = (child.item_type < item.doc_type()).then(|| child.current.clone());
            out.push(child);
            if let Some(current) = subtree {
                self.historical_descendants(stub, &current, out)?;
            }
        }
        Ok(())
    }

    /// Record whose stored `creationTxId` equals `tx_id`, searching every
    /// kind.
    pub(crate) fn locate_by_creation_tx<S: LedgerStub>(
        &self,
        stub: &S,
        tx_id: &str,
    ) -> Result<Option<LedgerRecord>, ContractError> {
        validate_id(tx_id)?;
        for kind in DocType::ALL {
            let rows = stub.query(&Selector::doc_type(kind).eq("creationTxId", tx_id))?;
            if let Some((_, bytes)) = rows.first() {
                return LedgerRecord::decode(bytes).map(Some);
            }
        }
        Ok(None)
    }

    pub(crate) fn resolve_creation_tx<S: LedgerStub>(
        &self,
        stub: &S,
        tx_id: &str,
    ) -> Result<TxTrace, ContractError> {
        if let Some(record) = self.locate_by_creation_tx(stub, tx_id)? {
            let timestamp = history_newest_first(stub, record.id())?
                .iter()
                .find(|e| e.tx_id == tx_id)
                .map(|e| e.timestamp);

            let transaction_info = TransactionInfo {
                tx_id: tx_id.to_string(),
                timestamp,
                item_id: record.id().to_string(),
                item_type: record.doc_type(),
                is_delete: false,
                value: Some(record.to_json()),
            };
            let traceability = self.walk_history(stub, record.id())?;
            return Ok(TxTrace {
                transaction_info,
                traceability,
            });
        }

        if !self.config.legacy_tx_scan {
            return Err(tx_not_found(tx_id));
        }
        warn!(
            tx_id = %tx_id,
            "No record carries this creation transaction, scanning change logs"
        );
        self.scan_change_logs(stub, tx_id)?
            .ok_or_else(|| tx_not_found(tx_id))
    }

    /// Full-ledger scan for any change-log entry written by `tx_id`.
    ///
    /// Kinds are searched largest container first, so a seal resolves to the
    /// parent it created rather than one of the children it stamped.
    fn scan_change_logs<S: LedgerStub>(
        &self,
        stub: &S,
        tx_id: &str,
    ) -> Result<Option<TxTrace>, ContractError> {
        let mut keys_scanned = 0usize;
        for kind in DocType::LEGACY_SCAN_ORDER {
            for (key, _) in stub.query(&Selector::doc_type(kind))? {
                keys_scanned += 1;
                let entries = history_newest_first(stub, &key)?;
                let Some(entry) = entries.iter().find(|e| e.tx_id == tx_id) else {
                    continue;
                };

                debug!(tx_id = %tx_id, item_id = %key, keys_scanned, "Matched change-log entry");
                let record = history_record(entry);
                let transaction_info = TransactionInfo {
                    tx_id: record.tx_id,
                    timestamp: Some(record.timestamp),
                    item_id: key.clone(),
                    item_type: kind,
                    is_delete: record.is_delete,
                    value: record.value,
                };
                let traceability = self.walk_history(stub, &key)?;
                return Ok(Some(TxTrace {
                    transaction_info,
                    traceability,
                }));
            }
        }

        debug!(tx_id = %tx_id, keys_scanned, "Change-log scan found no match");
        Ok(None)
    }
}

fn history_record(entry: &HistoryEntry) -> HistoryRecord {
    let value = if entry.is_delete {
        None
    } else {
        entry
            .value
            .as_deref()
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    };
    HistoryRecord {
        tx_id: entry.tx_id.clone(),
        timestamp: entry.timestamp,
        is_delete: entry.is_delete,
        value,
    }
}

fn tx_not_found(tx_id: &str) -> ContractError {
    ContractError::NotFound {
        id: tx_id.to_string(),
        kind: "transaction".to_string(),
    }
}
