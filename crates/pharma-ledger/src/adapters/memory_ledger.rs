//! In-memory host ledger.
//!
//! Models the host semantics the contract relies on:
//!
//! - writes of one transaction become visible together, and only if the
//!   transaction body returns `Ok`
//! - reads inside a transaction see committed state only
//! - every committed write, tombstones included, is appended to the key's
//!   change log and delivered newest first

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::LedgerError;
use crate::domain::value_objects::{Timestamp, TxId};
use crate::ports::outbound::{HistoryEntry, HistoryOrder, LedgerStub, Selector};

/// In-memory ledger for tests and local tooling.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
    /// Per-key change log, oldest first.
    history: HashMap<String, Vec<HistoryEntry>>,
    sequence: u64,
    history_order: HistoryOrder,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver change logs in the given order instead of newest first.
    ///
    /// `Unordered` delivers entries sorted by transaction id.
    pub fn with_history_order(mut self, order: HistoryOrder) -> Self {
        self.history_order = order;
        self
    }

    /// Run `body` as one transaction with a fresh id and the current time.
    pub fn transact<T, E>(
        &mut self,
        body: impl FnOnce(&mut LedgerTx<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let tx_id = Uuid::new_v4().simple().to_string();
        self.transact_as(&tx_id, Utc::now(), body)
    }

    /// Run `body` as one transaction with a fixed id and timestamp.
    ///
    /// Staged writes are committed only when `body` returns `Ok`.
    pub fn transact_as<T, E>(
        &mut self,
        tx_id: &str,
        timestamp: Timestamp,
        body: impl FnOnce(&mut LedgerTx<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let (result, writes) = {
            let mut tx = LedgerTx::new(self, tx_id, timestamp);
            let result = body(&mut tx);
            (result, tx.writes)
        };

        if result.is_ok() {
            self.commit(tx_id, timestamp, writes);
        }
        result
    }

    /// A read-only stub over committed state. Writes made through it are
    /// discarded.
    pub fn view(&self) -> LedgerTx<'_> {
        LedgerTx::new(self, "", Utc::now())
    }

    /// Committed value of a key.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    /// Change log of a key, oldest first.
    pub fn history(&self, key: &str) -> &[HistoryEntry] {
        self.history.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Committed key/value pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.state.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn commit(&mut self, tx_id: &str, timestamp: Timestamp, writes: BTreeMap<String, Option<Vec<u8>>>) {
        if writes.is_empty() {
            return;
        }
        self.sequence += 1;

        for (key, value) in writes {
            let entry = HistoryEntry {
                tx_id: tx_id.to_string(),
                timestamp,
                is_delete: value.is_none(),
                value: value.clone(),
                sequence: self.sequence,
            };
            self.history.entry(key.clone()).or_default().push(entry);

            match value {
                Some(bytes) => {
                    self.state.insert(key, bytes);
                }
                None => {
                    self.state.remove(&key);
                }
            }
        }
    }
}

/// Stub handed to a transaction body.
pub struct LedgerTx<'a> {
    ledger: &'a InMemoryLedger,
    tx_id: TxId,
    timestamp: Timestamp,
    /// Staged writes. `None` stages a deletion. The last write to a key wins.
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl<'a> LedgerTx<'a> {
    fn new(ledger: &'a InMemoryLedger, tx_id: &str, timestamp: Timestamp) -> Self {
        Self {
            ledger,
            tx_id: tx_id.to_string(),
            timestamp,
            writes: BTreeMap::new(),
        }
    }

    /// Stage a deletion. Commits as a tombstone in the key's change log.
    pub fn delete_state(&mut self, key: &str) {
        self.writes.insert(key.to_string(), None);
    }

    /// Number of writes staged so far.
    pub fn staged_writes(&self) -> usize {
        self.writes.len()
    }
}

impl LedgerStub for LedgerTx<'_> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.ledger.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::Backend {
                message: "empty key".to_string(),
            });
        }
        self.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let rows = self
            .ledger
            .state
            .iter()
            .filter(|(_, bytes)| {
                serde_json::from_slice::<serde_json::Value>(bytes)
                    .map(|doc| selector.matches(&doc))
                    .unwrap_or(false)
            })
            .map(|(key, bytes)| (key.clone(), bytes.clone()))
            .collect();
        Ok(rows)
    }

    fn history_for_key(&self, key: &str) -> Result<Vec<HistoryEntry>, LedgerError> {
        let mut entries = self.ledger.history(key).to_vec();
        match self.ledger.history_order {
            HistoryOrder::NewestFirst => entries.reverse(),
            HistoryOrder::OldestFirst => {}
            HistoryOrder::Unordered => entries.sort_by(|a, b| a.tx_id.cmp(&b.tx_id)),
        }
        Ok(entries)
    }

    fn history_order(&self) -> HistoryOrder {
        self.ledger.history_order
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
