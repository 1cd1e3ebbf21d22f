//! # In-Memory Secondary Index
//!
//! A document store double for the listing fast path. Tests switch it off
//! to exercise the fallback to the ledger.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::adapters::memory_ledger::InMemoryLedger;
use crate::domain::errors::IndexError;
use crate::ports::outbound::{SecondaryIndex, Selector};

/// In-memory document index mirroring committed ledger state.
///
/// The index is only as fresh as its last [`InMemoryIndex::sync_from`].
#[derive(Debug)]
pub struct InMemoryIndex {
    documents: RwLock<BTreeMap<String, Vec<u8>>>,
    available: AtomicBool,
    queries_served: AtomicUsize,
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
            queries_served: AtomicUsize::new(0),
        }
    }
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the indexed documents with the ledger's committed state.
    pub fn sync_from(&self, ledger: &InMemoryLedger) -> Result<(), IndexError> {
        let mut documents = self.documents.write().map_err(|_| IndexError::Unavailable {
            message: "index lock poisoned".to_string(),
        })?;
        *documents = ledger
            .entries()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect();
        Ok(())
    }

    /// Simulate an outage. Queries fail while unavailable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of queries answered successfully.
    pub fn queries_served(&self) -> usize {
        self.queries_served.load(Ordering::SeqCst)
    }
}

impl SecondaryIndex for InMemoryIndex {
    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, IndexError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(IndexError::Unavailable {
                message: "index offline".to_string(),
            });
        }

        let documents = self.documents.read().map_err(|_| IndexError::Query {
            message: "index lock poisoned".to_string(),
        })?;
        let rows = documents
            .iter()
            .filter(|(_, bytes)| {
                serde_json::from_slice::<serde_json::Value>(bytes)
                    .map(|doc| selector.matches(&doc))
                    .unwrap_or(false)
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        self.queries_served.fetch_add(1, Ordering::SeqCst);
        Ok(rows)
    }
}
