//! # Adapters
//!
//! In-memory implementations of the outbound ports.
//!
//! - `memory_ledger.rs` - host ledger double with transactional commits
//! - `memory_index.rs` - secondary index double

pub mod memory_index;
pub mod memory_ledger;

pub use memory_index::InMemoryIndex;
pub use memory_ledger::{InMemoryLedger, LedgerTx};
