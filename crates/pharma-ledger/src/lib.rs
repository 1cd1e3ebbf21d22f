//! # Pharma Ledger
//!
//! Packaging containment and trace reconstruction for pharmaceutical units on
//! an append-only, key-addressed ledger.
//!
//! ## Containment Hierarchy
//!
//! ```text
//! Strip ──seal_box──→ Box ──seal_carton──→ Carton ──seal_shipment──→ Shipment
//!                                                                       │
//!                                                   create_order ───────┘
//!                                                        ↓
//!                                                      Order ──dispatch──→ deliver
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Single Assignment | A child's owning-parent field goes from empty to one value exactly once |
//! | 2 | Fixed Child Lists | A parent's child list is set when it is sealed and never changes |
//! | 3 | Forward Status | Status only moves forward along the kind's lattice |
//! | 4 | Immutable Creation Tx | `creationTxId` is set by the first write and never altered |
//! | 5 | Flat Keyspace | Ids are unique across all five kinds |
//!
//! ## Trace Modes
//!
//! - `scan` follows current pointers: ancestors up to the shipment and the
//!   direct children.
//! - `trace_from_history` rebuilds each record from its change log, follows
//!   parents up to the order and lists the full subtree depth first.
//! - `find_by_creation_tx` resolves the record a transaction created, with a
//!   change-log scan for records that predate `creationTxId`.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, status lattice, trace results, errors
//! - `ports/` - Port traits (inbound API, outbound ledger stub and index)
//! - `adapters/` - In-memory ledger and index
//! - `service/` - `PharmaContract`, the application service
//!
//! ## Usage
//!
//! ```
//! use pharma_ledger::prelude::*;
//!
//! let contract = PharmaContract::default();
//! let mut ledger = InMemoryLedger::new();
//!
//! for id in ["A1", "A2"] {
//!     ledger.transact(|stub| {
//!         contract.create_strip(stub, id, StripSpec {
//!             batch_number: "BATCH-1".into(),
//!             medicine_type: "Ibuprofen".into(),
//!             mfg_date: "2024-01-01".into(),
//!             exp_date: "2026-01-01".into(),
//!         })
//!     })?;
//! }
//! ledger.transact(|stub| {
//!     contract.seal_box(stub, "B1", &["A1".to_string(), "A2".to_string()])
//! })?;
//!
//! let scan = contract.scan(&ledger.view(), "A1")?;
//! assert_eq!(scan.ancestor_ids(), vec!["B1"]);
//! # Ok::<(), ContractError>(())
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{InMemoryIndex, InMemoryLedger, LedgerTx};
pub use domain::entities::{
    Carton, Containable, Container, LedgerRecord, MedicineBox, Order, Record, Shipment, Strip,
};
pub use domain::errors::{ContractError, ContractErrorPayload, ErrorKind, IndexError, LedgerError};
pub use domain::trace::{
    HistoricalItem, HistoricalTrace, HistoryRecord, ScanResult, Statistics, TransactionInfo,
    TxTrace,
};
pub use domain::value_objects::{ContractConfig, DocType, Status, Timestamp, TxId};
pub use ports::inbound::{Party, StripSpec, SupplyChainApi};
pub use ports::outbound::{HistoryEntry, HistoryOrder, LedgerStub, SecondaryIndex, Selector};
pub use service::{parse_id_list, PharmaContract};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::adapters::{InMemoryIndex, InMemoryLedger};
    pub use crate::domain::entities::{
        Carton, LedgerRecord, MedicineBox, Order, Record, Shipment, Strip,
    };
    pub use crate::domain::errors::ContractError;
    pub use crate::domain::trace::{HistoricalTrace, ScanResult, Statistics, TxTrace};
    pub use crate::domain::value_objects::{ContractConfig, DocType, Status};
    pub use crate::ports::inbound::{Party, StripSpec, SupplyChainApi};
    pub use crate::ports::outbound::{LedgerStub, Selector};
    pub use crate::service::PharmaContract;
}
