//! # Pharma Contract Service
//!
//! The application service implementing [`SupplyChainApi`].
//!
//! ## Architecture
//!
//! This service:
//! 1. Seals children into new parents (`containment.rs`)
//! 2. Runs the order workflow over shipments (`orders.rs`)
//! 3. Walks the containment graph through current state (`trace.rs`)
//! 4. Walks it through change logs and resolves creation transactions (`history.rs`)
//! 5. Answers listing and statistics queries (`listing.rs`)
//!
//! The service holds configuration and an optional secondary index only.
//! Every ledger access goes through the stub passed into the call.

mod api;
mod containment;
mod helpers;
mod history;
mod listing;
mod orders;
mod trace;

pub use helpers::parse_id_list;

use crate::domain::entities::{
    Carton, Containable, Container, LedgerRecord, MedicineBox, Order, Record, Shipment, Strip,
};
use crate::domain::errors::ContractError;
use crate::domain::lifecycle;
use crate::domain::trace::{
    HistoricalItem, HistoricalTrace, HistoryRecord, ScanResult, Statistics, TransactionInfo,
    TxTrace,
};
use crate::domain::value_objects::{ContractConfig, DocType, Status};
use crate::ports::inbound::{Party, StripSpec, SupplyChainApi};
use crate::ports::outbound::{history_newest_first, LedgerStub, SecondaryIndex, Selector};
use tracing::{debug, info, instrument, warn};

/// The containment and trace contract.
pub struct PharmaContract {
    pub(crate) config: ContractConfig,
    /// Non-authoritative fast path for listings and statistics.
    pub(crate) index: Option<Box<dyn SecondaryIndex>>,
}

impl PharmaContract {
    pub fn new(config: ContractConfig) -> Self {
        Self {
            config,
            index: None,
        }
    }

    /// Attach a secondary index consulted before the ledger's own query.
    pub fn with_index(mut self, index: impl SecondaryIndex + 'static) -> Self {
        self.index = Some(Box::new(index));
        self
    }
}

impl Default for PharmaContract {
    fn default() -> Self {
        Self::new(ContractConfig::default())
    }
}

impl std::fmt::Debug for PharmaContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PharmaContract")
            .field("config", &self.config)
            .field("index", &self.index.is_some())
            .finish()
    }
}
