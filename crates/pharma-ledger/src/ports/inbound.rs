//! # Inbound Ports (Driving Ports)
//!
//! The contract API exposed to the host's invocation glue.
//!
//! Every operation receives the stub of the host transaction it runs in. The
//! contract keeps no state between calls.

use crate::domain::entities::{Carton, LedgerRecord, MedicineBox, Order, Shipment, Strip};
use crate::domain::errors::ContractError;
use crate::domain::trace::{
    HistoricalItem, HistoricalTrace, HistoryRecord, ScanResult, Statistics, TxTrace,
};
use crate::domain::value_objects::DocType;
use crate::ports::outbound::LedgerStub;

/// Identity of an order participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub id: String,
    pub org: String,
}

impl Party {
    pub fn new(id: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            org: org.into(),
        }
    }
}

/// Manufacturing attributes of a new strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripSpec {
    pub batch_number: String,
    pub medicine_type: String,
    pub mfg_date: String,
    pub exp_date: String,
}

/// Primary API of the containment contract.
///
/// Mutating operations must run inside one host transaction. On error the
/// host discards every write the call staged.
pub trait SupplyChainApi {
    // =========================================================================
    // CONTAINMENT
    // =========================================================================

    /// Create an unassigned strip.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`: empty id
    /// - `AlreadyExists`: any record already uses the id
    fn create_strip<S: LedgerStub>(
        &self,
        stub: &mut S,
        strip_id: &str,
        spec: StripSpec,
    ) -> Result<Strip, ContractError>;

    /// Seal unassigned strips into a new box.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`: empty, oversized or duplicated id list
    /// - `AlreadyExists`: the box id is taken
    /// - `NotFound`: a child id does not name a strip
    /// - `AlreadyAssigned`: a strip is already in a box
    fn seal_box<S: LedgerStub>(
        &self,
        stub: &mut S,
        box_id: &str,
        strip_ids: &[String],
    ) -> Result<MedicineBox, ContractError>;

    /// Seal unassigned boxes into a new carton. Errors as [`Self::seal_box`].
    fn seal_carton<S: LedgerStub>(
        &self,
        stub: &mut S,
        carton_id: &str,
        box_ids: &[String],
    ) -> Result<Carton, ContractError>;

    /// Seal unassigned cartons into a new shipment. Errors as [`Self::seal_box`].
    fn seal_shipment<S: LedgerStub>(
        &self,
        stub: &mut S,
        shipment_id: &str,
        carton_ids: &[String],
    ) -> Result<Shipment, ContractError>;

    /// Record the distributor of a shipment and mark it `SHIPPED`.
    fn distribute_shipment<S: LedgerStub>(
        &self,
        stub: &mut S,
        shipment_id: &str,
        distributor: &str,
    ) -> Result<Shipment, ContractError>;

    // =========================================================================
    // ORDERS
    // =========================================================================

    /// Create an order claiming the given shipments.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`: empty, oversized or duplicated id list
    /// - `AlreadyExists`: the order id is taken
    /// - `NotFound` / `KindMismatch`: an id does not name a shipment
    /// - `AlreadyAssigned`: a shipment already belongs to an order
    /// - `InvalidState`: a shipment has already been shipped
    fn create_order<S: LedgerStub>(
        &self,
        stub: &mut S,
        order_id: &str,
        shipment_ids: &[String],
        sender: Party,
        receiver: Party,
    ) -> Result<Order, ContractError>;

    /// Mark an order `DISPATCHED`. Repeating the call refreshes the timestamp.
    fn dispatch_order<S: LedgerStub>(
        &self,
        stub: &mut S,
        order_id: &str,
    ) -> Result<Order, ContractError>;

    /// Mark an order `DELIVERED`. No recipient check is made here.
    fn deliver_order<S: LedgerStub>(
        &self,
        stub: &mut S,
        order_id: &str,
    ) -> Result<Order, ContractError>;

    fn get_order<S: LedgerStub>(&self, stub: &S, order_id: &str) -> Result<Order, ContractError>;

    /// All orders, newest created first.
    fn get_all_orders<S: LedgerStub>(&self, stub: &S) -> Result<Vec<Order>, ContractError>;

    /// Orders whose recipient display name equals `recipient`.
    fn get_orders_by_recipient<S: LedgerStub>(
        &self,
        stub: &S,
        recipient: &str,
    ) -> Result<Vec<Order>, ContractError>;

    // =========================================================================
    // TRACE
    // =========================================================================

    /// Walk the containment graph through current state.
    fn scan<S: LedgerStub>(&self, stub: &S, item_id: &str) -> Result<ScanResult, ContractError>;

    /// Walk the containment graph through change logs only.
    fn trace_from_history<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<HistoricalTrace, ContractError>;

    /// Record whose `creationTxId` equals `tx_id`.
    fn get_item_by_creation_tx<S: LedgerStub>(
        &self,
        stub: &S,
        tx_id: &str,
    ) -> Result<LedgerRecord, ContractError>;

    /// Resolve the record a transaction created, then trace it from history.
    ///
    /// Falls back to scanning every key's change log when no record carries
    /// the id and the legacy scan is enabled.
    fn find_by_creation_tx<S: LedgerStub>(
        &self,
        stub: &S,
        tx_id: &str,
    ) -> Result<TxTrace, ContractError>;

    /// Latest value of a key derived from its change log, with the log.
    fn get_item_history<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<HistoricalItem, ContractError>;

    /// Decoded change log of a key, newest first. Empty if never written.
    fn get_transaction_history<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<Vec<HistoryRecord>, ContractError>;

    // =========================================================================
    // LISTINGS
    // =========================================================================

    fn get_item<S: LedgerStub>(&self, stub: &S, item_id: &str)
        -> Result<LedgerRecord, ContractError>;

    /// Strips not yet in a box.
    fn get_available_strips<S: LedgerStub>(&self, stub: &S) -> Result<Vec<Strip>, ContractError>;

    /// Boxes not yet in a carton.
    fn get_available_boxes<S: LedgerStub>(
        &self,
        stub: &S,
    ) -> Result<Vec<MedicineBox>, ContractError>;

    /// Cartons not yet in a shipment.
    fn get_available_cartons<S: LedgerStub>(&self, stub: &S)
        -> Result<Vec<Carton>, ContractError>;

    /// Shipments still `CREATED`: neither ordered nor distributed.
    fn get_available_shipments<S: LedgerStub>(
        &self,
        stub: &S,
    ) -> Result<Vec<Shipment>, ContractError>;

    fn get_all_items<S: LedgerStub>(
        &self,
        stub: &S,
        kind: DocType,
    ) -> Result<Vec<LedgerRecord>, ContractError>;

    fn get_statistics<S: LedgerStub>(&self, stub: &S) -> Result<Statistics, ContractError>;

    /// Records of every kind whose id contains `term`, ignoring case.
    fn search_items<S: LedgerStub>(
        &self,
        stub: &S,
        term: &str,
    ) -> Result<Vec<LedgerRecord>, ContractError>;
}
