//! # SupplyChainApi Implementation

use super::*;

impl SupplyChainApi for PharmaContract {
    #[instrument(skip(self, stub, spec))]
    fn create_strip<S: LedgerStub>(
        &self,
        stub: &mut S,
        strip_id: &str,
        spec: StripSpec,
    ) -> Result<Strip, ContractError> {
        self.mint_strip(stub, strip_id, spec)
    }

    #[instrument(skip(self, stub, strip_ids), fields(children = strip_ids.len()))]
    fn seal_box<S: LedgerStub>(
        &self,
        stub: &mut S,
        box_id: &str,
        strip_ids: &[String],
    ) -> Result<MedicineBox, ContractError> {
        self.seal_children::<MedicineBox, S>(stub, box_id, strip_ids)
    }

    #[instrument(skip(self, stub, box_ids), fields(children = box_ids.len()))]
    fn seal_carton<S: LedgerStub>(
        &self,
        stub: &mut S,
        carton_id: &str,
        box_ids: &[String],
    ) -> Result<Carton, ContractError> {
        self.seal_children::<Carton, S>(stub, carton_id, box_ids)
    }

    #[instrument(skip(self, stub, carton_ids), fields(children = carton_ids.len()))]
    fn seal_shipment<S: LedgerStub>(
        &self,
        stub: &mut S,
        shipment_id: &str,
        carton_ids: &[String],
    ) -> Result<Shipment, ContractError> {
        self.seal_children::<Shipment, S>(stub, shipment_id, carton_ids)
    }

    #[instrument(skip(self, stub))]
    fn distribute_shipment<S: LedgerStub>(
        &self,
        stub: &mut S,
        shipment_id: &str,
        distributor: &str,
    ) -> Result<Shipment, ContractError> {
        self.record_distribution(stub, shipment_id, distributor)
    }

    #[instrument(skip(self, stub, shipment_ids), fields(shipments = shipment_ids.len()))]
    fn create_order<S: LedgerStub>(
        &self,
        stub: &mut S,
        order_id: &str,
        shipment_ids: &[String],
        sender: Party,
        receiver: Party,
    ) -> Result<Order, ContractError> {
        self.open_order(stub, order_id, shipment_ids, sender, receiver)
    }

    #[instrument(skip(self, stub))]
    fn dispatch_order<S: LedgerStub>(
        &self,
        stub: &mut S,
        order_id: &str,
    ) -> Result<Order, ContractError> {
        self.advance_order(stub, order_id, Status::Dispatched)
    }

    #[instrument(skip(self, stub))]
    fn deliver_order<S: LedgerStub>(
        &self,
        stub: &mut S,
        order_id: &str,
    ) -> Result<Order, ContractError> {
        self.advance_order(stub, order_id, Status::Delivered)
    }

    fn get_order<S: LedgerStub>(&self, stub: &S, order_id: &str) -> Result<Order, ContractError> {
        self.load_as(stub, order_id)
    }

    #[instrument(skip(self, stub))]
    fn get_all_orders<S: LedgerStub>(&self, stub: &S) -> Result<Vec<Order>, ContractError> {
        self.orders_newest_first(stub, &Selector::doc_type(DocType::Order))
    }

    #[instrument(skip(self, stub))]
    fn get_orders_by_recipient<S: LedgerStub>(
        &self,
        stub: &S,
        recipient: &str,
    ) -> Result<Vec<Order>, ContractError> {
        let selector = Selector::doc_type(DocType::Order).eq("recipient", recipient);
        self.orders_newest_first(stub, &selector)
    }

    #[instrument(skip(self, stub))]
    fn scan<S: LedgerStub>(&self, stub: &S, item_id: &str) -> Result<ScanResult, ContractError> {
        self.walk_current(stub, item_id)
    }

    #[instrument(skip(self, stub))]
    fn trace_from_history<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<HistoricalTrace, ContractError> {
        self.walk_history(stub, item_id)
    }

    fn get_item_by_creation_tx<S: LedgerStub>(
        &self,
        stub: &S,
        tx_id: &str,
    ) -> Result<LedgerRecord, ContractError> {
        self.locate_by_creation_tx(stub, tx_id)?
            .ok_or_else(|| ContractError::NotFound {
                id: tx_id.to_string(),
                kind: "creation transaction".to_string(),
            })
    }

    #[instrument(skip(self, stub))]
    fn find_by_creation_tx<S: LedgerStub>(
        &self,
        stub: &S,
        tx_id: &str,
    ) -> Result<TxTrace, ContractError> {
        self.resolve_creation_tx(stub, tx_id)
    }

    #[instrument(skip(self, stub))]
    fn get_item_history<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<HistoricalItem, ContractError> {
        self.historical(stub, item_id)
    }

    fn get_transaction_history<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<Vec<HistoryRecord>, ContractError> {
        self.decoded_history(stub, item_id)
    }

    fn get_item<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<LedgerRecord, ContractError> {
        self.load(stub, item_id)
    }

    fn get_available_strips<S: LedgerStub>(&self, stub: &S) -> Result<Vec<Strip>, ContractError> {
        self.unassigned(stub, "boxId")
    }

    fn get_available_boxes<S: LedgerStub>(
        &self,
        stub: &S,
    ) -> Result<Vec<MedicineBox>, ContractError> {
        self.unassigned(stub, "cartonId")
    }

    fn get_available_cartons<S: LedgerStub>(
        &self,
        stub: &S,
    ) -> Result<Vec<Carton>, ContractError> {
        self.unassigned(stub, "shipmentId")
    }

    fn get_available_shipments<S: LedgerStub>(
        &self,
        stub: &S,
    ) -> Result<Vec<Shipment>, ContractError> {
        let selector =
            Selector::doc_type(DocType::Shipment).eq("status", Status::Created.as_str());
        self.select_as(stub, &selector)
    }

    #[instrument(skip(self, stub))]
    fn get_all_items<S: LedgerStub>(
        &self,
        stub: &S,
        kind: DocType,
    ) -> Result<Vec<LedgerRecord>, ContractError> {
        self.select_records(stub, &Selector::doc_type(kind))
    }

    #[instrument(skip(self, stub))]
    fn get_statistics<S: LedgerStub>(&self, stub: &S) -> Result<Statistics, ContractError> {
        self.collect_statistics(stub)
    }

    #[instrument(skip(self, stub))]
    fn search_items<S: LedgerStub>(
        &self,
        stub: &S,
        term: &str,
    ) -> Result<Vec<LedgerRecord>, ContractError> {
        self.search_ids(stub, term)
    }
}
