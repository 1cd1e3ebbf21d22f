//! # Scenario Fixtures
//!
//! A deterministic driver over [`InMemoryLedger`]: every transaction gets a
//! sequential id (`tx-0001`, `tx-0002`, ...) and a timestamp one second after
//! the previous one.

use chrono::{Duration, TimeZone, Utc};
use pharma_ledger::prelude::*;
use pharma_ledger::{LedgerTx, Timestamp};

/// Timestamp `secs` seconds after the scenario epoch.
pub fn at(secs: i64) -> Timestamp {
    Utc.timestamp_opt(1_717_228_800, 0)
        .single()
        .unwrap_or_default()
        + Duration::seconds(secs)
}

pub fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn strip_spec(batch: &str) -> StripSpec {
    StripSpec {
        batch_number: batch.to_string(),
        medicine_type: "Amoxicillin 250mg".to_string(),
        mfg_date: "2024-04-01".to_string(),
        exp_date: "2026-04-01".to_string(),
    }
}

/// Shape of a packed shipment.
#[derive(Debug, Clone, Copy)]
pub struct PackShape {
    pub cartons: usize,
    pub boxes_per_carton: usize,
    pub strips_per_box: usize,
}

impl PackShape {
    pub fn new(cartons: usize, boxes_per_carton: usize, strips_per_box: usize) -> Self {
        Self {
            cartons,
            boxes_per_carton,
            strips_per_box,
        }
    }

    pub fn strip_count(&self) -> usize {
        self.cartons * self.boxes_per_carton * self.strips_per_box
    }

    /// Records a packed shipment holds, the shipment included.
    pub fn record_count(&self) -> usize {
        1 + self.cartons + self.cartons * self.boxes_per_carton + self.strip_count()
    }
}

/// A contract and ledger advanced one transaction at a time.
pub struct Scenario {
    pub contract: PharmaContract,
    pub ledger: InMemoryLedger,
    clock: i64,
    last_tx: u64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    pub fn new() -> Self {
        Self::with_contract(PharmaContract::default())
    }

    pub fn with_contract(contract: PharmaContract) -> Self {
        Self {
            contract,
            ledger: InMemoryLedger::new(),
            clock: 0,
            last_tx: 0,
        }
    }

    /// Run one transaction. Writes are committed only when `body` succeeds.
    pub fn run<T>(
        &mut self,
        body: impl FnOnce(&PharmaContract, &mut LedgerTx<'_>) -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        self.clock += 1;
        self.last_tx += 1;
        let tx_id = format!("tx-{:04}", self.last_tx);
        let contract = &self.contract;
        self.ledger
            .transact_as(&tx_id, at(self.clock), |stub| body(contract, stub))
    }

    /// Id of the most recent transaction, committed or not.
    pub fn last_tx_id(&self) -> String {
        format!("tx-{:04}", self.last_tx)
    }

    pub fn view(&self) -> LedgerTx<'_> {
        self.ledger.view()
    }

    pub fn create_strips(&mut self, strip_ids: &[String]) -> Result<(), ContractError> {
        for id in strip_ids {
            self.run(|c, stub| c.create_strip(stub, id, strip_spec("LOT-24-04")))?;
        }
        Ok(())
    }

    /// Mint and seal a full shipment.
    ///
    /// Ids are derived from the shipment id: `SH-C1`, `SH-C1-B1`,
    /// `SH-C1-B1-S1` and so on.
    pub fn pack_shipment(
        &mut self,
        shipment_id: &str,
        shape: PackShape,
    ) -> Result<Shipment, ContractError> {
        let mut carton_ids = Vec::with_capacity(shape.cartons);
        for c in 1..=shape.cartons {
            let carton_id = format!("{}-C{}", shipment_id, c);
            let mut box_ids = Vec::with_capacity(shape.boxes_per_carton);
            for b in 1..=shape.boxes_per_carton {
                let box_id = format!("{}-B{}", carton_id, b);
                let strip_ids: Vec<String> = (1..=shape.strips_per_box)
                    .map(|s| format!("{}-S{}", box_id, s))
                    .collect();
                self.create_strips(&strip_ids)?;
                self.run(|c, stub| c.seal_box(stub, &box_id, &strip_ids))?;
                box_ids.push(box_id);
            }
            self.run(|c, stub| c.seal_carton(stub, &carton_id, &box_ids))?;
            carton_ids.push(carton_id);
        }
        self.run(|c, stub| c.seal_shipment(stub, shipment_id, &carton_ids))
    }

    pub fn order(
        &mut self,
        order_id: &str,
        shipment_ids: &[String],
        receiver: Party,
    ) -> Result<Order, ContractError> {
        self.run(|c, stub| {
            c.create_order(
                stub,
                order_id,
                shipment_ids,
                Party::new("mfg-admin", "ManufacturerMSP"),
                receiver,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_shipment_builds_full_tree() {
        let mut scenario = Scenario::new();
        let shape = PackShape::new(2, 2, 3);
        let shipment = scenario.pack_shipment("SH", shape).unwrap();

        assert_eq!(shipment.cartons, ids(&["SH-C1", "SH-C2"]));
        assert_eq!(scenario.ledger.len(), shape.record_count());

        let stats = scenario.contract.get_statistics(&scenario.view()).unwrap();
        assert_eq!(stats.total(), shape.record_count());
    }

    #[test]
    fn test_transactions_are_numbered() {
        let mut scenario = Scenario::new();
        scenario.create_strips(&ids(&["A", "B"])).unwrap();
        assert_eq!(scenario.last_tx_id(), "tx-0002");

        let strip = scenario.contract.get_item(&scenario.view(), "B").unwrap();
        assert_eq!(strip.creation_tx_id(), "tx-0002");
        assert_eq!(strip.created_at(), at(2));
    }
}
