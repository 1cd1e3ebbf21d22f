//! # Legacy Records
//!
//! Documents written before `creationTxId`, order parties and distribution
//! fields were stored still decode, list and trace.

#[cfg(test)]
mod tests {
    use crate::fixtures::{ids, Scenario};
    use pharma_ledger::prelude::*;
    use serde_json::{json, Value};

    const CREATED_AT: &str = "2022-03-01T09:00:00Z";

    fn legacy_strip(id: &str, box_id: &str) -> Value {
        let status = if box_id.is_empty() { "CREATED" } else { "SEALED" };
        json!({
            "docType": "strip",
            "id": id,
            "batchNumber": "OLD-LOT-7",
            "medicineType": "Paracetamol 500mg",
            "mfgDate": "2022-01-15",
            "expDate": "2025-01-15",
            "status": status,
            "boxId": box_id,
            "createdAt": CREATED_AT,
            "updatedAt": CREATED_AT,
        })
    }

    fn put_raw(scenario: &mut Scenario, docs: &[Value]) {
        scenario
            .run(|_, stub| {
                for doc in docs {
                    let key = doc["id"].as_str().unwrap_or_default();
                    stub.put_state(key, doc.to_string().into_bytes())?;
                }
                Ok(())
            })
            .unwrap();
    }

    /// Two loose strips, then one transaction that wrote a box and stamped
    /// both strips without recording a creation transaction.
    fn legacy_box(scenario: &mut Scenario) -> String {
        put_raw(
            scenario,
            &[legacy_strip("L-S1", ""), legacy_strip("L-S2", "")],
        );
        put_raw(
            scenario,
            &[
                json!({
                    "docType": "box",
                    "id": "L-B1",
                    "strips": ["L-S1", "L-S2"],
                    "status": "SEALED",
                    "createdAt": CREATED_AT,
                    "updatedAt": CREATED_AT,
                }),
                legacy_strip("L-S1", "L-B1"),
                legacy_strip("L-S2", "L-B1"),
            ],
        );
        scenario.last_tx_id()
    }

    #[test]
    fn test_legacy_strips_are_available_and_sealable() {
        let mut scenario = Scenario::new();
        put_raw(
            &mut scenario,
            &[legacy_strip("L-S1", ""), legacy_strip("L-S2", "")],
        );

        let available = scenario
            .contract
            .get_available_strips(&scenario.view())
            .unwrap();
        assert_eq!(available.len(), 2);
        assert!(available.iter().all(|s| s.creation_tx_id.is_empty()));

        let sealed = scenario
            .run(|c, stub| c.seal_box(stub, "B-NEW", &ids(&["L-S1", "L-S2"])))
            .unwrap();
        assert_eq!(sealed.creation_tx_id, scenario.last_tx_id());

        match scenario.contract.get_item(&scenario.view(), "L-S1").unwrap() {
            LedgerRecord::Strip(strip) => {
                assert_eq!(strip.box_id, "B-NEW");
                assert_eq!(strip.status, Status::Sealed);
                // Never back-filled.
                assert!(strip.creation_tx_id.is_empty());
            }
            other => panic!("L-S1 is a {}", other.doc_type()),
        }
    }

    #[test]
    fn test_legacy_seal_resolves_to_the_parent() {
        let mut scenario = Scenario::new();
        let seal_tx = legacy_box(&mut scenario);

        let trace = scenario
            .contract
            .find_by_creation_tx(&scenario.view(), &seal_tx)
            .unwrap();

        assert_eq!(trace.transaction_info.item_id, "L-B1");
        assert_eq!(trace.transaction_info.item_type, DocType::Box);
        assert!(!trace.transaction_info.is_delete);
        assert_eq!(
            trace.transaction_info.value.as_ref().map(|v| v["id"].clone()),
            Some(json!("L-B1"))
        );
        assert_eq!(trace.traceability.child_ids(), vec!["L-S1", "L-S2"]);
        assert!(trace.traceability.parents.is_empty());
    }

    #[test]
    fn test_legacy_strip_tx_resolves_to_the_strip() {
        let mut scenario = Scenario::new();
        put_raw(&mut scenario, &[legacy_strip("L-S9", "")]);
        let tx = scenario.last_tx_id();

        let trace = scenario
            .contract
            .find_by_creation_tx(&scenario.view(), &tx)
            .unwrap();
        assert_eq!(trace.transaction_info.item_id, "L-S9");
        assert_eq!(trace.transaction_info.item_type, DocType::Strip);
    }

    #[test]
    fn test_direct_lookup_ignores_legacy_records() {
        let mut scenario = Scenario::new();
        let seal_tx = legacy_box(&mut scenario);

        let err = scenario
            .contract
            .get_item_by_creation_tx(&scenario.view(), &seal_tx)
            .unwrap_err();
        match err {
            ContractError::NotFound { id, kind } => {
                assert_eq!(id, seal_tx);
                assert_eq!(kind, "creation transaction");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_legacy_scan_can_be_switched_off() {
        let contract = PharmaContract::new(ContractConfig::new().with_legacy_tx_scan(false));
        let mut scenario = Scenario::with_contract(contract);
        let seal_tx = legacy_box(&mut scenario);

        let err = scenario
            .contract
            .find_by_creation_tx(&scenario.view(), &seal_tx)
            .unwrap_err();
        assert!(matches!(err, ContractError::NotFound { ref kind, .. } if kind == "transaction"));
    }

    #[test]
    fn test_legacy_order_defaults() {
        let mut scenario = Scenario::new();
        put_raw(
            &mut scenario,
            &[json!({
                "docType": "order",
                "id": "L-ORD",
                "itemIds": ["L-SH"],
                "status": "DISPATCHED",
                "createdAt": CREATED_AT,
                "updatedAt": CREATED_AT,
            })],
        );

        let order = scenario.contract.get_order(&scenario.view(), "L-ORD").unwrap();
        assert_eq!(order.item_type, DocType::Shipment);
        assert!(order.recipient.is_empty());
        assert!(order.creation_tx_id.is_empty());
        assert_eq!(order.dispatched_at, None);

        // The claimed shipment was never written; the scan skips it.
        let scan = scenario.contract.scan(&scenario.view(), "L-ORD").unwrap();
        assert!(scan.descendants.is_empty());

        let delivered = scenario
            .run(|c, stub| c.deliver_order(stub, "L-ORD"))
            .unwrap();
        assert_eq!(delivered.status, Status::Delivered);
        assert!(delivered.creation_tx_id.is_empty());
    }

    #[test]
    fn test_unknown_doc_type_is_invalid_input() {
        let mut scenario = Scenario::new();
        put_raw(
            &mut scenario,
            &[json!({ "docType": "pallet", "id": "P-1" })],
        );

        let err = scenario
            .contract
            .get_item(&scenario.view(), "P-1")
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidInput { .. }));
    }
}
