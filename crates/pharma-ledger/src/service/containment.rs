//! # Containment Engine
//!
//! Strip creation, the generic seal over every containment level, and
//! shipment distribution.

use super::*;
use super::helpers::validate_id;

impl PharmaContract {
    pub(crate) fn mint_strip<S: LedgerStub>(
        &self,
        stub: &mut S,
        strip_id: &str,
        spec: StripSpec,
    ) -> Result<Strip, ContractError> {
        validate_id(strip_id)?;
        self.ensure_absent(stub, strip_id, DocType::Strip)?;

        let now = stub.tx_timestamp();
        let strip = Strip {
            id: strip_id.to_string(),
            batch_number: spec.batch_number,
            medicine_type: spec.medicine_type,
            mfg_date: spec.mfg_date,
            exp_date: spec.exp_date,
            status: Status::Created,
            box_id: String::new(),
            creation_tx_id: stub.tx_id().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store(stub, &strip.to_record())?;

        info!(
            strip_id = %strip.id,
            batch = %strip.batch_number,
            tx_id = %strip.creation_tx_id,
            "Strip created"
        );
        Ok(strip)
    }

    /// Seal `child_ids` into a new parent of kind `P`.
    ///
    /// Each child is fetched, checked to be unassigned, stamped with the new
    /// parent and marked `SEALED`, in list order. The parent is written last
    /// with the child list exactly as given.
    pub(crate) fn seal_children<P: Container, S: LedgerStub>(
        &self,
        stub: &mut S,
        parent_id: &str,
        child_ids: &[String],
    ) -> Result<P, ContractError> {
        validate_id(parent_id)?;
        self.validate_child_ids(child_ids)?;
        self.ensure_absent(stub, parent_id, P::KIND)?;

        let now = stub.tx_timestamp();
        for child_id in child_ids {
            // A child of the wrong kind does not resolve as a child.
            let mut child: P::Child = self.load_as(stub, child_id).map_err(|e| match e {
                ContractError::KindMismatch { id, expected, .. } => {
                    ContractError::not_found(id, expected)
                }
                other => other,
            })?;

            if !child.parent_id().is_empty() {
                return Err(ContractError::AlreadyAssigned {
                    id: child_id.clone(),
                    kind: <P::Child as Record>::KIND,
                    parent: child.parent_id().to_string(),
                });
            }
            let record = child.to_record();
            lifecycle::check_transition(&record, Status::Sealed)?;

            child.assign_to(parent_id, Status::Sealed, now);
            self.store(stub, &child.to_record())?;
        }

        let parent = P::sealed(parent_id, child_ids.to_vec(), stub.tx_id(), now);
        self.store(stub, &parent.to_record())?;

        info!(
            kind = %P::KIND,
            parent_id = %parent_id,
            children = child_ids.len(),
            tx_id = %stub.tx_id(),
            "Sealed"
        );
        Ok(parent)
    }

    pub(crate) fn record_distribution<S: LedgerStub>(
        &self,
        stub: &mut S,
        shipment_id: &str,
        distributor: &str,
    ) -> Result<Shipment, ContractError> {
        validate_id(shipment_id)?;
        let mut shipment: Shipment = self.load_as(stub, shipment_id)?;
        lifecycle::check_transition(&shipment.to_record(), Status::Shipped)?;

        let now = stub.tx_timestamp();
        shipment.status = Status::Shipped;
        shipment.distributor = distributor.to_string();
        shipment.distributed_at = Some(now);
        shipment.updated_at = now;
        self.store(stub, &shipment.to_record())?;

        info!(
            shipment_id = %shipment_id,
            distributor = %distributor,
            "Shipment distributed"
        );
        Ok(shipment)
    }
}
