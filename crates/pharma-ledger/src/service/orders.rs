//! # Order Workflow

use super::*;
use super::helpers::validate_id;

impl PharmaContract {
    pub(crate) fn open_order<S: LedgerStub>(
        &self,
        stub: &mut S,
        order_id: &str,
        shipment_ids: &[String],
        sender: Party,
        receiver: Party,
    ) -> Result<Order, ContractError> {
        validate_id(order_id)?;
        self.validate_child_ids(shipment_ids)?;
        self.ensure_absent(stub, order_id, DocType::Order)?;

        let now = stub.tx_timestamp();
        for shipment_id in shipment_ids {
            let mut shipment: Shipment = self.load_as(stub, shipment_id)?;

            if !shipment.order_id.is_empty() {
                return Err(ContractError::AlreadyAssigned {
                    id: shipment_id.clone(),
                    kind: DocType::Shipment,
                    parent: shipment.order_id,
                });
            }
            lifecycle::check_transition(&shipment.to_record(), Status::InOrder)?;

            shipment.assign_to(order_id, Status::InOrder, now);
            self.store(stub, &shipment.to_record())?;
        }

        let order = Order {
            id: order_id.to_string(),
            item_type: DocType::Shipment,
            item_ids: shipment_ids.to_vec(),
            recipient: Order::recipient_display(&receiver.id, &receiver.org),
            sender_id: sender.id,
            sender_org: sender.org,
            receiver_id: receiver.id,
            receiver_org: receiver.org,
            status: Status::Created,
            dispatched_at: None,
            delivered_at: None,
            creation_tx_id: stub.tx_id().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store(stub, &order.to_record())?;

        info!(
            order_id = %order.id,
            shipments = shipment_ids.len(),
            recipient = %order.recipient,
            tx_id = %order.creation_tx_id,
            "Order created"
        );
        Ok(order)
    }

    /// Move an order to `DISPATCHED` or `DELIVERED`, stamping the matching
    /// timestamp.
    pub(crate) fn advance_order<S: LedgerStub>(
        &self,
        stub: &mut S,
        order_id: &str,
        to: Status,
    ) -> Result<Order, ContractError> {
        validate_id(order_id)?;
        let mut order: Order = self.load_as(stub, order_id)?;
        lifecycle::check_transition(&order.to_record(), to)?;

        let now = stub.tx_timestamp();
        match to {
            Status::Dispatched => order.dispatched_at = Some(now),
            Status::Delivered => order.delivered_at = Some(now),
            _ => {}
        }
        order.status = to;
        order.updated_at = now;
        self.store(stub, &order.to_record())?;

        info!(order_id = %order_id, status = %to, "Order status changed");
        Ok(order)
    }

    pub(crate) fn orders_newest_first<S: LedgerStub>(
        &self,
        stub: &S,
        selector: &Selector,
    ) -> Result<Vec<Order>, ContractError> {
        let mut orders: Vec<Order> = self.select_as(stub, selector)?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
