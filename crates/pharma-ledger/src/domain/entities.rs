//! # Domain Entities
//!
//! Typed records for the five packaging levels and the tagged union that is
//! stored on the ledger.
//!
//! ## Containment Hierarchy
//!
//! ```text
//! Strip ──boxId──→ Box ──cartonId──→ Carton ──shipmentId──→ Shipment ──orderId──→ Order
//! ```
//!
//! Every record carries an immutable `creationTxId` stamped by the transaction
//! that first wrote it. Child id lists are fixed when the parent is sealed.

use serde::{Deserialize, Serialize};

use super::errors::ContractError;
use super::value_objects::{DocType, Status, Timestamp, TxId};

/// A single medicine strip, the smallest traceable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strip {
    pub id: String,
    pub batch_number: String,
    pub medicine_type: String,
    pub mfg_date: String,
    pub exp_date: String,
    pub status: Status,
    /// Owning box. Empty until sealed.
    #[serde(default)]
    pub box_id: String,
    #[serde(default)]
    pub creation_tx_id: TxId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A box of strips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineBox {
    pub id: String,
    #[serde(default)]
    pub strips: Vec<String>,
    /// Owning carton. Empty until sealed.
    #[serde(default)]
    pub carton_id: String,
    pub status: Status,
    #[serde(default)]
    pub creation_tx_id: TxId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A carton of boxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carton {
    pub id: String,
    #[serde(default)]
    pub boxes: Vec<String>,
    /// Owning shipment. Empty until sealed.
    #[serde(default)]
    pub shipment_id: String,
    pub status: Status,
    #[serde(default)]
    pub creation_tx_id: TxId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A shipment of cartons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    #[serde(default)]
    pub cartons: Vec<String>,
    /// Order that claimed this shipment. Empty until claimed.
    #[serde(default)]
    pub order_id: String,
    pub status: Status,
    #[serde(default)]
    pub distributor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributed_at: Option<Timestamp>,
    #[serde(default)]
    pub creation_tx_id: TxId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An order over one or more shipments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Kind of the referenced items. Orders only ever reference shipments.
    #[serde(default = "shipment_kind")]
    pub item_type: DocType,
    #[serde(default)]
    pub item_ids: Vec<String>,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub sender_org: String,
    #[serde(default)]
    pub receiver_id: String,
    #[serde(default)]
    pub receiver_org: String,
    /// Display name derived from the receiver, kept for older readers.
    #[serde(default)]
    pub recipient: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatched_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<Timestamp>,
    #[serde(default)]
    pub creation_tx_id: TxId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn shipment_kind() -> DocType {
    DocType::Shipment
}

impl Order {
    /// Display name of a recipient: `"<receiver id> (<receiver org>)"`.
    pub fn recipient_display(receiver_id: &str, receiver_org: &str) -> String {
        format!("{} ({})", receiver_id, receiver_org)
    }
}

/// Any record stored on the ledger, discriminated by `docType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "docType", rename_all = "lowercase")]
pub enum LedgerRecord {
    Strip(Strip),
    Box(MedicineBox),
    Carton(Carton),
    Shipment(Shipment),
    Order(Order),
}

impl LedgerRecord {
    /// Decode a ledger value.
    ///
    /// A document without a `docType`, or with a tag outside the five known
    /// kinds, fails `InvalidInput`. A known tag whose body does not match the
    /// kind's shape fails `Serialization`.
    pub fn decode(bytes: &[u8]) -> Result<Self, ContractError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| ContractError::Serialization {
                message: e.to_string(),
            })?;

        let tag = value
            .get("docType")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ContractError::InvalidInput {
                reason: "unable to determine item type".to_string(),
            })?;

        if DocType::parse(tag).is_none() {
            return Err(ContractError::InvalidInput {
                reason: format!("unknown docType {:?}", tag),
            });
        }

        serde_json::from_value(value).map_err(|e| ContractError::Serialization {
            message: e.to_string(),
        })
    }

    /// Encode this record as a ledger value.
    pub fn encode(&self) -> Result<Vec<u8>, ContractError> {
        serde_json::to_vec(self).map_err(|e| ContractError::Serialization {
            message: e.to_string(),
        })
    }

    /// JSON document form, as the trace results expose it.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn doc_type(&self) -> DocType {
        match self {
            LedgerRecord::Strip(_) => DocType::Strip,
            LedgerRecord::Box(_) => DocType::Box,
            LedgerRecord::Carton(_) => DocType::Carton,
            LedgerRecord::Shipment(_) => DocType::Shipment,
            LedgerRecord::Order(_) => DocType::Order,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            LedgerRecord::Strip(r) => &r.id,
            LedgerRecord::Box(r) => &r.id,
            LedgerRecord::Carton(r) => &r.id,
            LedgerRecord::Shipment(r) => &r.id,
            LedgerRecord::Order(r) => &r.id,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            LedgerRecord::Strip(r) => r.status,
            LedgerRecord::Box(r) => r.status,
            LedgerRecord::Carton(r) => r.status,
            LedgerRecord::Shipment(r) => r.status,
            LedgerRecord::Order(r) => r.status,
        }
    }

    pub fn creation_tx_id(&self) -> &str {
        match self {
            LedgerRecord::Strip(r) => &r.creation_tx_id,
            LedgerRecord::Box(r) => &r.creation_tx_id,
            LedgerRecord::Carton(r) => &r.creation_tx_id,
            LedgerRecord::Shipment(r) => &r.creation_tx_id,
            LedgerRecord::Order(r) => &r.creation_tx_id,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        match self {
            LedgerRecord::Strip(r) => r.created_at,
            LedgerRecord::Box(r) => r.created_at,
            LedgerRecord::Carton(r) => r.created_at,
            LedgerRecord::Shipment(r) => r.created_at,
            LedgerRecord::Order(r) => r.created_at,
        }
    }

    /// Ids of the records this one contains, in sealing order.
    pub fn child_ids(&self) -> &[String] {
        match self {
            LedgerRecord::Strip(_) => &[],
            LedgerRecord::Box(r) => &r.strips,
            LedgerRecord::Carton(r) => &r.boxes,
            LedgerRecord::Shipment(r) => &r.cartons,
            LedgerRecord::Order(r) => &r.item_ids,
        }
    }

    /// Id of the record directly above this one, if it has been assigned.
    pub fn parent_id(&self) -> Option<&str> {
        let parent = match self {
            LedgerRecord::Strip(r) => r.box_id.as_str(),
            LedgerRecord::Box(r) => r.carton_id.as_str(),
            LedgerRecord::Carton(r) => r.shipment_id.as_str(),
            LedgerRecord::Shipment(r) => r.order_id.as_str(),
            LedgerRecord::Order(_) => "",
        };
        (!parent.is_empty()).then_some(parent)
    }
}

// =============================================================================
// CONTAINMENT TRAITS
// =============================================================================

/// A typed view over one variant of [`LedgerRecord`].
pub trait Record: Sized + Clone {
    const KIND: DocType;

    fn id(&self) -> &str;

    fn status(&self) -> Status;

    /// Narrow a record to this kind, handing the record back on mismatch.
    fn from_record(record: LedgerRecord) -> Result<Self, LedgerRecord>;

    fn into_record(self) -> LedgerRecord;

    fn to_record(&self) -> LedgerRecord {
        self.clone().into_record()
    }
}

/// A record that is sealed into exactly one parent.
pub trait Containable: Record {
    /// Owning-parent field. Empty until sealed.
    fn parent_id(&self) -> &str;

    /// Stamp the owning parent and the status reached by sealing.
    fn assign_to(&mut self, parent_id: &str, status: Status, at: Timestamp);
}

/// A record created by sealing a list of children.
pub trait Container: Record {
    type Child: Containable;

    /// Build the freshly sealed parent.
    fn sealed(id: &str, children: Vec<String>, tx_id: &str, at: Timestamp) -> Self;

    fn child_ids(&self) -> &[String];
}

macro_rules! impl_record {
    ($ty:ty, $variant:ident) => {
        impl Record for $ty {
            const KIND: DocType = DocType::$variant;

            fn id(&self) -> &str {
                &self.id
            }

            fn status(&self) -> Status {
                self.status
            }

            fn from_record(record: LedgerRecord) -> Result<Self, LedgerRecord> {
                match record {
                    LedgerRecord::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }

            fn into_record(self) -> LedgerRecord {
                LedgerRecord::$variant(self)
            }
        }
    };
}

impl_record!(Strip, Strip);
impl_record!(MedicineBox, Box);
impl_record!(Carton, Carton);
impl_record!(Shipment, Shipment);
impl_record!(Order, Order);

impl Containable for Strip {
    fn parent_id(&self) -> &str {
        &self.box_id
    }

    fn assign_to(&mut self, parent_id: &str, status: Status, at: Timestamp) {
        self.box_id = parent_id.to_string();
        self.status = status;
        self.updated_at = at;
    }
}

impl Containable for MedicineBox {
    fn parent_id(&self) -> &str {
        &self.carton_id
    }

    fn assign_to(&mut self, parent_id: &str, status: Status, at: Timestamp) {
        self.carton_id = parent_id.to_string();
        self.status = status;
        self.updated_at = at;
    }
}

impl Containable for Carton {
    fn parent_id(&self) -> &str {
        &self.shipment_id
    }

    fn assign_to(&mut self, parent_id: &str, status: Status, at: Timestamp) {
        self.shipment_id = parent_id.to_string();
        self.status = status;
        self.updated_at = at;
    }
}

impl Containable for Shipment {
    fn parent_id(&self) -> &str {
        &self.order_id
    }

    fn assign_to(&mut self, parent_id: &str, status: Status, at: Timestamp) {
        self.order_id = parent_id.to_string();
        self.status = status;
        self.updated_at = at;
    }
}

impl Container for MedicineBox {
    type Child = Strip;

    fn sealed(id: &str, children: Vec<String>, tx_id: &str, at: Timestamp) -> Self {
        Self {
            id: id.to_string(),
            strips: children,
            carton_id: String::new(),
            status: Status::Created,
            creation_tx_id: tx_id.to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    fn child_ids(&self) -> &[String] {
        &self.strips
    }
}

impl Container for Carton {
    type Child = MedicineBox;

    fn sealed(id: &str, children: Vec<String>, tx_id: &str, at: Timestamp) -> Self {
        Self {
            id: id.to_string(),
            boxes: children,
            shipment_id: String::new(),
            status: Status::Created,
            creation_tx_id: tx_id.to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    fn child_ids(&self) -> &[String] {
        &self.boxes
    }
}

impl Container for Shipment {
    type Child = Carton;

    fn sealed(id: &str, children: Vec<String>, tx_id: &str, at: Timestamp) -> Self {
        Self {
            id: id.to_string(),
            cartons: children,
            order_id: String::new(),
            status: Status::Created,
            distributor: String::new(),
            distributed_at: None,
            creation_tx_id: tx_id.to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    fn child_ids(&self) -> &[String] {
        &self.cartons
    }
}
