//! # Status Lattice
//!
//! Each kind moves forward through a fixed status list:
//!
//! | Kind                 | Lattice                          |
//! |----------------------|----------------------------------|
//! | strip, box, carton   | CREATED → SEALED                 |
//! | shipment             | CREATED → IN_ORDER → SHIPPED     |
//! | order                | CREATED → DISPATCHED → DELIVERED |
//!
//! Forward moves may skip steps. Re-asserting the current status is accepted.
//! Moving backwards, or to a status outside the kind's lattice, is rejected.

use super::entities::LedgerRecord;
use super::errors::ContractError;
use super::value_objects::{DocType, Status};

fn position(kind: DocType, status: Status) -> Option<usize> {
    kind.lattice().iter().position(|s| *s == status)
}

/// Whether `kind` may move from `from` to `to`.
pub fn is_valid_transition(kind: DocType, from: Status, to: Status) -> bool {
    match (position(kind, from), position(kind, to)) {
        (Some(from), Some(to)) => to >= from,
        _ => false,
    }
}

/// Check a status change on a stored record.
pub fn check_transition(record: &LedgerRecord, to: Status) -> Result<(), ContractError> {
    let kind = record.doc_type();
    let from = record.status();
    if is_valid_transition(kind, from, to) {
        Ok(())
    } else {
        Err(ContractError::InvalidState {
            id: record.id().to_string(),
            kind,
            from,
            to,
        })
    }
}
