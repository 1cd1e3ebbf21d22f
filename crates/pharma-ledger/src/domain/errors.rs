//! # Domain Errors
//!
//! Error types for the containment contract.
//!
//! Every failing operation leaves the ledger untouched: the host discards all
//! staged writes of a transaction that returns an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value_objects::{DocType, Status};

// =============================================================================
// CONTRACT ERRORS
// =============================================================================

/// Errors returned by contract operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// No record stored under the id.
    #[error("{kind} {id} does not exist")]
    NotFound { id: String, kind: String },

    /// A record exists under the id but has a different `docType`.
    #[error("{id} is a {actual}, expected a {expected}")]
    KindMismatch {
        id: String,
        expected: DocType,
        actual: DocType,
    },

    /// A record already occupies the id.
    #[error("{kind} {id} already exists")]
    AlreadyExists { id: String, kind: DocType },

    /// The child is already sealed into another parent.
    #[error("{kind} {id} is already assigned to {parent}")]
    AlreadyAssigned {
        id: String,
        kind: DocType,
        parent: String,
    },

    /// Malformed or out-of-range input.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The requested status change moves backwards in the lattice.
    #[error("{kind} {id} cannot move from {from} to {to}")]
    InvalidState {
        id: String,
        kind: DocType,
        from: Status,
        to: Status,
    },

    /// The host ledger failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A stored value could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ContractError {
    /// `NotFound` for an id whose expected kind is known.
    pub fn not_found(id: impl Into<String>, kind: DocType) -> Self {
        Self::NotFound {
            id: id.into(),
            kind: kind.to_string(),
        }
    }

    /// `NotFound` for an id looked up without a kind.
    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            id: id.into(),
            kind: "item".to_string(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// The id the error refers to, when it names one.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::NotFound { id, .. }
            | Self::KindMismatch { id, .. }
            | Self::AlreadyExists { id, .. }
            | Self::AlreadyAssigned { id, .. }
            | Self::InvalidState { id, .. } => Some(id),
            Self::InvalidInput { .. } | Self::Ledger(_) | Self::Serialization { .. } => None,
        }
    }
}

// =============================================================================
// PORT ERRORS
// =============================================================================

/// Errors reported by a ledger stub implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("backend failure: {message}")]
    Backend { message: String },

    #[error("history unavailable for key {key}")]
    HistoryUnavailable { key: String },

    #[error("query not supported: {message}")]
    QueryUnsupported { message: String },
}

/// Errors reported by a secondary index.
///
/// Never surfaced to callers: the contract falls back to the ledger query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("index unavailable: {message}")]
    Unavailable { message: String },

    #[error("index query failed: {message}")]
    Query { message: String },
}

// =============================================================================
// WIRE PAYLOAD
// =============================================================================

/// Error category for callers that serialize failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    KindMismatch,
    AlreadyExists,
    AlreadyAssigned,
    InvalidInput,
    InvalidState,
    Ledger,
    Serialization,
}

/// Serializable form of a [`ContractError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

impl From<&ContractError> for ContractErrorPayload {
    fn from(err: &ContractError) -> Self {
        let kind = match err {
            ContractError::NotFound { .. } => ErrorKind::NotFound,
            ContractError::KindMismatch { .. } => ErrorKind::KindMismatch,
            ContractError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            ContractError::AlreadyAssigned { .. } => ErrorKind::AlreadyAssigned,
            ContractError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ContractError::InvalidState { .. } => ErrorKind::InvalidState,
            ContractError::Ledger(_) => ErrorKind::Ledger,
            ContractError::Serialization { .. } => ErrorKind::Serialization,
        };
        Self {
            kind,
            message: err.to_string(),
            item_id: err.item_id().map(str::to_string),
        }
    }
}

impl From<ContractError> for ContractErrorPayload {
    fn from(err: ContractError) -> Self {
        Self::from(&err)
    }
}
