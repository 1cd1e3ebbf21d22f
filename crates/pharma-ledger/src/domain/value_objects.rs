//! # Value Objects
//!
//! Immutable value types shared by every entity kind: the `docType`
//! discriminator, the status vocabulary, timestamps, and contract configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Transaction timestamp as reported by the host ledger.
pub type Timestamp = DateTime<Utc>;

/// Identifier of a host transaction.
pub type TxId = String;

/// Discriminator stored in every record's `docType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Strip,
    Box,
    Carton,
    Shipment,
    Order,
}

impl DocType {
    /// All kinds, smallest unit first.
    pub const ALL: [DocType; 5] = [
        DocType::Strip,
        DocType::Box,
        DocType::Carton,
        DocType::Shipment,
        DocType::Order,
    ];

    /// Search order of the legacy transaction-id scan: largest container first.
    pub const LEGACY_SCAN_ORDER: [DocType; 5] = [
        DocType::Shipment,
        DocType::Carton,
        DocType::Box,
        DocType::Strip,
        DocType::Order,
    ];

    /// The wire value of the discriminator.
    pub const fn as_str(self) -> &'static str {
        match self {
            DocType::Strip => "strip",
            DocType::Box => "box",
            DocType::Carton => "carton",
            DocType::Shipment => "shipment",
            DocType::Order => "order",
        }
    }

    /// Parse a wire discriminator. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Valid statuses for this kind, in lattice order.
    pub const fn lattice(self) -> &'static [Status] {
        match self {
            DocType::Strip | DocType::Box | DocType::Carton => &[Status::Created, Status::Sealed],
            DocType::Shipment => &[Status::Created, Status::InOrder, Status::Shipped],
            DocType::Order => &[Status::Created, Status::Dispatched, Status::Delivered],
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Created,
    Sealed,
    InOrder,
    Dispatched,
    Shipped,
    Delivered,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Created => "CREATED",
            Status::Sealed => "SEALED",
            Status::InOrder => "IN_ORDER",
            Status::Dispatched => "DISPATCHED",
            Status::Shipped => "SHIPPED",
            Status::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the contract service.
///
/// All values have defaults suitable for a production channel. Environment
/// overrides are read by [`ContractConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Longest child id list accepted by a seal or order (default: 1000).
    pub max_children_per_seal: usize,

    /// Whether `find_by_creation_tx` may fall back to scanning every key's
    /// history when no record carries the requested `creationTxId`
    /// (default: true).
    ///
    /// The fallback is a full-ledger scan. It exists for records written
    /// before `creationTxId` was stored.
    pub legacy_tx_scan: bool,

    /// Whether listings consult an attached secondary index before the
    /// ledger's own query primitive (default: true).
    pub use_secondary_index: bool,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            max_children_per_seal: 1000,
            legacy_tx_scan: true,
            use_secondary_index: true,
        }
    }
}

impl ContractConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of child ids per seal or order.
    pub fn with_max_children_per_seal(mut self, max: usize) -> Self {
        self.max_children_per_seal = max;
        self
    }

    /// Enable or disable the legacy history scan.
    pub fn with_legacy_tx_scan(mut self, enabled: bool) -> Self {
        self.legacy_tx_scan = enabled;
        self
    }

    /// Enable or disable the secondary index fast path.
    pub fn with_secondary_index(mut self, enabled: bool) -> Self {
        self.use_secondary_index = enabled;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PHARMA_MAX_CHILDREN`: child id list limit (default: 1000)
    /// - `PHARMA_LEGACY_TX_SCAN`: enable the history scan fallback (default: true)
    /// - `PHARMA_USE_SECONDARY_INDEX`: consult the secondary index (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_children_per_seal: env::var("PHARMA_MAX_CHILDREN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_children_per_seal),
            legacy_tx_scan: env::var("PHARMA_LEGACY_TX_SCAN")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.legacy_tx_scan),
            use_secondary_index: env::var("PHARMA_USE_SECONDARY_INDEX")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.use_secondary_index),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value != "false" && value != "0" && value != "off"
}
