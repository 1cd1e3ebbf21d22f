//! # Ports Layer
//!
//! - `inbound.rs` - Driving ports (API exposed to the invocation glue)
//! - `outbound.rs` - Driven ports (host ledger and secondary index)

pub mod inbound;
pub mod outbound;
