//! # Domain Layer
//!
//! Pure domain logic with no I/O dependencies.

pub mod entities;
pub mod errors;
pub mod lifecycle;
pub mod trace;
pub mod value_objects;
