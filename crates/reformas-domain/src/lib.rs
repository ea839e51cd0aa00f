//! reformas-domain
//!
//! Pure domain models (catalog entries, line items, payment schedule, quotes).
//! No I/O, no CLI, no storage. Only data types, invariants and derived values.

pub mod catalog;
pub mod common;
pub mod error;
pub mod line_item;
pub mod party;
pub mod payment;
pub mod quote;
pub mod schedule;

pub use catalog::*;
pub use common::*;
pub use error::DomainError;
pub use line_item::*;
pub use party::*;
pub use payment::*;
pub use quote::*;
pub use schedule::*;
