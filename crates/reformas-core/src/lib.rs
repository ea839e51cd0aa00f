//! reformas-core
//!
//! Quote building logic: catalog resolution, the budget aggregator, the quote index
//! and the persistence contract. Depends on reformas-domain. No terminal I/O and no
//! concrete storage beyond the in-memory store used for tests and previews.

pub mod budget_aggregator;
pub mod catalog_service;
pub mod error;
pub mod format;
pub mod quote_index_service;
pub mod storage;

pub use budget_aggregator::*;
pub use catalog_service::*;
pub use error::CoreError;
pub use format::*;
pub use quote_index_service::*;
pub use storage::{quote_warnings, InMemoryQuoteStore, QuoteStore};

#[cfg(test)]
mod tests;
