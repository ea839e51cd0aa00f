#![doc(test(attr(deny(warnings))))]

//! P&G Reformas quoting toolkit: builds priced renovation quotes from a service
//! catalog, keeps their totals and payment schedule consistent, and projects them
//! into a printable document.

pub mod catalog;
pub mod cli;
pub mod currency;
pub mod document;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("P&G Reformas tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
