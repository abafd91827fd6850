#![doc(test(attr(deny(warnings))))]

//! splitbill turns a restaurant bill, a headcount and optional service charge/tax into
//! a per-person share, and keeps a short persisted history of recent splits.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!(
            build = %utils::build_info::current().summary(),
            "splitbill tracing initialized"
        );
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
