#![doc(test(attr(deny(warnings))))]

//! Expense Tracker records expenses, lists them with category and note
//! filters, and charts per-category totals. The ledger engine lives in the
//! `expense-*` crates; this crate wires it to a terminal shell.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense tracker tracing initialized.");
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
