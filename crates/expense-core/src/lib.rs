//! expense-core
//!
//! The expense ledger engine: the write-through [`Ledger`], its snapshot codec,
//! the [`BlobStore`] seam and the pure view functions used to list and chart
//! expenses. No terminal I/O and no filesystem access live here.

pub mod codec;
pub mod error;
pub mod ledger;
pub mod store;
pub mod view;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{load_from_store, Ledger, LoadOutcome, LoadReport, Snapshot};
pub use store::{BlobStore, MemoryStore, DEFAULT_STORAGE_KEY};
pub use view::{filter_by, snapshot_warnings, totals_by_category, CategoryTotals, ExcludedTotal};
