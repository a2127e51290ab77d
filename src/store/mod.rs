//! Ledger store module
//!
//! In-memory state, the shared handle with change notification, and the
//! snapshot hand-off.

mod ledger;
mod snapshot;

pub use ledger::{ChangeEvent, Ledger, LedgerError, LedgerResult, LedgerState};
pub use snapshot::{Snapshot, SnapshotError};
