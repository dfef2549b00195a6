//! Credo Storage Layer
//!
//! Persists the engine's output records to SQLite for audit and reporting
//! readers. [`SqliteLedger`] implements
//! [`RecordSink`](credo_domain::traits::RecordSink) and offers read-back
//! queries over what it stored.
//!
//! # Examples
//!
//! ```no_run
//! use credo_store::SqliteLedger;
//!
//! let ledger = SqliteLedger::new(":memory:").unwrap();
//! assert_eq!(ledger.counts().unwrap().scores, 0);
//! ```

#![warn(missing_docs)]

mod codec;
mod error;
mod ledger;

pub use error::StoreError;
pub use ledger::{LedgerCounts, SqliteLedger};
