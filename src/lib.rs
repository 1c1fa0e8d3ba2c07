//! # tally
//!
//! tally is a double-entry accounting tool, and a library for parsing
//! plain-text journal files.
//!
//! A journal text is parsed into a validated [`Ledger`], flattened into an
//! immutable [`Journal`], and queried through the [`report`] engine:
//!
//! ```
//! use tally::{Journal, Ledger};
//!
//! let text = "\
//! 2012/04/15 * (CHK001) Paycheck
//!     Assets:Bank:Checking        1500.00
//!     Income:Salary
//! ";
//! let ledger = Ledger::from_text(text).unwrap();
//! let journal = Journal::from_ledger(&ledger);
//! assert_eq!(journal.entries().len(), 2);
//! ```

mod journal;
mod ledger;
pub mod parse;
pub mod report;
pub mod utils;

pub use journal::*;
pub use ledger::*;
