//! jangbu-core: domain types for the bank-ledger statement pipeline.
//!
//! A ledger is an ordered list of transactions for one cash account, each
//! carrying the running balance the bank recorded after it. Everything in
//! this crate is plain data plus small pure helpers; classification,
//! aggregation and reconciliation live in `jangbu-statement`.

pub mod amount;
pub mod category;
pub mod names;
pub mod transaction;

pub use amount::{format_amount, parse_amount};
pub use category::{AccountType, Category};
pub use names::{AliasTable, PersonMatcher};
pub use transaction::{ClassifiedTransaction, Direction, RawTransaction};
