//! jangbu-ingest: CSV ledger ingestion and egress.
//!
//! The pipeline's only I/O boundary: reading the raw bank export (7 columns)
//! or a previously classified ledger (9 columns), and writing the classified
//! ledger back out. Remote stores and publishers stay outside this
//! workspace; a CSV file is their local stand-in.

pub mod ledger_csv;

pub use ledger_csv::{read_classified_ledger, read_raw_ledger, write_classified_ledger};
