//! jangbu-statement: classification, aggregation, statement assembly and
//! reconciliation for a single cash account's bank ledger.
//!
//! Data flow: raw ledger → [`Classifier`] → classified ledger →
//! [`aggregate`] → [`assemble`] → statement; independently, raw + classified
//! (+ statement) → [`reconcile`] → pass/fail report. Reconciliation is a
//! verification pass, never a correction pass.

pub mod aggregate;
pub mod assemble;
pub mod classify;
pub mod pipeline;
pub mod reconcile;
pub mod rules;

pub use aggregate::{aggregate, Aggregates, CategoryTotals, GrandTotals};
pub use assemble::{assemble, Statement, StatementRow};
pub use classify::Classifier;
pub use pipeline::{run_pipeline, PipelineOutput};
pub use reconcile::{reconcile, CheckKind, CheckResult, Finding, ReconciliationReport};
pub use rules::{ExclusionRule, KeywordRule, OverrideRule, RuleSet};
