//! The batch composition: classify, aggregate, assemble, reconcile.
//!
//! One synchronous pass, no IO. Callers bring a parsed raw ledger and get
//! back every intermediate product, so the CLI can print whichever stage it
//! was asked for without re-running the others.

use anyhow::{bail, Result};

use jangbu_core::{ClassifiedTransaction, RawTransaction};

use crate::aggregate::{aggregate, Aggregates};
use crate::assemble::{assemble, Statement};
use crate::classify::Classifier;
use crate::reconcile::{reconcile, ReconciliationReport};

/// Every product of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub classified: Vec<ClassifiedTransaction>,
    pub aggregates: Aggregates,
    pub statement: Statement,
    pub report: ReconciliationReport,
}

/// Run the full pipeline over a raw ledger. Rows are ordered by timestamp
/// before classification; the sort is stable so same-timestamp rows keep
/// their bank-export order. An empty ledger is an error, not an empty
/// statement.
pub fn run_pipeline(mut raw: Vec<RawTransaction>) -> Result<PipelineOutput> {
    if raw.is_empty() {
        bail!("ledger contains no transactions");
    }
    raw.sort_by_key(|t| t.timestamp);

    let classifier = Classifier::builtin();
    let classified = classifier.classify_ledger(&raw);
    let aggregates = aggregate(&classified);
    let statement = assemble(&aggregates);
    let report = reconcile(&raw, &classified, &statement);

    Ok(PipelineOutput {
        classified,
        aggregates,
        statement,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use jangbu_core::Direction;

    fn raw(day: u32, hour: u32, amount: i64, balance: i64, description: &str) -> RawTransaction {
        RawTransaction {
            timestamp: NaiveDate::from_ymd_opt(2025, 7, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            direction: if amount >= 0 {
                Direction::Inbound
            } else {
                Direction::Outbound
            },
            amount,
            balance_after: balance,
            kind: "이체".to_string(),
            description: description.to_string(),
            memo: String::new(),
        }
    }

    #[test]
    fn test_empty_ledger_is_an_error() {
        let err = run_pipeline(Vec::new()).unwrap_err();
        assert!(err.to_string().contains("no transactions"));
    }

    #[test]
    fn test_rows_sorted_by_timestamp_before_classification() {
        let ledger = vec![
            raw(2, 9, -40_000, 960_000, "버스"),
            raw(1, 9, 1_000_000, 1_000_000, "유모바일"),
        ];
        let output = run_pipeline(ledger).unwrap();
        assert_eq!(output.classified[0].txn.amount, 1_000_000);
        assert_eq!(output.classified[1].txn.amount, -40_000);
        assert!(output.report.all_passed(), "{}", output.report.to_text());
    }

    #[test]
    fn test_rerun_is_identical() {
        let ledger = vec![
            raw(1, 9, 1_000_000, 1_000_000, "유모바일"),
            raw(2, 9, -40_000, 960_000, "버스"),
        ];
        let a = run_pipeline(ledger.clone()).unwrap();
        let b = run_pipeline(ledger).unwrap();
        assert_eq!(a.classified, b.classified);
        assert_eq!(a.statement, b.statement);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn test_outputs_are_consistent_across_stages() {
        let ledger = vec![
            raw(1, 9, 5_800_000, 5_800_000, "유모바일"),
            raw(2, 9, -330_000, 5_470_000, "카카오 광고"),
        ];
        let output = run_pipeline(ledger).unwrap();
        assert_eq!(output.aggregates.grand.total_revenue, 5_800_000);
        assert_eq!(output.statement.operating_income, 5_470_000);
        assert_eq!(
            output.statement.computed_cash_balance,
            output.aggregates.closing_balance
        );
    }
}
