//! Independent verification of the classify → aggregate → assemble chain.
//!
//! Every check always runs; a failing check never stops the others and
//! nothing here mutates the ledger or the statement. Findings are capped
//! per check so one systematic defect does not drown the report.

use serde::Serialize;

use jangbu_core::{format_amount, ClassifiedTransaction, RawTransaction};

use crate::assemble::Statement;

/// Cap on recorded findings per check.
const MAX_FINDINGS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    RowCountParity,
    BalanceContinuity,
    AggregateCrossCheck,
    ClassificationCompleteness,
    StatementToLedger,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::RowCountParity => "row-count parity",
            CheckKind::BalanceContinuity => "balance continuity",
            CheckKind::AggregateCrossCheck => "aggregate cross-check",
            CheckKind::ClassificationCompleteness => "classification completeness",
            CheckKind::StatementToLedger => "statement-to-ledger",
        }
    }
}

/// One discrepancy: where it was seen and the expected/actual pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Ledger row index, where the finding is tied to a row.
    pub row: Option<usize>,
    pub expected: i64,
    pub actual: i64,
    pub detail: String,
}

impl Finding {
    fn new(row: Option<usize>, expected: i64, actual: i64, detail: impl Into<String>) -> Self {
        Self {
            row,
            expected,
            actual,
            detail: detail.into(),
        }
    }

    pub fn delta(&self) -> i64 {
        self.actual - self.expected
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub passed: bool,
    pub findings: Vec<Finding>,
    /// Findings seen past the recording cap.
    pub suppressed: usize,
}

impl CheckResult {
    fn from_findings(kind: CheckKind, mut findings: Vec<Finding>) -> Self {
        let suppressed = findings.len().saturating_sub(MAX_FINDINGS);
        findings.truncate(MAX_FINDINGS);
        Self {
            kind,
            passed: findings.is_empty() && suppressed == 0,
            findings,
            suppressed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub checks: Vec<CheckResult>,
}

impl ReconciliationReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.kind == kind)
    }

    /// Console rendering, one line per check plus indented findings.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for check in &self.checks {
            let verdict = if check.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!("[{verdict}] {}\n", check.kind.as_str()));
            for finding in &check.findings {
                let at = finding
                    .row
                    .map(|i| format!("row {i}: "))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "       {at}{} (expected {}, actual {}, delta {})\n",
                    finding.detail,
                    format_amount(finding.expected),
                    format_amount(finding.actual),
                    format_amount(finding.delta()),
                ));
            }
            if check.suppressed > 0 {
                out.push_str(&format!(
                    "       … {} more finding(s) suppressed\n",
                    check.suppressed
                ));
            }
        }
        let verdict = if self.all_passed() {
            "all checks passed"
        } else {
            "RECONCILIATION FAILED"
        };
        out.push_str(&format!("{verdict}\n"));
        out
    }
}

fn check_row_count(raw: &[RawTransaction], classified: &[ClassifiedTransaction]) -> CheckResult {
    let mut findings = Vec::new();
    if raw.len() != classified.len() {
        findings.push(Finding::new(
            None,
            raw.len() as i64,
            classified.len() as i64,
            "classified row count differs from raw",
        ));
    }
    CheckResult::from_findings(CheckKind::RowCountParity, findings)
}

/// Running-balance continuity over the non-excluded classified rows.
/// Excluded pairs cancel out, so skipping them keeps the chain intact.
fn check_balance_continuity(classified: &[ClassifiedTransaction]) -> CheckResult {
    let mut findings = Vec::new();
    let mut prev: Option<i64> = None;
    for (index, row) in classified.iter().enumerate() {
        if row.is_excluded() {
            continue;
        }
        if let Some(prev_balance) = prev {
            let expected = prev_balance + row.txn.amount;
            let actual = row.txn.balance_after;
            if (actual - expected).abs() >= 1 {
                findings.push(Finding::new(
                    Some(index),
                    expected,
                    actual,
                    "balance breaks the running chain",
                ));
            }
        }
        prev = Some(row.txn.balance_after);
    }
    CheckResult::from_findings(CheckKind::BalanceContinuity, findings)
}

/// Inbound and outbound sums must survive classification unchanged.
fn check_aggregate_cross(
    raw: &[RawTransaction],
    classified: &[ClassifiedTransaction],
) -> CheckResult {
    let raw_in: i64 = raw.iter().filter(|r| r.amount > 0).map(|r| r.amount).sum();
    let raw_out: i64 = raw.iter().filter(|r| r.amount < 0).map(|r| r.amount).sum();
    let cls_in: i64 = classified
        .iter()
        .filter(|r| r.txn.amount > 0)
        .map(|r| r.txn.amount)
        .sum();
    let cls_out: i64 = classified
        .iter()
        .filter(|r| r.txn.amount < 0)
        .map(|r| r.txn.amount)
        .sum();

    let mut findings = Vec::new();
    if raw_in != cls_in {
        findings.push(Finding::new(None, raw_in, cls_in, "inbound sum drifted"));
    }
    if raw_out != cls_out {
        findings.push(Finding::new(None, raw_out, cls_out, "outbound sum drifted"));
    }
    CheckResult::from_findings(CheckKind::AggregateCrossCheck, findings)
}

fn check_completeness(classified: &[ClassifiedTransaction]) -> CheckResult {
    let mut findings = Vec::new();
    for (index, row) in classified.iter().enumerate() {
        if row.category.label.trim().is_empty() {
            findings.push(Finding::new(
                Some(index),
                1,
                0,
                "row carries an empty category label",
            ));
        }
    }
    CheckResult::from_findings(CheckKind::ClassificationCompleteness, findings)
}

fn check_statement_to_ledger(
    classified: &[ClassifiedTransaction],
    statement: &Statement,
) -> CheckResult {
    let mut findings = Vec::new();
    if let Some(last) = classified.last() {
        let expected = last.txn.balance_after;
        let actual = statement.computed_cash_balance;
        if expected != actual {
            findings.push(Finding::new(
                Some(classified.len() - 1),
                expected,
                actual,
                "computed cash balance differs from the ledger's closing balance",
            ));
        }
    }
    CheckResult::from_findings(CheckKind::StatementToLedger, findings)
}

/// Run every check against the raw ledger, the classified ledger and the
/// assembled statement. Checks are independent; order is fixed for output.
pub fn reconcile(
    raw: &[RawTransaction],
    classified: &[ClassifiedTransaction],
    statement: &Statement,
) -> ReconciliationReport {
    ReconciliationReport {
        checks: vec![
            check_row_count(raw, classified),
            check_balance_continuity(classified),
            check_aggregate_cross(raw, classified),
            check_completeness(classified),
            check_statement_to_ledger(classified, statement),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::assemble::assemble;
    use chrono::NaiveDate;
    use jangbu_core::{Category, Direction};

    fn raw(amount: i64, balance: i64) -> RawTransaction {
        RawTransaction {
            timestamp: NaiveDate::from_ymd_opt(2025, 7, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            direction: if amount >= 0 {
                Direction::Inbound
            } else {
                Direction::Outbound
            },
            amount,
            balance_after: balance,
            kind: "이체".to_string(),
            description: String::new(),
            memo: String::new(),
        }
    }

    fn classified(amount: i64, balance: i64, category: Category) -> ClassifiedTransaction {
        ClassifiedTransaction::new(raw(amount, balance), category)
    }

    #[test]
    fn test_clean_ledger_passes_all_checks() {
        let raw_rows = vec![raw(1_000_000, 1_000_000), raw(-400_000, 600_000)];
        let cls = vec![
            classified(1_000_000, 1_000_000, Category::revenue("폰샵")),
            classified(-400_000, 600_000, Category::expense("travel")),
        ];
        let statement = assemble(&aggregate(&cls));
        let report = reconcile(&raw_rows, &cls, &statement);
        assert!(report.all_passed(), "{}", report.to_text());
    }

    #[test]
    fn test_row_count_mismatch_is_flagged() {
        let raw_rows = vec![raw(1_000, 1_000), raw(2_000, 3_000)];
        let cls = vec![classified(1_000, 1_000, Category::revenue("폰샵"))];
        let statement = assemble(&aggregate(&cls));
        let report = reconcile(&raw_rows, &cls, &statement);
        let check = report.check(CheckKind::RowCountParity).unwrap();
        assert!(!check.passed);
        assert_eq!(check.findings[0].expected, 2);
        assert_eq!(check.findings[0].actual, 1);
    }

    #[test]
    fn test_balance_break_reports_row_and_delta() {
        // Second balance is off by 500.
        let cls = vec![
            classified(1_000_000, 1_000_000, Category::revenue("폰샵")),
            classified(-400_000, 600_500, Category::expense("travel")),
        ];
        let raw_rows: Vec<RawTransaction> = cls.iter().map(|c| c.txn.clone()).collect();
        let statement = assemble(&aggregate(&cls));
        let report = reconcile(&raw_rows, &cls, &statement);

        let check = report.check(CheckKind::BalanceContinuity).unwrap();
        assert!(!check.passed);
        assert_eq!(check.findings.len(), 1);
        assert_eq!(check.findings[0].row, Some(1));
        assert_eq!(check.findings[0].delta(), 500);
    }

    #[test]
    fn test_excluded_pair_does_not_break_continuity() {
        let cls = vec![
            classified(1_000_000, 1_000_000, Category::revenue("폰샵")),
            classified(-100, 999_900, Category::excluded()),
            classified(100, 1_000_000, Category::excluded()),
            classified(-400_000, 600_000, Category::expense("travel")),
        ];
        let report_check = check_balance_continuity(&cls);
        assert!(report_check.passed, "{:?}", report_check.findings);
    }

    #[test]
    fn test_aggregate_cross_check_reports_difference() {
        let raw_rows = vec![raw(1_000_000, 1_000_000)];
        // Classified copy carries a corrupted amount.
        let cls = vec![classified(999_000, 1_000_000, Category::revenue("폰샵"))];
        let statement = assemble(&aggregate(&cls));
        let report = reconcile(&raw_rows, &cls, &statement);

        let check = report.check(CheckKind::AggregateCrossCheck).unwrap();
        assert!(!check.passed);
        assert_eq!(check.findings[0].expected, 1_000_000);
        assert_eq!(check.findings[0].actual, 999_000);
        assert_eq!(check.findings[0].delta(), -1_000);
    }

    #[test]
    fn test_empty_label_fails_completeness() {
        let cls = vec![classified(
            1_000,
            1_000,
            Category {
                account_type: jangbu_core::AccountType::Revenue,
                label: "  ".to_string(),
            },
        )];
        let check = check_completeness(&cls);
        assert!(!check.passed);
        assert_eq!(check.findings[0].row, Some(0));
    }

    #[test]
    fn test_findings_are_capped() {
        // Every row after the first breaks the chain.
        let mut cls = vec![classified(100, 100, Category::revenue("폰샵"))];
        for i in 0..25 {
            cls.push(classified(100, 100 + i, Category::revenue("폰샵")));
        }
        let check = check_balance_continuity(&cls);
        assert!(!check.passed);
        assert_eq!(check.findings.len(), 10);
        assert!(check.suppressed > 0);
    }

    #[test]
    fn test_checks_are_independent() {
        // Row count is wrong AND a balance breaks; both must be reported.
        let raw_rows = vec![raw(1_000, 1_000)];
        let cls = vec![
            classified(1_000, 1_000, Category::revenue("폰샵")),
            classified(500, 9_999, Category::revenue("폰샵")),
        ];
        let statement = assemble(&aggregate(&cls));
        let report = reconcile(&raw_rows, &cls, &statement);
        assert!(!report.check(CheckKind::RowCountParity).unwrap().passed);
        assert!(!report.check(CheckKind::BalanceContinuity).unwrap().passed);
        assert_eq!(report.checks.len(), 5);
    }

    #[test]
    fn test_report_serializes_with_kebab_check_kinds() {
        let raw_rows = vec![raw(1_000, 1_000)];
        let cls = vec![classified(1_000, 1_000, Category::revenue("폰샵"))];
        let statement = assemble(&aggregate(&cls));
        let report = reconcile(&raw_rows, &cls, &statement);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["checks"][0]["kind"], "row-count-parity");
        assert_eq!(json["checks"][0]["passed"], true);
    }

    #[test]
    fn test_report_text_renders_verdicts() {
        let raw_rows = vec![raw(1_000, 1_000)];
        let cls = vec![classified(1_000, 1_000, Category::revenue("폰샵"))];
        let statement = assemble(&aggregate(&cls));
        let report = reconcile(&raw_rows, &cls, &statement);
        let text = report.to_text();
        assert!(text.contains("[PASS] row-count parity"));
        assert!(text.contains("all checks passed"));
    }
}
