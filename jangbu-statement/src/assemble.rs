//! Statement assembly: turns aggregates into a hierarchical report.
//!
//! Layout contract: section headers carry `=== … ===` markers, subtotal
//! rows carry the word "total", leaf detail rows are two-space-indented
//! category labels. Every ordering is total (amount-descending with a
//! label tie-break, label order for the capital section), so repeated
//! runs over the same ledger render byte-identical output.

use serde::Serialize;

use jangbu_core::{format_amount, AccountType, Category};

use crate::aggregate::Aggregates;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRow {
    pub label: String,
    pub value: Option<i64>,
}

impl StatementRow {
    fn header(label: &str) -> Self {
        Self {
            label: format!("=== {label} ==="),
            value: None,
        }
    }

    fn leaf(label: &str, value: i64) -> Self {
        Self {
            label: format!("  {label}"),
            value: Some(value),
        }
    }

    fn summary(label: &str, value: i64) -> Self {
        Self {
            label: label.to_string(),
            value: Some(value),
        }
    }

    fn blank() -> Self {
        Self {
            label: String::new(),
            value: None,
        }
    }
}

/// The assembled statement: derived figures plus the laid-out rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub operating_income: i64,
    pub net_income: i64,
    pub net_borrowing: i64,
    pub net_capital: i64,
    /// Opening balance plus every non-operating flow plus net income;
    /// reconciliation compares this against the ledger's last balance.
    pub computed_cash_balance: i64,
    pub rows: Vec<StatementRow>,
}

impl Statement {
    /// `(label, formatted value)` pairs for the publishing boundary.
    pub fn render(&self) -> Vec<(String, String)> {
        self.rows
            .iter()
            .map(|r| {
                (
                    r.label.clone(),
                    r.value.map(format_amount).unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Plain-text rendering for console review.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (label, value) in self.render() {
            if value.is_empty() {
                out.push_str(&label);
            } else {
                out.push_str(&format!("{label:<44}{value:>16}"));
            }
            out.push('\n');
        }
        out
    }

    /// Value of the first row with this exact label, for checks and tests.
    pub fn value_of(&self, label: &str) -> Option<i64> {
        self.rows.iter().find(|r| r.label == label).and_then(|r| r.value)
    }
}

/// Leaves of one account type, amount-descending, label ascending on ties.
fn by_amount_desc(aggregates: &Aggregates, account_type: AccountType) -> Vec<(&Category, i64)> {
    let mut items = aggregates.categories.of_type(account_type);
    items.sort_by(|(ca, va), (cb, vb)| vb.cmp(va).then_with(|| ca.label.cmp(&cb.label)));
    items
}

fn push_leaves(rows: &mut Vec<StatementRow>, items: &[(&Category, i64)]) {
    for (category, value) in items {
        rows.push(StatementRow::leaf(&category.label, *value));
    }
}

/// Assemble the statement from aggregated totals. Derived figures are
/// computed in dependency order; every amount is an exact sum of whole
/// currency units, no rounding anywhere.
pub fn assemble(aggregates: &Aggregates) -> Statement {
    let g = &aggregates.grand;

    let operating_income = g.total_revenue - g.total_expense;
    let net_income =
        operating_income + g.total_non_operating_income - g.total_non_operating_expense;
    let net_borrowing = g.total_borrowing - g.total_repayment;
    let net_capital = g.total_capital_in - g.total_capital_out;
    let net_deposit = g.total_deposit - g.total_deposit_return;
    let computed_cash_balance =
        aggregates.opening_balance + net_capital + net_borrowing - net_deposit + net_income;

    let mut rows = Vec::new();

    // I. Revenue
    rows.push(StatementRow::header("I. Revenue"));
    push_leaves(&mut rows, &by_amount_desc(aggregates, AccountType::Revenue));
    rows.push(StatementRow::summary("Revenue total", g.total_revenue));
    rows.push(StatementRow::blank());

    // II. Operating expenses, grouped by label prefix.
    rows.push(StatementRow::header("II. Operating expenses"));
    let expenses = by_amount_desc(aggregates, AccountType::Expense);
    let mut groups: Vec<(&str, i64)> = Vec::new();
    for (category, value) in &expenses {
        let group = category.group();
        if let Some((_, total)) = groups.iter_mut().find(|(name, _)| *name == group) {
            *total += value;
        } else {
            groups.push((group, *value));
        }
    }
    groups.sort_by(|(na, va), (nb, vb)| vb.cmp(va).then_with(|| na.cmp(nb)));
    for (group, group_total) in &groups {
        for (category, value) in &expenses {
            if category.group() == *group {
                rows.push(StatementRow::leaf(&category.label, *value));
            }
        }
        rows.push(StatementRow::summary(&format!("{group} total"), *group_total));
    }
    rows.push(StatementRow::summary("Expense total", g.total_expense));
    rows.push(StatementRow::summary("Operating income", operating_income));
    rows.push(StatementRow::blank());

    // III. Non-operating income and expense.
    rows.push(StatementRow::header("III. Non-operating"));
    let non_op_income = by_amount_desc(aggregates, AccountType::NonOperatingIncome);
    if !non_op_income.is_empty() {
        push_leaves(&mut rows, &non_op_income);
        rows.push(StatementRow::summary(
            "Non-operating income total",
            g.total_non_operating_income,
        ));
    }
    let non_op_expense = by_amount_desc(aggregates, AccountType::NonOperatingExpense);
    if !non_op_expense.is_empty() {
        push_leaves(&mut rows, &non_op_expense);
        rows.push(StatementRow::summary(
            "Non-operating expense total",
            g.total_non_operating_expense,
        ));
    }
    rows.push(StatementRow::summary("Net income", net_income));
    rows.push(StatementRow::blank());

    // IV. Borrowings and deposits (outside the income statement).
    let borrowings = by_amount_desc(aggregates, AccountType::Borrowing);
    let repayments = by_amount_desc(aggregates, AccountType::BorrowingRepayment);
    let deposits = by_amount_desc(aggregates, AccountType::Deposit);
    let deposit_returns = by_amount_desc(aggregates, AccountType::DepositReturn);
    if !borrowings.is_empty()
        || !repayments.is_empty()
        || !deposits.is_empty()
        || !deposit_returns.is_empty()
    {
        rows.push(StatementRow::header("IV. Borrowings and deposits"));
        if !borrowings.is_empty() {
            push_leaves(&mut rows, &borrowings);
            rows.push(StatementRow::summary("Borrowing total", g.total_borrowing));
        }
        if !repayments.is_empty() {
            push_leaves(&mut rows, &repayments);
            rows.push(StatementRow::summary("Repayment total", g.total_repayment));
        }
        rows.push(StatementRow::summary("Net borrowing", net_borrowing));
        if !deposits.is_empty() {
            push_leaves(&mut rows, &deposits);
            rows.push(StatementRow::summary("Deposit total", g.total_deposit));
        }
        if !deposit_returns.is_empty() {
            push_leaves(&mut rows, &deposit_returns);
            rows.push(StatementRow::summary(
                "Deposit return total",
                g.total_deposit_return,
            ));
        }
        rows.push(StatementRow::blank());
    }

    // V. Capital, label-sorted the way the source statement listed people.
    let mut capital = aggregates.categories.of_type(AccountType::Capital);
    if !capital.is_empty() {
        capital.sort_by(|(ca, _), (cb, _)| ca.label.cmp(&cb.label));
        rows.push(StatementRow::header("V. Capital"));
        push_leaves(&mut rows, &capital);
        rows.push(StatementRow::summary("Capital in total", g.total_capital_in));
        rows.push(StatementRow::summary("Capital out total", g.total_capital_out));
        rows.push(StatementRow::summary("Net capital", net_capital));
        rows.push(StatementRow::blank());
    }

    // VI. Cash-flow summary.
    rows.push(StatementRow::header("VI. Cash flow"));
    rows.push(StatementRow::leaf("opening balance", aggregates.opening_balance));
    rows.push(StatementRow::leaf("net capital", net_capital));
    rows.push(StatementRow::leaf("net borrowing", net_borrowing));
    rows.push(StatementRow::leaf("deposits (net, asset increase)", -net_deposit));
    rows.push(StatementRow::leaf("net income", net_income));
    rows.push(StatementRow::summary(
        "Computed cash balance",
        computed_cash_balance,
    ));

    Statement {
        operating_income,
        net_income,
        net_borrowing,
        net_capital,
        computed_cash_balance,
        rows,
    }
}
