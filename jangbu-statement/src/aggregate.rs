//! Pure reducer-style aggregation of a classified ledger.
//!
//! A single fold produces per-category totals, per-account-type totals and
//! the grand totals the statement assembler needs. No shared mutable state,
//! no side effects; the same ledger always aggregates to the same result.

use serde::Serialize;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use jangbu_core::{AccountType, Category, ClassifiedTransaction};

/// Per-category totals in first-seen insertion order, so repeated runs over
/// the same ledger produce identical output. Categories with no matching
/// transactions are simply absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryTotals {
    entries: Vec<(Category, i64)>,
}

impl CategoryTotals {
    fn add(&mut self, category: &Category, value: i64) {
        if let Some((_, total)) = self.entries.iter_mut().find(|(c, _)| c == category) {
            *total += value;
        } else {
            self.entries.push((category.clone(), value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, i64)> {
        self.entries.iter().map(|(c, v)| (c, *v))
    }

    /// Total for a category label, if any transaction carried it.
    pub fn get(&self, label: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(c, _)| c.label == label)
            .map(|(_, v)| *v)
    }

    /// Categories of one account type, in insertion order.
    pub fn of_type(&self, account_type: AccountType) -> Vec<(&Category, i64)> {
        self.entries
            .iter()
            .filter(|(c, _)| c.account_type == account_type)
            .map(|(c, v)| (c, *v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Statement-level totals. Expense-like figures are magnitudes; the
/// income-like ones keep the ledger sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GrandTotals {
    pub total_revenue: i64,
    pub total_expense: i64,
    pub total_capital_in: i64,
    pub total_capital_out: i64,
    pub total_borrowing: i64,
    pub total_repayment: i64,
    pub total_deposit: i64,
    pub total_deposit_return: i64,
    pub total_non_operating_income: i64,
    pub total_non_operating_expense: i64,
}

/// Everything derived from one pass over the classified ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregates {
    pub categories: CategoryTotals,
    pub account_types: BTreeMap<AccountType, i64>,
    pub grand: GrandTotals,
    /// Balance before the first ledger row.
    pub opening_balance: i64,
    /// Balance recorded after the last ledger row.
    pub closing_balance: i64,
    pub first_seen: Option<NaiveDateTime>,
    pub last_seen: Option<NaiveDateTime>,
}

/// Fold a classified ledger into totals. Excluded rows are skipped for every
/// total but still anchor the opening/closing balances, which are properties
/// of the account rather than of the classification.
pub fn aggregate(ledger: &[ClassifiedTransaction]) -> Aggregates {
    let mut categories = CategoryTotals::default();
    let mut account_types: BTreeMap<AccountType, i64> = BTreeMap::new();
    let mut grand = GrandTotals::default();

    let opening_balance = ledger
        .first()
        .map(|r| r.txn.balance_after - r.txn.amount)
        .unwrap_or(0);
    let closing_balance = ledger.last().map(|r| r.txn.balance_after).unwrap_or(0);
    let first_seen = ledger.first().map(|r| r.txn.timestamp);
    let last_seen = ledger.last().map(|r| r.txn.timestamp);

    for row in ledger {
        if row.is_excluded() {
            continue;
        }
        let account_type = row.category.account_type;
        let amount = row.txn.amount;
        let value = if account_type.sign_preserving() {
            amount
        } else {
            amount.abs()
        };

        categories.add(&row.category, value);
        *account_types.entry(account_type).or_insert(0) += value;

        match account_type {
            AccountType::Revenue => grand.total_revenue += amount,
            AccountType::Expense => grand.total_expense += amount.abs(),
            AccountType::Capital => {
                if amount >= 0 {
                    grand.total_capital_in += amount;
                } else {
                    grand.total_capital_out += amount.abs();
                }
            }
            AccountType::Borrowing => grand.total_borrowing += amount,
            AccountType::BorrowingRepayment => grand.total_repayment += amount.abs(),
            AccountType::Deposit => grand.total_deposit += amount.abs(),
            AccountType::DepositReturn => grand.total_deposit_return += amount.abs(),
            AccountType::NonOperatingIncome => grand.total_non_operating_income += amount,
            AccountType::NonOperatingExpense => grand.total_non_operating_expense += amount.abs(),
            AccountType::Excluded => {}
        }
    }

    Aggregates {
        categories,
        account_types,
        grand,
        opening_balance,
        closing_balance,
        first_seen,
        last_seen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use jangbu_core::{Direction, RawTransaction};

    fn row(amount: i64, balance: i64, category: Category) -> ClassifiedTransaction {
        ClassifiedTransaction::new(
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
            },
            category,
        )
    }

    #[test]
    fn test_sign_conventions() {
        let ledger = vec![
            row(5_800_000, 5_800_000, Category::revenue("유모바일")),
            row(-330_000, 5_470_000, Category::expense("advertising - kakao")),
            row(-10_000_000, -4_530_000, Category::borrowing_repayment("김선호")),
        ];
        let agg = aggregate(&ledger);

        assert_eq!(agg.grand.total_revenue, 5_800_000);
        // Expense-like totals are magnitudes.
        assert_eq!(agg.grand.total_expense, 330_000);
        assert_eq!(agg.grand.total_repayment, 10_000_000);
        assert_eq!(agg.categories.get("advertising - kakao"), Some(330_000));
    }

    #[test]
    fn test_capital_split_by_sign() {
        let ledger = vec![
            row(3_000_000, 3_000_000, Category::capital("김선호")),
            row(-700_000, 2_300_000, Category::capital_withdrawal("정동민")),
        ];
        let agg = aggregate(&ledger);
        assert_eq!(agg.grand.total_capital_in, 3_000_000);
        assert_eq!(agg.grand.total_capital_out, 700_000);
        // Per-category capital totals keep the ledger sign.
        assert_eq!(agg.categories.get("capital withdrawal - 정동민"), Some(-700_000));
    }

    #[test]
    fn test_excluded_rows_do_not_count() {
        let ledger = vec![
            row(-100, 999_900, Category::excluded()),
            row(100, 1_000_000, Category::excluded()),
            row(50_000, 1_050_000, Category::revenue("폰샵")),
        ];
        let agg = aggregate(&ledger);
        assert_eq!(agg.grand.total_revenue, 50_000);
        assert_eq!(agg.categories.len(), 1);
        assert!(agg.categories.get("excluded").is_none());
        // Balances still come from the full ledger.
        assert_eq!(agg.opening_balance, 1_000_000);
        assert_eq!(agg.closing_balance, 1_050_000);
    }

    #[test]
    fn test_empty_category_is_absent_not_zero() {
        let agg = aggregate(&[row(1_000, 1_000, Category::revenue("해피넷"))]);
        assert_eq!(agg.categories.get("revenue - 폰샵"), None);
        assert!(agg.account_types.get(&AccountType::Expense).is_none());
    }

    #[test]
    fn test_insertion_order_is_first_seen() {
        let ledger = vec![
            row(10, 10, Category::revenue("b")),
            row(20, 30, Category::revenue("a")),
            row(5, 35, Category::revenue("b")),
        ];
        let agg = aggregate(&ledger);
        let labels: Vec<&str> = agg.categories.iter().map(|(c, _)| c.label.as_str()).collect();
        assert_eq!(labels, vec!["revenue - b", "revenue - a"]);
        assert_eq!(agg.categories.get("revenue - b"), Some(15));
    }

    #[test]
    fn test_deterministic_over_reruns() {
        let ledger = vec![
            row(1_000, 1_000, Category::revenue("유모바일")),
            row(-400, 600, Category::expense("travel")),
        ];
        let a = aggregate(&ledger);
        let b = aggregate(&ledger);
        assert_eq!(a.grand, b.grand);
        assert_eq!(
            a.categories.iter().collect::<Vec<_>>(),
            b.categories.iter().collect::<Vec<_>>()
        );
    }
}
