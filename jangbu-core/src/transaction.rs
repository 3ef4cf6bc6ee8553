//! Ledger transaction records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Whether money entered or left the account (bank export `입금`/`출금`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "inbound")]
    Inbound,
    #[serde(rename = "outbound")]
    Outbound,
}

/// One row of the raw bank ledger, exactly as the source recorded it.
///
/// Amounts are whole KRW. Inbound rows are non-negative; outbound rows keep
/// the negative sign the export carries. `balance_after` is the running
/// balance the bank printed immediately after this transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub timestamp: NaiveDateTime,
    pub direction: Direction,
    pub amount: i64,
    pub balance_after: i64,
    /// Free-text transaction subtype from the bank ("카드", "이체", ...).
    pub kind: String,
    /// Counterparty/purpose string; the primary classification signal.
    pub description: String,
    pub memo: String,
}

impl RawTransaction {
    /// Magnitude of the transaction regardless of direction.
    pub fn abs_amount(&self) -> i64 {
        self.amount.abs()
    }
}

/// A raw transaction annotated with its accounting category.
///
/// Classification never mutates the underlying row; excluded rows stay in
/// the classified ledger so row counts match the raw ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    #[serde(flatten)]
    pub txn: RawTransaction,
    pub category: Category,
}

impl ClassifiedTransaction {
    pub fn new(txn: RawTransaction, category: Category) -> Self {
        Self { txn, category }
    }

    /// True if this row is excluded from all statement totals.
    pub fn is_excluded(&self) -> bool {
        self.category.account_type == crate::category::AccountType::Excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use chrono::NaiveDate;

    fn txn(amount: i64, balance: i64) -> RawTransaction {
        RawTransaction {
            timestamp: NaiveDate::from_ymd_opt(2025, 7, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            direction: if amount >= 0 {
                Direction::Inbound
            } else {
                Direction::Outbound
            },
            amount,
            balance_after: balance,
            kind: "이체".to_string(),
            description: "테스트".to_string(),
            memo: String::new(),
        }
    }

    #[test]
    fn test_abs_amount() {
        assert_eq!(txn(-4500, 100).abs_amount(), 4500);
        assert_eq!(txn(4500, 100).abs_amount(), 4500);
    }

    #[test]
    fn test_classified_row_serializes_flat() {
        let c = ClassifiedTransaction::new(txn(4500, 4500), Category::revenue("유모바일"));
        let json = serde_json::to_value(&c).unwrap();
        // The raw fields sit at the top level next to the category.
        assert_eq!(json["amount"], 4500);
        assert_eq!(json["direction"], "inbound");
        assert_eq!(json["category"]["account_type"], "revenue");
    }

    #[test]
    fn test_excluded_flag() {
        let c = ClassifiedTransaction::new(txn(-100, 0), Category::excluded());
        assert!(c.is_excluded());
        let c = ClassifiedTransaction::new(txn(-100, 0), Category::other_expense());
        assert!(!c.is_excluded());
    }
}
