//! Accounting categories and the coarse account-type buckets above them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse bucket a category rolls up into for statement aggregation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AccountType {
    #[serde(rename = "revenue")]
    Revenue,
    #[serde(rename = "expense")]
    Expense,
    #[serde(rename = "capital")]
    Capital,
    #[serde(rename = "borrowing")]
    Borrowing,
    #[serde(rename = "borrowing-repayment")]
    BorrowingRepayment,
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "deposit-return")]
    DepositReturn,
    #[serde(rename = "non-operating-income")]
    NonOperatingIncome,
    #[serde(rename = "non-operating-expense")]
    NonOperatingExpense,
    #[serde(rename = "excluded")]
    Excluded,
}

impl AccountType {
    /// True if category totals keep the ledger sign; false if they are
    /// summed as magnitudes (direction already implied by the type).
    pub fn sign_preserving(&self) -> bool {
        matches!(
            self,
            AccountType::Revenue
                | AccountType::Capital
                | AccountType::Borrowing
                | AccountType::NonOperatingIncome
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Revenue => "revenue",
            AccountType::Expense => "expense",
            AccountType::Capital => "capital",
            AccountType::Borrowing => "borrowing",
            AccountType::BorrowingRepayment => "borrowing-repayment",
            AccountType::Deposit => "deposit",
            AccountType::DepositReturn => "deposit-return",
            AccountType::NonOperatingIncome => "non-operating-income",
            AccountType::NonOperatingExpense => "non-operating-expense",
            AccountType::Excluded => "excluded",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "revenue" => Ok(AccountType::Revenue),
            "expense" => Ok(AccountType::Expense),
            "capital" => Ok(AccountType::Capital),
            "borrowing" => Ok(AccountType::Borrowing),
            "borrowing-repayment" => Ok(AccountType::BorrowingRepayment),
            "deposit" => Ok(AccountType::Deposit),
            "deposit-return" => Ok(AccountType::DepositReturn),
            "non-operating-income" => Ok(AccountType::NonOperatingIncome),
            "non-operating-expense" => Ok(AccountType::NonOperatingExpense),
            "excluded" => Ok(AccountType::Excluded),
            other => Err(format!("unknown account type: {other}")),
        }
    }
}

/// An accounting category: the statement-facing label plus its bucket.
///
/// Labels follow a fixed `family - detail` convention ("revenue - 유모바일",
/// "advertising - kakao", "capital - 김선호"); the part before ` - ` is the
/// grouping prefix the statement assembler uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub account_type: AccountType,
    pub label: String,
}

impl Category {
    pub fn new(account_type: AccountType, label: impl Into<String>) -> Self {
        Self {
            account_type,
            label: label.into(),
        }
    }

    pub fn revenue(counterparty: &str) -> Self {
        Self::new(AccountType::Revenue, format!("revenue - {counterparty}"))
    }

    /// Operating expense with a fully spelled label ("advertising - kakao").
    pub fn expense(label: impl Into<String>) -> Self {
        Self::new(AccountType::Expense, label)
    }

    pub fn capital(person: &str) -> Self {
        Self::new(AccountType::Capital, format!("capital - {person}"))
    }

    pub fn capital_withdrawal(detail: &str) -> Self {
        Self::new(
            AccountType::Capital,
            format!("capital withdrawal - {detail}"),
        )
    }

    pub fn borrowing(person: &str) -> Self {
        Self::new(AccountType::Borrowing, format!("borrowing - {person}"))
    }

    pub fn borrowing_repayment(person: &str) -> Self {
        Self::new(
            AccountType::BorrowingRepayment,
            format!("borrowing repayment - {person}"),
        )
    }

    pub fn deposit(purpose: &str) -> Self {
        Self::new(AccountType::Deposit, format!("deposit - {purpose}"))
    }

    pub fn deposit_return(purpose: &str) -> Self {
        Self::new(
            AccountType::DepositReturn,
            format!("deposit return - {purpose}"),
        )
    }

    pub fn non_operating_income(reason: &str) -> Self {
        Self::new(
            AccountType::NonOperatingIncome,
            format!("non-operating income - {reason}"),
        )
    }

    pub fn non_operating_expense(reason: &str) -> Self {
        Self::new(
            AccountType::NonOperatingExpense,
            format!("non-operating expense - {reason}"),
        )
    }

    pub fn other_income() -> Self {
        Self::new(AccountType::NonOperatingIncome, "other income")
    }

    pub fn other_expense() -> Self {
        Self::new(AccountType::Expense, "other expense")
    }

    /// Sentinel for out-of-scope rows (payment-processor test charges).
    pub fn excluded() -> Self {
        Self::new(AccountType::Excluded, "excluded")
    }

    /// Grouping prefix: the label part before ` - `, or the whole label.
    pub fn group(&self) -> &str {
        self.label.split(" - ").next().unwrap_or(&self.label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
