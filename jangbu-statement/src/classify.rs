//! The transaction classifier: one raw transaction in, one category out.
//!
//! Pure over its input plus the rule tables; evaluation order is
//! exclusions → overrides → keyword table → name-based resolution →
//! fallback, first match wins. Unmatched rows cannot happen: the fallback
//! always yields `other income` / `other expense`.

use jangbu_core::{
    AliasTable, Category, ClassifiedTransaction, Direction, PersonMatcher, RawTransaction,
};

use crate::rules::RuleSet;

/// Fixed transfer amounts to a private person that are loan interest
/// payments rather than wages or benefits.
const IMPUTED_INTEREST_AMOUNTS: [i64; 2] = [25_000, 50_000];

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
    aliases: AliasTable,
    person: PersonMatcher,
}

impl Classifier {
    pub fn new(rules: RuleSet, aliases: AliasTable) -> Self {
        Self {
            rules,
            aliases,
            person: PersonMatcher::new(),
        }
    }

    /// Classifier with the built-in rule tables and alias table.
    pub fn builtin() -> Self {
        Self::new(RuleSet::builtin(), AliasTable::builtin())
    }

    /// Assign a category to one transaction.
    pub fn classify(&self, txn: &RawTransaction) -> Category {
        let desc_lower = txn.description.to_lowercase();
        let kind_lower = txn.kind.to_lowercase();
        let normalized = self.aliases.normalize(&txn.description);

        for rule in &self.rules.exclusions {
            if rule.matches(&desc_lower, txn.abs_amount()) {
                return Category::excluded();
            }
        }

        let date = txn.timestamp.date();
        for rule in &self.rules.overrides {
            if rule.matches(date, &desc_lower, &normalized, txn.amount) {
                return rule.category.clone();
            }
        }

        match txn.direction {
            Direction::Inbound => self.classify_inbound(&desc_lower, &kind_lower, &normalized),
            Direction::Outbound => {
                self.classify_outbound(txn, &desc_lower, &kind_lower, &normalized)
            }
        }
    }

    fn classify_inbound(&self, desc_lower: &str, kind_lower: &str, normalized: &str) -> Category {
        for rule in &self.rules.inbound {
            if rule.matches(desc_lower, kind_lower) {
                return rule.category.clone();
            }
        }

        // A refund from a principal puts their own money back: it adjusts
        // capital instead of creating income.
        if desc_lower.contains("환불") {
            return match self.aliases.principal(normalized) {
                Some(p) => Category::capital(p),
                None => Category::non_operating_income("refund"),
            };
        }

        if let Some(p) = self.aliases.principal(normalized) {
            return Category::capital(p);
        }

        Category::other_income()
    }

    fn classify_outbound(
        &self,
        txn: &RawTransaction,
        desc_lower: &str,
        kind_lower: &str,
        normalized: &str,
    ) -> Category {
        for rule in &self.rules.outbound {
            if rule.matches(desc_lower, kind_lower) {
                return rule.category.clone();
            }
        }

        // Card rows that reached this point have no recognizable merchant.
        if kind_lower.contains("카드") {
            return Category::other_expense();
        }

        if kind_lower.contains("이체") {
            // Repayment overrides already fired; what is left of a transfer
            // to a principal is a capital withdrawal.
            if let Some(p) = self.aliases.principal(normalized) {
                return Category::capital_withdrawal(p);
            }
            if self.person.is_person(&txn.description) {
                if IMPUTED_INTEREST_AMOUNTS.contains(&txn.abs_amount()) {
                    return Category::non_operating_expense("interest");
                }
                return Category::expense("welfare - other");
            }
        }

        Category::other_expense()
    }

    /// Classify every row of a ledger, preserving order and row count
    /// (excluded rows stay in place).
    pub fn classify_ledger(&self, ledger: &[RawTransaction]) -> Vec<ClassifiedTransaction> {
        ledger
            .iter()
            .map(|txn| ClassifiedTransaction::new(txn.clone(), self.classify(txn)))
            .collect()
    }
}
