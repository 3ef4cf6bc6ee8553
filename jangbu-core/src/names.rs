//! Counterparty-name normalization and the person-name heuristic.
//!
//! The same person shows up in the ledger under several raw strings
//! (nicknames, the company name used as a transfer memo, parenthetical
//! suffixes). Folding aliases to one canonical name *before* any name-based
//! rule runs keeps downstream aggregation from double-counting a person
//! under two labels.

use regex::Regex;

/// Injectable alias → canonical-name table, consulted once per transaction.
#[derive(Debug, Clone)]
pub struct AliasTable {
    /// (substring needle, canonical name); first hit wins.
    aliases: Vec<(String, String)>,
    /// Canonical names of capital contributors / lenders.
    principals: Vec<String>,
}

impl AliasTable {
    pub fn new(aliases: Vec<(String, String)>, principals: Vec<String>) -> Self {
        Self { aliases, principals }
    }

    /// Alias table observed in the source ledger.
    pub fn builtin() -> Self {
        Self::new(
            vec![
                ("정동민".to_string(), "정동민".to_string()),
                ("노피".to_string(), "김선호".to_string()),
                ("이지애".to_string(), "김선호".to_string()),
            ],
            vec![
                "송호빈".to_string(),
                "정동민".to_string(),
                "김선호".to_string(),
            ],
        )
    }

    /// Canonical form of a raw counterparty string: parenthetical suffixes
    /// stripped ("정동민(딘)" → "정동민"), then alias folding.
    pub fn normalize(&self, raw: &str) -> String {
        let stripped = strip_parentheticals(raw);
        for (needle, canonical) in &self.aliases {
            if stripped.contains(needle.as_str()) {
                return canonical.clone();
            }
        }
        stripped
    }

    /// Canonical principal name contained in `normalized`, if any.
    pub fn principal(&self, normalized: &str) -> Option<&str> {
        self.principals
            .iter()
            .find(|p| normalized.contains(p.as_str()))
            .map(|p| p.as_str())
    }
}

/// Matcher for the person-name heuristic: a free-text value consisting
/// solely of 2–4 Hangul syllables (after parenthetical stripping) is taken
/// to be a personal counterparty.
#[derive(Debug, Clone)]
pub struct PersonMatcher {
    re: Regex,
}

impl PersonMatcher {
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"^[가-힣]{2,4}$").unwrap(),
        }
    }

    pub fn is_person(&self, raw: &str) -> bool {
        let stripped = strip_parentheticals(raw);
        self.re.is_match(stripped.trim())
    }
}

impl Default for PersonMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_parentheticals(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for c in raw.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}
