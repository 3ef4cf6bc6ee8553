//! Bank-export CSV parsing.
//!
//! Raw export columns (header row optional):
//!   거래일시, 구분, 거래금액, 거래 후 잔액, 거래구분, 내용, 메모
//! Classified ledgers append 계정과목 (category label) and 계정타입
//! (account type).

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;

use jangbu_core::{
    parse_amount, AccountType, Category, ClassifiedTransaction, Direction, RawTransaction,
};

/// Parse a timestamp cell. Bank exports print `2025.09.03 10:12:08`;
/// date-only rows are taken as midnight.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y.%m.%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y.%m.%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

fn parse_direction(s: &str, amount: i64) -> Direction {
    match s.trim() {
        "입금" => Direction::Inbound,
        "출금" => Direction::Outbound,
        // Some exports leave the column blank; fall back to the sign.
        _ if amount < 0 => Direction::Outbound,
        _ => Direction::Inbound,
    }
}

fn record_to_raw(record: &csv::StringRecord) -> Option<RawTransaction> {
    // Rows without a parseable timestamp are headers or filler, not data.
    let timestamp = parse_timestamp(record.get(0).unwrap_or(""))?;
    let amount = parse_amount(record.get(2).unwrap_or(""));
    let balance_after = parse_amount(record.get(3).unwrap_or(""));
    let direction = parse_direction(record.get(1).unwrap_or(""), amount);

    Some(RawTransaction {
        timestamp,
        direction,
        amount,
        balance_after,
        kind: record.get(4).unwrap_or("").trim().to_string(),
        description: record.get(5).unwrap_or("").trim().to_string(),
        memo: record.get(6).unwrap_or("").trim().to_string(),
    })
}

/// Read a raw (pre-classification) ledger. Rows come back in file order,
/// which the bank guarantees to be timestamp order.
pub fn read_raw_ledger(path: impl AsRef<Path>) -> Result<Vec<RawTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path.as_ref())
        .with_context(|| format!("opening ledger {}", path.as_ref().display()))?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if let Some(txn) = record_to_raw(&record) {
            rows.push(txn);
        }
    }
    Ok(rows)
}

/// Read a classified ledger (9 columns). Rows whose category cells are
/// blank come back with an empty label so the reconciliation completeness
/// check can flag them.
pub fn read_classified_ledger(path: impl AsRef<Path>) -> Result<Vec<ClassifiedTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path.as_ref())
        .with_context(|| format!("opening classified ledger {}", path.as_ref().display()))?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let Some(txn) = record_to_raw(&record) else {
            continue;
        };
        let label = record.get(7).unwrap_or("").trim().to_string();
        let account_type = record
            .get(8)
            .unwrap_or("")
            .trim()
            .parse::<AccountType>()
            .unwrap_or(AccountType::Excluded);
        rows.push(ClassifiedTransaction::new(
            txn,
            Category::new(account_type, label),
        ));
    }
    Ok(rows)
}

/// Write a classified ledger with the 9-column layout the source sheet uses.
pub fn write_classified_ledger(
    path: impl AsRef<Path>,
    ledger: &[ClassifiedTransaction],
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;

    wtr.write_record([
        "거래일시",
        "구분",
        "거래금액",
        "거래 후 잔액",
        "거래구분",
        "내용",
        "메모",
        "계정과목",
        "계정타입",
    ])?;

    for row in ledger {
        let t = &row.txn;
        wtr.write_record([
            t.timestamp.format("%Y.%m.%d %H:%M:%S").to_string(),
            match t.direction {
                Direction::Inbound => "입금".to_string(),
                Direction::Outbound => "출금".to_string(),
            },
            t.amount.to_string(),
            t.balance_after.to_string(),
            t.kind.clone(),
            t.description.clone(),
            t.memo.clone(),
            row.category.label.clone(),
            row.category.account_type.as_str().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
