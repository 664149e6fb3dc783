use crate::model::{parse_timestamp, ExpenseRecord};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::debug;

/// Identifies the same expense across sources.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct MergeKey {
    date: String,
    amount: Decimal,
    category: String,
}

impl MergeKey {
    fn of(record: &ExpenseRecord) -> Self {
        // The sheet writes `1/2/2026 13:06:12` and the master file `2026-01-02 13:06:12`, so dates
        // that parse are compared by value.
        let date = match parse_timestamp(&record.date) {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => record.date.trim().to_string(),
        };
        Self {
            date,
            amount: record.amount.value().normalize(),
            category: record.category.clone(),
        }
    }
}

/// Combines an authoritative `live` list with a `fallback` list.
///
/// Every live record is kept, in order. Fallback records follow, in order, except those with the
/// same date, amount and category as some live record.
pub fn merge<R: AsRef<ExpenseRecord>>(live: Vec<R>, fallback: Vec<R>) -> Vec<R> {
    let keys: HashSet<MergeKey> = live.iter().map(|r| MergeKey::of(r.as_ref())).collect();
    let total = live.len() + fallback.len();
    let mut merged = live;
    merged.extend(
        fallback
            .into_iter()
            .filter(|r| !keys.contains(&MergeKey::of(r.as_ref()))),
    );
    debug!(
        "Merged sources: {} fallback records suppressed",
        total - merged.len()
    );
    merged
}
