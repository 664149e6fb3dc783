//! Parses the subscriptions file and totals the recurring costs.
//!
//! The file has the columns `Name,Status,Category,Cost,Cycle,BillDate,Bank,Notes`. Notes are
//! free text and often contain unquoted commas, so every field after `Bank` is joined back
//! together. Unknown values are replaced by defaults rather than rejected.

use crate::analytics::aggregate::round_money;
use crate::model::{Amount, Bank, BillingCycle, Subscription, SubscriptionStatus, OTHER};
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::str::FromStr;
use tracing::{debug, trace};

const MIN_FIELDS: usize = 5;
const NOTES_START: usize = 7;

/// How many subscriptions are in each status, regardless of exclusions.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub active: usize,
    pub canceled: usize,
    pub done: usize,
}

/// The parsed subscriptions and their totals.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriptions {
    pub subscriptions: Vec<Subscription>,
    /// Sum of active, non-excluded monthly subscriptions.
    pub monthly_total: Decimal,
    /// Twelve times the monthly total plus active, non-excluded yearly subscriptions.
    pub yearly_total: Decimal,
    pub counts: StatusCounts,
}

impl Subscriptions {
    pub fn new(subscriptions: Vec<Subscription>) -> Self {
        let mut monthly = Decimal::ZERO;
        let mut yearly_only = Decimal::ZERO;
        let mut counts = StatusCounts::default();

        for sub in &subscriptions {
            match sub.status {
                SubscriptionStatus::Active => counts.active += 1,
                SubscriptionStatus::Canceled => counts.canceled += 1,
                SubscriptionStatus::Done => counts.done += 1,
            }
            if !sub.counts_toward_totals() {
                continue;
            }
            if sub.cycle.is_yearly() {
                yearly_only += sub.cost.value();
            } else {
                monthly += sub.cost.value();
            }
        }

        Self {
            monthly_total: round_money(monthly),
            yearly_total: round_money(monthly * Decimal::from(12) + yearly_only),
            counts,
            subscriptions,
        }
    }

    /// Parses `text` and computes the totals.
    pub fn parse(text: &str) -> Self {
        Self::new(parse_subscriptions(text))
    }
}

/// Parses the subscriptions file. The header is skipped, and rows with fewer than five fields are
/// dropped.
pub fn parse_subscriptions(text: &str) -> Vec<Subscription> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut subscriptions = Vec::new();
    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                trace!("Skipping unreadable subscription row: {e}");
                continue;
            }
        };
        match subscription_from_row(&row) {
            Some(sub) => subscriptions.push(sub),
            None => trace!("Skipping short subscription row: {row:?}"),
        }
    }
    debug!("Parsed {} subscriptions", subscriptions.len());
    subscriptions
}

fn subscription_from_row(row: &StringRecord) -> Option<Subscription> {
    if row.len() < MIN_FIELDS {
        return None;
    }
    let field = |ix: usize| row.get(ix).unwrap_or_default().trim();

    let category = match field(2) {
        "" => OTHER.to_string(),
        c => c.to_string(),
    };
    let notes = row
        .iter()
        .skip(NOTES_START)
        .collect::<Vec<_>>()
        .join(",")
        .trim()
        .to_string();

    Some(Subscription {
        name: field(0).to_string(),
        status: SubscriptionStatus::from_str(field(1)).unwrap_or_default(),
        category,
        cost: Amount::from_str(field(3)).unwrap_or(Amount::ZERO),
        cycle: BillingCycle::from_str(field(4)).unwrap_or_default(),
        bill_date: leading_number(field(5)),
        bank: Bank::from_str(field(6)).ok(),
        notes: if notes.is_empty() { None } else { Some(notes) },
    })
}

/// Reads the digits at the start of `s`, so that `15th` gives 15.
fn leading_number(s: &str) -> Option<u32> {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(ix, _)| ix)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}
