//! Projects the current month's spending from the months before it.
//!
//! The latest month present in the data is treated as the current month, and every other month
//! is history. The pace compares what has been spent so far against what an average month would
//! have spent by today.

use crate::analytics::aggregate::{percentage, round_money};
use crate::model::{parse_month_label, ExtendedExpenseRecord, Mood};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Average days per month used to turn a monthly average into a daily one.
const DAYS_PER_MONTH: Decimal = Decimal::from_parts(304, 0, 0, false, 1);

const TOP_CATEGORIES: usize = 3;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// Label of the month being forecast, e.g. `Feb 2026`.
    pub current_month: String,
    pub historical_monthly_average: Decimal,
    pub current_spend: Decimal,
    pub expected_spend_by_now: Decimal,
    /// Positive when spending is ahead of the historical pace.
    pub pace_difference: Decimal,
    pub is_overspending: bool,
    pub end_of_month_estimate: Decimal,
    pub category_forecasts: Vec<CategoryForecast>,
    pub top_mood: Option<MoodShare>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForecast {
    pub category: String,
    /// Average spend per historical month.
    pub average: Decimal,
}

/// The most frequent mood in the history and its share of entries.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodShare {
    pub mood: Mood,
    pub percentage: Decimal,
}

impl Forecast {
    /// Builds a forecast as of `today`. Returns `None` when there are no records.
    pub fn new(records: &[ExtendedExpenseRecord], today: NaiveDate) -> Option<Self> {
        let current_month = latest_month(records)?;
        let (current, past): (Vec<&ExtendedExpenseRecord>, Vec<&ExtendedExpenseRecord>) = records
            .iter()
            .partition(|r| r.record.month == current_month);

        let past_months: HashSet<&str> = past.iter().map(|r| r.record.month.as_str()).collect();
        let completed = Decimal::from(past_months.len());
        let past_total: Decimal = past.iter().map(|r| r.record.amount.value()).sum();
        let monthly_average = if completed.is_zero() {
            Decimal::ZERO
        } else {
            past_total / completed
        };
        let daily_average = monthly_average / DAYS_PER_MONTH;

        let current_spend: Decimal = current.iter().map(|r| r.record.amount.value()).sum();
        let day = today.day();
        let expected = daily_average * Decimal::from(day);
        let pace_difference = current_spend - expected;

        let days_remaining = days_in_month(today).saturating_sub(day);
        let current_daily_pace = current_spend / Decimal::from(day.max(1));
        let end_of_month_estimate =
            current_spend + current_daily_pace * Decimal::from(days_remaining);

        Some(Self {
            current_month,
            historical_monthly_average: round_money(monthly_average),
            current_spend: round_money(current_spend),
            expected_spend_by_now: round_money(expected),
            pace_difference: round_money(pace_difference),
            is_overspending: pace_difference > Decimal::ZERO,
            end_of_month_estimate: round_money(end_of_month_estimate),
            category_forecasts: category_forecasts(&past, completed),
            top_mood: top_mood(&past),
        })
    }
}

/// The label of the most recent month. Labels that cannot be read as a month sort first.
fn latest_month(records: &[ExtendedExpenseRecord]) -> Option<String> {
    records
        .iter()
        .map(|r| r.record.month.as_str())
        .max_by_key(|label| parse_month_label(label).map(|(year, month)| (year, month.number())))
        .map(str::to_string)
}

fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

fn category_forecasts(
    past: &[&ExtendedExpenseRecord],
    completed: Decimal,
) -> Vec<CategoryForecast> {
    if completed.is_zero() {
        return Vec::new();
    }
    let mut order: Vec<(&str, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in past {
        let category = r.record.category.as_str();
        let ix = *index.entry(category).or_insert_with(|| {
            order.push((category, Decimal::ZERO));
            order.len() - 1
        });
        order[ix].1 += r.record.amount.value();
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(TOP_CATEGORIES)
        .map(|(category, total)| CategoryForecast {
            category: category.to_string(),
            average: round_money(total / completed),
        })
        .collect()
}

fn top_mood(past: &[&ExtendedExpenseRecord]) -> Option<MoodShare> {
    let mut counts: Vec<(Mood, u32)> = Vec::new();
    for r in past {
        match counts.iter_mut().find(|(mood, _)| *mood == r.mood) {
            Some((_, count)) => *count += 1,
            None => counts.push((r.mood, 1)),
        }
    }
    // first seen wins a tie
    let (mood, count) = counts
        .into_iter()
        .fold(None, |best: Option<(Mood, u32)>, candidate| match best {
            Some(b) if b.1 >= candidate.1 => Some(b),
            _ => Some(candidate),
        })?;
    Some(MoodShare {
        mood,
        percentage: percentage(Decimal::from(count), Decimal::from(past.len())),
    })
}
