//! Assembles parsed expense records into the analytics handed to the presentation layer.
//!
//! `Analytics` covers the history file. `Insights` adds the behavioral breakdowns (mood, day of
//! week, time of day) available for V2 and live sheet records. Both are plain data and serialize
//! to camelCase JSON.

pub mod aggregate;
mod forecast;
mod merge;

use crate::model::{ExpenseRecord, ExtendedExpenseRecord};
use aggregate::{
    CategoryByMonth, CategoryTotal, DayTotal, HeatmapCell, MonthlyChange, MonthlyTotal,
    MoodByMonth, MoodTotal, TimeOfDayTotal,
};
pub use forecast::{CategoryForecast, Forecast, MoodShare};
pub use merge::merge;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spending aggregates over a list of records.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics<R = ExpenseRecord> {
    pub entries: Vec<R>,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub category_totals: Vec<CategoryTotal>,
    pub category_by_month: Vec<CategoryByMonth>,
    pub monthly_changes: Vec<MonthlyChange>,
    pub all_categories: Vec<String>,
    pub grand_total: Decimal,
    pub month_count: usize,
}

impl<R: AsRef<ExpenseRecord>> Analytics<R> {
    pub fn new(entries: Vec<R>) -> Self {
        let monthly_totals = aggregate::by_month(&entries);
        let all_categories = aggregate::all_categories(&entries);
        Self {
            category_totals: aggregate::by_category(&entries),
            category_by_month: aggregate::category_by_month(&entries, &all_categories),
            monthly_changes: aggregate::month_over_month(&monthly_totals),
            grand_total: aggregate::grand_total(&entries),
            month_count: aggregate::month_count(&entries),
            monthly_totals,
            all_categories,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `Analytics` plus mood, day and time-of-day breakdowns and the headline insights.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    #[serde(flatten)]
    pub analytics: Analytics<ExtendedExpenseRecord>,
    pub mood_totals: Vec<MoodTotal>,
    pub mood_by_month: Vec<MoodByMonth>,
    pub day_totals: Vec<DayTotal>,
    pub time_of_day_totals: Vec<TimeOfDayTotal>,
    pub heatmap: Vec<HeatmapCell>,
    /// The busiest day and time slot, `None` without spending.
    pub peak_spending: Option<HeatmapCell>,
    /// The mood with the highest total, `None` without spending.
    pub top_mood: Option<MoodTotal>,
}

impl Insights {
    pub fn new(entries: Vec<ExtendedExpenseRecord>) -> Self {
        let mood_totals = aggregate::by_mood(&entries);
        let heatmap = aggregate::heatmap(&entries);
        Self {
            mood_by_month: aggregate::mood_by_month(&entries),
            day_totals: aggregate::by_day_of_week(&entries),
            time_of_day_totals: aggregate::by_time_of_day(&entries),
            peak_spending: aggregate::peak_spending(&heatmap),
            top_mood: mood_totals.first().cloned(),
            analytics: Analytics::new(entries),
            mood_totals,
            heatmap,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.analytics.is_empty()
    }
}
