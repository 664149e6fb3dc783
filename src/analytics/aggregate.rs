//! Pure aggregations over expense records.
//!
//! Every function here is total: empty input yields zero-valued structures, and percentages are
//! 0 rather than a division error when the grand total is 0. Where a fixed enumeration exists
//! (months, moods, days, times of day) it is the iteration basis, so buckets without data still
//! appear in the output.

use crate::model::{DayOfWeek, ExpenseRecord, ExtendedExpenseRecord, Month, Mood, TimeOfDay};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub month: Month,
    pub total: Decimal,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    /// Share of the grand total, 0..=100 with one decimal.
    pub percentage: Decimal,
}

/// One month of the category-by-month matrix. Serializes flat, e.g.
/// `{"month": "Jan", "Eating Out": 150.0, "Other": 0.0}`. A category that is itself named
/// `month` is written under `CATEGORY_MONTH_KEY` so the object never repeats a key.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct CategoryByMonth {
    pub month: Month,
    #[serde(flatten)]
    pub totals: BTreeMap<String, Decimal>,
}

pub const CATEGORY_MONTH_KEY: &str = "month (category)";

impl Serialize for CategoryByMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.totals.len() + 1))?;
        map.serialize_entry("month", &self.month)?;
        for (category, total) in &self.totals {
            let key = if category == "month" {
                CATEGORY_MONTH_KEY
            } else {
                category.as_str()
            };
            map.serialize_entry(key, total)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyChange {
    pub month: Month,
    pub previous_month: Month,
    pub previous_total: Decimal,
    pub current_total: Decimal,
    pub percent_change: Decimal,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTotal {
    pub mood: Mood,
    pub total: Decimal,
    pub percentage: Decimal,
}

/// One month of the mood-by-month matrix. Serializes flat like `CategoryByMonth`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MoodByMonth {
    pub month: Month,
    #[serde(flatten)]
    pub totals: BTreeMap<Mood, Decimal>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    pub day: DayOfWeek,
    pub total: Decimal,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDayTotal {
    pub time_of_day: TimeOfDay,
    pub total: Decimal,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub day: DayOfWeek,
    pub time_of_day: TimeOfDay,
    pub total: Decimal,
    /// `total` relative to the largest cell, in `[0, 1]`.
    pub intensity: Decimal,
}

/// Rounds a money value to cents.
pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / whole * 100` with one decimal, or 0 when `whole` is 0 or the result does not fit in a
/// `Decimal`. Refunds can leave `whole` arbitrarily close to 0.
pub(crate) fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or_default()
}

fn amount<R: AsRef<ExpenseRecord>>(r: &R) -> Decimal {
    r.as_ref().amount.value()
}

/// Totals per calendar month, always 12 entries from `Jan` to `Dec`. Records from different years
/// that share a month name land in the same bucket.
pub fn by_month<R: AsRef<ExpenseRecord>>(records: &[R]) -> Vec<MonthlyTotal> {
    let mut totals: HashMap<Month, Decimal> = HashMap::new();
    for r in records {
        if let Some(month) = r.as_ref().calendar_month() {
            *totals.entry(month).or_default() += amount(r);
        }
    }
    Month::ALL
        .into_iter()
        .map(|month| MonthlyTotal {
            month,
            total: round_money(totals.get(&month).copied().unwrap_or_default()),
        })
        .collect()
}

/// Totals per category with their share of the grand total, largest first. Categories with equal
/// totals keep the order in which they first appeared.
pub fn by_category<R: AsRef<ExpenseRecord>>(records: &[R]) -> Vec<CategoryTotal> {
    let mut order: Vec<(&str, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grand_total = Decimal::ZERO;

    for r in records {
        let category = r.as_ref().category.as_str();
        let ix = *index.entry(category).or_insert_with(|| {
            order.push((category, Decimal::ZERO));
            order.len() - 1
        });
        order[ix].1 += amount(r);
        grand_total += amount(r);
    }

    let mut totals: Vec<CategoryTotal> = order
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total: round_money(total),
            percentage: percentage(total, grand_total),
        })
        .collect();
    // sort_by is stable
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// The distinct categories present in `records`, sorted.
pub fn all_categories<R: AsRef<ExpenseRecord>>(records: &[R]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.as_ref().category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One row per month that has data, in calendar order, holding a total for every category in
/// `categories` (0 when the month has none).
pub fn category_by_month<R: AsRef<ExpenseRecord>>(
    records: &[R],
    categories: &[String],
) -> Vec<CategoryByMonth> {
    let mut months: HashMap<Month, HashMap<&str, Decimal>> = HashMap::new();
    for r in records {
        let record = r.as_ref();
        if let Some(month) = record.calendar_month() {
            *months
                .entry(month)
                .or_default()
                .entry(record.category.as_str())
                .or_default() += record.amount.value();
        }
    }

    Month::ALL
        .into_iter()
        .filter_map(|month| {
            let by_category = months.get(&month)?;
            let totals = categories
                .iter()
                .map(|c| {
                    let total = by_category.get(c.as_str()).copied().unwrap_or_default();
                    (c.clone(), round_money(total))
                })
                .collect();
            Some(CategoryByMonth { month, totals })
        })
        .collect()
}

/// Percent change between consecutive months that have a nonzero total. The first such month has
/// nothing to compare against and is not included.
pub fn month_over_month(monthly_totals: &[MonthlyTotal]) -> Vec<MonthlyChange> {
    let with_data: Vec<&MonthlyTotal> = monthly_totals
        .iter()
        .filter(|m| m.total > Decimal::ZERO)
        .collect();

    with_data
        .windows(2)
        .map(|pair| {
            let (previous, current) = (pair[0], pair[1]);
            MonthlyChange {
                month: current.month,
                previous_month: previous.month,
                previous_total: previous.total,
                current_total: current.total,
                percent_change: percentage(current.total - previous.total, previous.total),
            }
        })
        .collect()
}

/// Totals per mood with their share of the grand total. Moods without spending are left out and
/// the rest are ordered largest first, ties in canonical mood order.
pub fn by_mood(records: &[ExtendedExpenseRecord]) -> Vec<MoodTotal> {
    let mut totals: HashMap<Mood, Decimal> = HashMap::new();
    let mut grand_total = Decimal::ZERO;
    for r in records {
        *totals.entry(r.mood).or_default() += amount(r);
        grand_total += amount(r);
    }

    let mut moods: Vec<MoodTotal> = Mood::ALL
        .into_iter()
        .map(|mood| {
            let total = totals.get(&mood).copied().unwrap_or_default();
            MoodTotal {
                mood,
                total: round_money(total),
                percentage: percentage(total, grand_total),
            }
        })
        .filter(|m| !m.total.is_zero())
        .collect();
    moods.sort_by(|a, b| b.total.cmp(&a.total));
    moods
}

/// One row per month that has data, in calendar order, with a total for every mood.
pub fn mood_by_month(records: &[ExtendedExpenseRecord]) -> Vec<MoodByMonth> {
    let mut months: HashMap<Month, HashMap<Mood, Decimal>> = HashMap::new();
    for r in records {
        if let Some(month) = r.record.calendar_month() {
            *months.entry(month).or_default().entry(r.mood).or_default() += amount(r);
        }
    }

    Month::ALL
        .into_iter()
        .filter_map(|month| {
            let by_mood = months.get(&month)?;
            let totals = Mood::ALL
                .into_iter()
                .map(|mood| {
                    let total = by_mood.get(&mood).copied().unwrap_or_default();
                    (mood, round_money(total))
                })
                .collect();
            Some(MoodByMonth { month, totals })
        })
        .collect()
}

/// Totals for all seven days, Monday first, including days without spending.
pub fn by_day_of_week(records: &[ExtendedExpenseRecord]) -> Vec<DayTotal> {
    let mut totals: HashMap<DayOfWeek, Decimal> = HashMap::new();
    for r in records {
        *totals.entry(r.day_of_week).or_default() += amount(r);
    }
    DayOfWeek::ALL
        .into_iter()
        .map(|day| DayTotal {
            day,
            total: round_money(totals.get(&day).copied().unwrap_or_default()),
        })
        .collect()
}

/// Totals for all four times of day, including those without spending.
pub fn by_time_of_day(records: &[ExtendedExpenseRecord]) -> Vec<TimeOfDayTotal> {
    let mut totals: HashMap<TimeOfDay, Decimal> = HashMap::new();
    for r in records {
        *totals.entry(r.time_of_day).or_default() += amount(r);
    }
    TimeOfDay::ALL
        .into_iter()
        .map(|time_of_day| TimeOfDayTotal {
            time_of_day,
            total: round_money(totals.get(&time_of_day).copied().unwrap_or_default()),
        })
        .collect()
}

/// The 28 day × time-of-day cells, day-major. Intensity is each cell's total divided by the
/// largest cell total, and 0 everywhere when there is no spending at all.
pub fn heatmap(records: &[ExtendedExpenseRecord]) -> Vec<HeatmapCell> {
    let mut totals: HashMap<(DayOfWeek, TimeOfDay), Decimal> = HashMap::new();
    for r in records {
        *totals.entry((r.day_of_week, r.time_of_day)).or_default() += amount(r);
    }

    let cells: Vec<(DayOfWeek, TimeOfDay, Decimal)> = DayOfWeek::ALL
        .into_iter()
        .flat_map(|day| TimeOfDay::ALL.into_iter().map(move |time| (day, time)))
        .map(|(day, time)| {
            let total = totals.get(&(day, time)).copied().unwrap_or_default();
            (day, time, total)
        })
        .collect();
    let max = cells
        .iter()
        .map(|(_, _, total)| *total)
        .max()
        .unwrap_or_default();

    cells
        .into_iter()
        .map(|(day, time_of_day, total)| HeatmapCell {
            day,
            time_of_day,
            total: round_money(total),
            intensity: if max > Decimal::ZERO {
                total.checked_div(max).unwrap_or_default()
            } else {
                Decimal::ZERO
            },
        })
        .collect()
}

/// The heatmap cell with the largest total, or `None` when no cell has spending. The earliest
/// cell wins a tie.
pub fn peak_spending(cells: &[HeatmapCell]) -> Option<HeatmapCell> {
    let mut peak: Option<&HeatmapCell> = None;
    for cell in cells.iter().filter(|c| c.total > Decimal::ZERO) {
        match peak {
            Some(p) if p.total >= cell.total => {}
            _ => peak = Some(cell),
        }
    }
    peak.cloned()
}

/// Sum of all amounts, rounded to cents.
pub fn grand_total<R: AsRef<ExpenseRecord>>(records: &[R]) -> Decimal {
    round_money(records.iter().map(amount).sum())
}

/// Number of distinct months among `records`. Labels are bucketed like `by_month`, so `Jan 2025`
/// and `january 2026` count once. Unrecognized labels count by their first token.
pub fn month_count<R: AsRef<ExpenseRecord>>(records: &[R]) -> usize {
    records
        .iter()
        .map(|r| {
            let record = r.as_ref();
            record.calendar_month().ok_or_else(|| record.short_month())
        })
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rec(month: &str, date: &str, amount: &str, category: &str) -> ExpenseRecord {
        ExpenseRecord::new(month, date, Amount::from_str(amount).unwrap(), category)
    }

    fn ext(
        month: &str,
        amount: &str,
        mood: Mood,
        day: DayOfWeek,
        time: TimeOfDay,
    ) -> ExtendedExpenseRecord {
        ExtendedExpenseRecord {
            record: rec(month, "", amount, "Other"),
            mood,
            time_of_day: time,
            day_of_week: day,
            week_number: 1,
        }
    }

    fn example() -> Vec<ExpenseRecord> {
        vec![
            rec("Jan 2025", "1/5/2025", "100.00", "Eating Out"),
            rec("Jan 2025", "1/10/2025", "50.00", "Eating Out"),
            rec("Feb 2025", "2/1/2025", "25.00", "Other"),
        ]
    }

    #[test]
    fn test_example_by_month() {
        let months = by_month(&example());
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, Month::Jan);
        assert_eq!(months[0].total, d("150.00"));
        assert_eq!(months[1].total, d("25.00"));
        assert!(months[2..].iter().all(|m| m.total.is_zero()));
        let order: Vec<Month> = months.iter().map(|m| m.month).collect();
        assert_eq!(order, Month::ALL.to_vec());
    }

    #[test]
    fn test_by_month_ignores_input_order() {
        let mut records = example();
        records.reverse();
        assert_eq!(by_month(&records), by_month(&example()));
    }

    #[test]
    fn test_example_by_category() {
        let categories = by_category(&example());
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "Eating Out");
        assert_eq!(categories[0].total, d("150"));
        assert_eq!(categories[0].percentage, d("85.7"));
        assert_eq!(categories[1].category, "Other");
        assert_eq!(categories[1].total, d("25"));
        assert_eq!(categories[1].percentage, d("14.3"));
    }

    #[test]
    fn test_example_month_over_month() {
        let changes = month_over_month(&by_month(&example()));
        assert_eq!(changes.len(), 1);
        let change = &changes[0];
        assert_eq!(change.month, Month::Feb);
        assert_eq!(change.previous_month, Month::Jan);
        assert_eq!(change.previous_total, d("150"));
        assert_eq!(change.current_total, d("25"));
        assert_eq!(change.percent_change, d("-83.3"));
    }

    #[test]
    fn test_month_over_month_skips_gaps() {
        let records = vec![
            rec("Jan 2025", "", "10", "Other"),
            rec("Mar 2025", "", "20", "Other"),
            rec("Jun 2025", "", "5", "Other"),
        ];
        let changes = month_over_month(&by_month(&records));
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].previous_month, Month::Jan);
        assert_eq!(changes[0].month, Month::Mar);
        assert_eq!(changes[0].percent_change, d("100"));
        assert_eq!(changes[1].month, Month::Jun);
        assert_eq!(changes[1].percent_change, d("-75"));
        assert!(changes.iter().all(|c| c.month != Month::Jan));
    }

    #[test]
    fn test_month_count_matches_month_buckets() {
        let records = vec![
            rec("January 2025", "", "10", "Other"),
            rec("Jan 2025", "", "10", "Other"),
            rec("feb 2025", "", "5", "Other"),
            rec("Smarch 2025", "", "1", "Other"),
        ];
        let buckets = by_month(&records)
            .iter()
            .filter(|m| !m.total.is_zero())
            .count();
        assert_eq!(buckets, 2);
        assert_eq!(month_count(&records), 3);
    }

    #[test]
    fn test_percentage_that_does_not_fit_is_zero() {
        assert_eq!(percentage(d("1000000000000"), d("0.0000000000000001")), Decimal::ZERO);
        assert_eq!(percentage(d("5"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage(d("1"), d("3")), d("33.3"));
    }

    #[test]
    fn test_refunds_near_zero_total_do_not_panic() {
        let records = vec![
            rec("Jan 2025", "", "1000000000000", "A"),
            rec("Jan 2025", "", "-999999999999.9999999999999999", "B"),
        ];
        let categories = by_category(&records);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].percentage, Decimal::ZERO);
        assert_eq!(grand_total(&records), Decimal::ZERO);
    }

    #[test]
    fn test_category_sum_matches_grand_total() {
        let records = vec![
            rec("Jan 2025", "", "0.333", "A"),
            rec("Jan 2025", "", "0.333", "B"),
            rec("Feb 2025", "", "0.334", "C"),
            rec("Feb 2025", "", "19.995", "A"),
        ];
        let categories = by_category(&records);
        let sum: Decimal = categories.iter().map(|c| c.total).sum();
        let tolerance = d("0.01") * Decimal::from(categories.len());
        assert!((sum - grand_total(&records)).abs() <= tolerance);

        let pct: Decimal = categories.iter().map(|c| c.percentage).sum();
        assert!((pct - Decimal::ONE_HUNDRED).abs() <= d("0.5"), "{pct}");
    }

    #[test]
    fn test_category_ties_keep_input_order() {
        let records = vec![
            rec("Jan 2025", "", "5", "Zeta"),
            rec("Jan 2025", "", "5", "Alpha"),
            rec("Jan 2025", "", "9", "Mid"),
        ];
        let names: Vec<String> = by_category(&records)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(names, vec!["Mid", "Zeta", "Alpha"]);
    }

    #[test]
    fn test_zero_grand_total() {
        let records = vec![rec("Jan 2025", "", "0", "Other")];
        let categories = by_category(&records);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].percentage, Decimal::ZERO);
        assert!(month_over_month(&by_month(&records)).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<ExtendedExpenseRecord> = Vec::new();
        assert_eq!(by_month(&records).len(), 12);
        assert!(by_category(&records).is_empty());
        assert!(all_categories(&records).is_empty());
        assert!(category_by_month(&records, &[]).is_empty());
        assert!(by_mood(&records).is_empty());
        assert!(mood_by_month(&records).is_empty());
        assert_eq!(by_day_of_week(&records).len(), 7);
        assert_eq!(by_time_of_day(&records).len(), 4);
        let cells = heatmap(&records);
        assert_eq!(cells.len(), 28);
        assert!(cells.iter().all(|c| c.intensity.is_zero()));
        assert_eq!(peak_spending(&cells), None);
        assert_eq!(grand_total(&records), Decimal::ZERO);
        assert_eq!(month_count(&records), 0);
    }

    #[test]
    fn test_all_categories_and_matrix() {
        let records = vec![
            rec("Feb 2025", "", "3", "Other"),
            rec("Jan 2025", "", "1.005", "Eating Out"),
            rec("Jan 2025", "", "2", "Other"),
        ];
        let categories = all_categories(&records);
        assert_eq!(categories, vec!["Eating Out", "Other"]);

        let matrix = category_by_month(&records, &categories);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0].month, Month::Jan);
        assert_eq!(matrix[0].totals["Eating Out"], d("1.01"));
        assert_eq!(matrix[0].totals["Other"], d("2"));
        assert_eq!(matrix[1].month, Month::Feb);
        assert_eq!(matrix[1].totals["Eating Out"], Decimal::ZERO);

        let json = serde_json::to_value(&matrix[1]).unwrap();
        assert_eq!(json["month"], "Feb");
        assert_eq!(json["Other"], 3.0);
        assert_eq!(json["Eating Out"], 0.0);
    }

    #[test]
    fn test_category_named_month_keeps_keys_unique() {
        let records = vec![
            rec("Jan 2025", "", "4", "month"),
            rec("Jan 2025", "", "1", "Other"),
        ];
        let matrix = category_by_month(&records, &all_categories(&records));
        let json = serde_json::to_string(&matrix[0]).unwrap();
        assert_eq!(json.matches("\"month\"").count(), 1, "{json}");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["month"], "Jan");
        assert_eq!(value[CATEGORY_MONTH_KEY], 4.0);
        assert_eq!(value["Other"], 1.0);
    }

    #[test]
    fn test_month_count() {
        assert_eq!(month_count(&example()), 2);
        let records = vec![
            rec("Jan 2025", "", "1", "Other"),
            rec("Jan 2026", "", "1", "Other"),
        ];
        assert_eq!(month_count(&records), 1);
    }

    #[test]
    fn test_by_mood() {
        let records = vec![
            ext("Jan 2026", "10", Mood::Impulse, DayOfWeek::Monday, TimeOfDay::Morning),
            ext("Jan 2026", "30", Mood::Social, DayOfWeek::Friday, TimeOfDay::Night),
            ext("Feb 2026", "10", Mood::Impulse, DayOfWeek::Friday, TimeOfDay::Night),
        ];
        let moods = by_mood(&records);
        assert_eq!(moods.len(), 2);
        assert_eq!(moods[0].mood, Mood::Social);
        assert_eq!(moods[0].percentage, d("60"));
        assert_eq!(moods[1].mood, Mood::Impulse);
        assert_eq!(moods[1].total, d("20"));
        assert_eq!(moods[1].percentage, d("40"));

        let by_month = mood_by_month(&records);
        assert_eq!(by_month.len(), 2);
        assert_eq!(by_month[0].totals.len(), Mood::ALL.len());
        assert_eq!(by_month[0].totals[&Mood::Social], d("30"));
        assert_eq!(by_month[1].totals[&Mood::Social], Decimal::ZERO);
        let json = serde_json::to_value(&by_month[1]).unwrap();
        assert_eq!(json["Impulse"], 10.0);
    }

    #[test]
    fn test_day_and_time() {
        let records = vec![
            ext("Jan 2026", "10", Mood::Planned, DayOfWeek::Sunday, TimeOfDay::Morning),
            ext("Jan 2026", "5", Mood::Planned, DayOfWeek::Sunday, TimeOfDay::Night),
        ];
        let days = by_day_of_week(&records);
        assert_eq!(days[0].day, DayOfWeek::Monday);
        assert_eq!(days[6].day, DayOfWeek::Sunday);
        assert_eq!(days[6].total, d("15"));
        assert!(days[..6].iter().all(|d| d.total.is_zero()));

        let times = by_time_of_day(&records);
        assert_eq!(times.len(), 4);
        assert_eq!(times[0].total, d("10"));
        assert_eq!(times[1].total, Decimal::ZERO);
        assert_eq!(times[3].total, d("5"));
    }

    #[test]
    fn test_heatmap_intensity() {
        let records = vec![
            ext("Jan 2026", "10", Mood::Planned, DayOfWeek::Tuesday, TimeOfDay::Evening),
            ext("Jan 2026", "30", Mood::Planned, DayOfWeek::Tuesday, TimeOfDay::Evening),
            ext("Jan 2026", "20", Mood::Planned, DayOfWeek::Saturday, TimeOfDay::Morning),
        ];
        let cells = heatmap(&records);
        assert_eq!(cells.len(), 28);
        assert_eq!(cells[0].day, DayOfWeek::Monday);
        assert_eq!(cells[0].time_of_day, TimeOfDay::Morning);
        assert_eq!(cells[3].time_of_day, TimeOfDay::Night);
        assert_eq!(cells[4].day, DayOfWeek::Tuesday);

        let tuesday_evening = &cells[4 + 2];
        assert_eq!(tuesday_evening.total, d("40"));
        assert_eq!(tuesday_evening.intensity, Decimal::ONE);
        let saturday_morning = &cells[5 * 4];
        assert_eq!(saturday_morning.intensity, d("0.5"));
        assert!(cells
            .iter()
            .all(|c| c.intensity >= Decimal::ZERO && c.intensity <= Decimal::ONE));

        let peak = peak_spending(&cells).unwrap();
        assert_eq!(peak.day, DayOfWeek::Tuesday);
        assert_eq!(peak.time_of_day, TimeOfDay::Evening);
    }

    #[test]
    fn test_peak_tie_goes_to_first_cell() {
        let records = vec![
            ext("Jan 2026", "10", Mood::Planned, DayOfWeek::Friday, TimeOfDay::Night),
            ext("Jan 2026", "10", Mood::Planned, DayOfWeek::Monday, TimeOfDay::Night),
        ];
        let peak = peak_spending(&heatmap(&records)).unwrap();
        assert_eq!(peak.day, DayOfWeek::Monday);
    }

    #[test]
    fn test_grand_total_rounds() {
        let records = vec![
            rec("Jan 2025", "", "0.105", "Other"),
            rec("Jan 2025", "", "0.1", "Other"),
        ];
        assert_eq!(grand_total(&records), d("0.21"));
    }
}
