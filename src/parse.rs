//! Turns raw expense data into typed records.
//!
//! Three shapes of input are understood:
//! - the history CSV (`Month,Date,Amount,Category`),
//! - the V2 history CSV, which adds `Mood,TimeOfDay,DayOfWeek,WeekNumber`,
//! - rows fetched from the live sheet, columns C..I of the Transactions tab.
//!
//! Parsing never fails. Each row either becomes a record or is skipped, and skipped rows are only
//! visible in `trace` logs.

use crate::model::{
    normalize_category, Amount, DayOfWeek, ExpenseRecord, ExtendedExpenseRecord, Month, Mood,
    TimeOfDay, OTHER,
};
use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use std::io::Cursor;
use std::str::FromStr;
use tracing::{debug, trace};

const V2_FIELD_COUNT: usize = 8;

/// Parses the history CSV. The first line is a header and is always skipped.
pub fn parse_expenses(text: &str) -> Vec<ExpenseRecord> {
    let records: Vec<ExpenseRecord> = csv_records(text)
        .into_iter()
        .filter_map(|(line, row)| {
            let parsed = expense_from_row(&row);
            if parsed.is_none() {
                trace!("Skipping history row {line}: {row:?}");
            }
            parsed
        })
        .collect();
    debug!("Parsed {} history records", records.len());
    records
}

/// Parses the V2 history CSV. Rows with fewer than 8 fields are skipped and blank or
/// unrecognized tags fall back to their defaults.
pub fn parse_extended_expenses(text: &str) -> Vec<ExtendedExpenseRecord> {
    let records: Vec<ExtendedExpenseRecord> = csv_records(text)
        .into_iter()
        .filter_map(|(line, row)| {
            let parsed = extended_from_row(&row);
            if parsed.is_none() {
                trace!("Skipping V2 row {line}: {row:?}");
            }
            parsed
        })
        .collect();
    debug!("Parsed {} V2 records", records.len());
    records
}

/// Parses rows read from the live sheet. The cells are, in order: Amount, Category, Mood,
/// TimeOfDay, DayOfWeek, WeekNumber, Date. The month is derived from the date, which is
/// formatted `M/D/YYYY` and may be followed by a time. Rows without a usable amount or date are
/// skipped.
pub fn parse_sheet_rows<S, R>(rows: impl IntoIterator<Item = R>) -> Vec<ExtendedExpenseRecord>
where
    S: AsRef<str>,
    R: AsRef<[S]>,
{
    let records: Vec<ExtendedExpenseRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(ix, row)| {
            let cells: Vec<&str> = row.as_ref().iter().map(|c| c.as_ref().trim()).collect();
            let parsed = extended_from_sheet_cells(&cells);
            if parsed.is_none() {
                trace!("Skipping sheet row {}: {cells:?}", ix + 1);
            }
            parsed
        })
        .collect();
    debug!("Parsed {} sheet records", records.len());
    records
}

/// Parses the date portion of a sheet date such as `1/5/2025` or `1/5/2025 13:06:12`.
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(date, "%m/%d/%Y").ok()
}

/// Reads `text` as CSV, skipping the header. Rows that the reader cannot decode are dropped.
/// Returns each record with its 1-based line number.
fn csv_records(text: &str) -> Vec<(u64, StringRecord)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut rows = Vec::new();
    for result in rdr.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                rows.push((line, record));
            }
            Err(e) => trace!("Skipping unreadable CSV row: {e}"),
        }
    }
    rows
}

fn field(row: &StringRecord, ix: usize) -> &str {
    row.get(ix).unwrap_or_default()
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn expense_from_row(row: &StringRecord) -> Option<ExpenseRecord> {
    let month = non_empty(field(row, 0))?;
    let amount = non_empty(field(row, 2))?;
    let category = non_empty(field(row, 3))?;
    let amount = Amount::from_str(amount).ok()?;
    Some(ExpenseRecord::new(
        month,
        field(row, 1),
        amount,
        normalize_category(category),
    ))
}

fn extended_from_row(row: &StringRecord) -> Option<ExtendedExpenseRecord> {
    if row.len() < V2_FIELD_COUNT {
        return None;
    }
    let record = expense_from_row(row)?;
    Some(with_tags(
        record,
        field(row, 4),
        field(row, 5),
        field(row, 6),
        field(row, 7),
    ))
}

fn extended_from_sheet_cells(cells: &[&str]) -> Option<ExtendedExpenseRecord> {
    let cell = |ix: usize| cells.get(ix).copied().unwrap_or_default();
    let amount = Amount::from_str(non_empty(cell(0))?).ok()?;
    let date_text = non_empty(cell(6))?;
    let date = parse_sheet_date(date_text)?;

    let category = match normalize_category(cell(1)) {
        c if c.is_empty() => OTHER.to_string(),
        c => c,
    };
    let month = Month::of(date).label(date.year());
    let record = ExpenseRecord::new(month, date_text, amount, category);
    Some(with_tags(record, cell(2), cell(3), cell(4), cell(5)))
}

fn with_tags(
    record: ExpenseRecord,
    mood: &str,
    time_of_day: &str,
    day_of_week: &str,
    week_number: &str,
) -> ExtendedExpenseRecord {
    ExtendedExpenseRecord {
        record,
        mood: Mood::normalize(mood).unwrap_or_default(),
        time_of_day: TimeOfDay::normalize(time_of_day).unwrap_or_default(),
        day_of_week: DayOfWeek::normalize(day_of_week).unwrap_or_default(),
        week_number: week_number.parse().unwrap_or(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const HISTORY: &str = "Month,Date,Amount,Category
Jan 2025,1/5/2025,100.00,Eating Out
Jan 2025,1/10/2025,50.00,EAting Out

Feb 2025,2/1/2025,25.00,Other
";

    #[test]
    fn test_parse_expenses_example() {
        let records = parse_expenses(HISTORY);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].month, "Jan 2025");
        assert_eq!(records[0].date, "1/5/2025");
        assert_eq!(records[0].amount.value(), d("100"));
        assert_eq!(records[1].category, "Eating Out");
        assert_eq!(records[2].category, "Other");
    }

    #[test]
    fn test_parse_expenses_drops_incomplete_rows() {
        let text = "Month,Date,Amount,Category
,1/1/2025,5.00,Other
Jan 2025,1/1/2025,,Other
Jan 2025,1/1/2025,5.00,
Jan 2025,,7.00,Personal
Jan 2025,1/2/2025,abc,Other
Jan 2025,1/3/2025,$1,200.00,Other
";
        let records = parse_expenses(text);
        // The unquoted thousands separator splits the amount, so the category becomes "200.00".
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "");
        assert_eq!(records[0].category, "Beauty/Grooming");
        assert_eq!(records[1].amount.value(), d("1"));
    }

    #[test]
    fn test_parse_expenses_quoted_amount() {
        let text = concat!(
            "Month,Date,Amount,Category\r\n",
            "  Mar 2025 , 3/1/2025 ,\"$1,200.50\", personal \r\n",
        );
        let records = parse_expenses(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, "Mar 2025");
        assert_eq!(records[0].amount.value(), d("1200.50"));
        assert_eq!(records[0].category, "personal");
    }

    #[test]
    fn test_parse_expenses_empty_input() {
        assert!(parse_expenses("").is_empty());
        assert!(parse_expenses("Month,Date,Amount,Category\n").is_empty());
    }

    #[test]
    fn test_parse_extended() {
        let text = "Month,Date,Amount,Category,Mood,TimeOfDay,DayOfWeek,WeekNumber
Jan 2026,2026-01-02 06:50:48,12.00,Eating Out,Impulse,Morning,Friday,1
Jan 2026,2026-01-03 20:00:00,8.00,eating out,,,,
Jan 2026,2026-01-04 20:00:00,9.00,Other,Bored,Dusk,Someday,x
Jan 2026,2026-01-05,3.00,Other,Planned,Morning,Monday
";
        let records = parse_extended_expenses(text);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].mood, Mood::Impulse);
        assert_eq!(records[0].time_of_day, TimeOfDay::Morning);
        assert_eq!(records[0].day_of_week, DayOfWeek::Friday);
        assert_eq!(records[0].week_number, 1);

        for r in &records[1..] {
            assert_eq!(r.mood, Mood::Planned);
            assert_eq!(r.time_of_day, TimeOfDay::Afternoon);
            assert_eq!(r.day_of_week, DayOfWeek::Monday);
            assert_eq!(r.week_number, 1);
        }
        assert_eq!(records[1].record.category, "Eating Out");
    }

    #[test]
    fn test_parse_sheet_rows() {
        let rows = vec![
            vec![
                "$12.50",
                "Eating Out",
                "Social",
                "Evening",
                "Friday",
                "2",
                "3/7/2026 19:30:00",
            ],
            vec!["8", "", "", "", "", "", "3/8/2026"],
            vec!["", "Other", "Planned", "Morning", "Monday", "1", "3/9/2026"],
            vec!["4.00", "Other", "Planned", "Morning", "Monday", "1", ""],
            vec!["4.00", "Other", "Planned", "Morning", "Monday", "1", "not a date"],
            vec!["oops", "Other", "Planned", "Morning", "Monday", "1", "3/9/2026"],
            vec!["5.00", "Other"],
        ];
        let records = parse_sheet_rows(&rows);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.record.month, "Mar 2026");
        assert_eq!(first.record.date, "3/7/2026 19:30:00");
        assert_eq!(first.record.amount.value(), d("12.50"));
        assert_eq!(first.mood, Mood::Social);
        assert_eq!(first.time_of_day, TimeOfDay::Evening);
        assert_eq!(first.day_of_week, DayOfWeek::Friday);
        assert_eq!(first.week_number, 2);

        let second = &records[1];
        assert_eq!(second.record.category, "Other");
        assert_eq!(second.mood, Mood::Planned);
    }

    #[test]
    fn test_parse_sheet_date() {
        assert_eq!(
            parse_sheet_date("12/31/2025 23:59:59"),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
        assert_eq!(parse_sheet_date("1/5/2025"), NaiveDate::from_ymd_opt(2025, 1, 5));
        assert_eq!(parse_sheet_date("13/1/2025"), None);
        assert_eq!(parse_sheet_date("2025-01-05"), None);
        assert_eq!(parse_sheet_date(""), None);
    }
}
