use crate::error::{ErrorType, IntoResult};
use crate::model::{canonical_category, Amount, DayOfWeek, Month, Mood, TimeOfDay};
use crate::Result;
use anyhow::{anyhow, ensure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One expense from the history file.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    /// A month label such as `Jan 2025`.
    pub month: String,
    /// The date exactly as it appeared in the source; may be empty.
    pub date: String,
    pub amount: Amount,
    /// The normalized category name.
    pub category: String,
}

impl ExpenseRecord {
    pub fn new(
        month: impl Into<String>,
        date: impl Into<String>,
        amount: Amount,
        category: impl Into<String>,
    ) -> Self {
        Self {
            month: month.into(),
            date: date.into(),
            amount,
            category: category.into(),
        }
    }

    /// The first token of the month label, e.g. `Jan` for `Jan 2025`.
    pub fn short_month(&self) -> &str {
        self.month.split_whitespace().next().unwrap_or_default()
    }

    /// The calendar month of this record, if the label starts with a recognizable month name.
    pub fn calendar_month(&self) -> Option<Month> {
        Month::from_name(self.short_month())
    }
}

impl AsRef<ExpenseRecord> for ExpenseRecord {
    fn as_ref(&self) -> &ExpenseRecord {
        self
    }
}

/// An expense with the behavioral tags that the live sheet and the V2 history carry.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedExpenseRecord {
    #[serde(flatten)]
    pub record: ExpenseRecord,
    pub mood: Mood,
    pub time_of_day: TimeOfDay,
    pub day_of_week: DayOfWeek,
    pub week_number: u32,
}

impl ExtendedExpenseRecord {
    /// Wraps `record` with the default tags: `Planned`, `Afternoon`, `Monday`, week 1.
    pub fn with_defaults(record: ExpenseRecord) -> Self {
        Self {
            record,
            mood: Mood::default(),
            time_of_day: TimeOfDay::default(),
            day_of_week: DayOfWeek::default(),
            week_number: 1,
        }
    }
}

impl AsRef<ExpenseRecord> for ExtendedExpenseRecord {
    fn as_ref(&self) -> &ExpenseRecord {
        &self.record
    }
}

/// A validated expense, ready to be appended to the spreadsheet.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    amount: Amount,
    category: &'static str,
    mood: Mood,
}

impl NewExpense {
    /// Validates the parts of a new expense. The amount must be at least one cent and the category
    /// and mood must be known values.
    pub fn new(amount: Amount, category: &str, mood: Mood) -> Result<Self> {
        let min = Decimal::new(1, 2);
        ensure!(
            amount.value() >= min,
            "Amount must be at least $0.01, received {amount}"
        );
        let category = canonical_category(category)
            .ok_or_else(|| anyhow!("Unknown category '{category}'"))?;
        Ok(Self {
            amount,
            category,
            mood,
        })
    }

    /// Parses and validates user input.
    pub fn parse(amount: &str, category: &str, mood: &str) -> Result<Self> {
        let amount = Amount::from_str(amount).pub_result(ErrorType::Validation)?;
        let mood = Mood::normalize(mood)
            .ok_or_else(|| anyhow!("Unknown purchase type '{mood}'"))
            .pub_result(ErrorType::Validation)?;
        Self::new(amount, category, mood).pub_result(ErrorType::Validation)
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    /// The cells written to the sheet: amount, category, mood.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.amount.value().normalize().to_string(),
            self.category.to_string(),
            self.mood.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;

    #[test]
    fn test_short_month() {
        let r = ExpenseRecord::new("Jan 2025", "1/5/2025", Amount::ZERO, "Other");
        assert_eq!(r.short_month(), "Jan");
        assert_eq!(r.calendar_month(), Some(Month::Jan));

        let r = ExpenseRecord::new("", "", Amount::ZERO, "Other");
        assert_eq!(r.short_month(), "");
        assert_eq!(r.calendar_month(), None);
    }

    #[test]
    fn test_extended_serializes_flat() {
        let record = ExpenseRecord::new(
            "Feb 2026",
            "2/3/2026",
            Amount::from_str("12.5").unwrap(),
            "Eating Out",
        );
        let ext = ExtendedExpenseRecord::with_defaults(record);
        let json = serde_json::to_value(&ext).unwrap();
        assert_eq!(json["month"], "Feb 2026");
        assert_eq!(json["amount"], 12.5);
        assert_eq!(json["mood"], "Planned");
        assert_eq!(json["timeOfDay"], "Afternoon");
        assert_eq!(json["dayOfWeek"], "Monday");
        assert_eq!(json["weekNumber"], 1);
    }

    #[test]
    fn test_new_expense_valid() {
        let e = NewExpense::parse("$12.50", "eating out", "impulsive").unwrap();
        assert_eq!(e.category(), "Eating Out");
        assert_eq!(e.mood(), Mood::Impulse);
        assert_eq!(e.to_row(), vec!["12.5", "Eating Out", "Impulse"]);
    }

    #[test]
    fn test_new_expense_rejects_small_amounts() {
        for amount in ["0", "0.001", "-5"] {
            let e = NewExpense::parse(amount, "Other", "Planned").unwrap_err();
            assert_eq!(error_type(&e), Some(ErrorType::Validation), "{amount}");
        }
        assert!(NewExpense::parse("0.01", "Other", "Planned").is_ok());
    }

    #[test]
    fn test_new_expense_rejects_unknown_values() {
        let e = NewExpense::parse("5", "Food", "Planned").unwrap_err();
        assert!(format!("{e:#}").contains("Food"));
        let e = NewExpense::parse("5", "Other", "Bored").unwrap_err();
        assert!(format!("{e:#}").contains("Bored"));
        let e = NewExpense::parse("five", "Other", "Planned").unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Validation));
    }
}
