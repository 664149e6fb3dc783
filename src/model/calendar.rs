//! Calendar enumerations used to bucket expenses: months, days of the week and times of day.
//!
//! Aggregations always iterate the `ALL` constant of these types rather than the values that
//! happen to appear in the data, so that empty buckets are still reported.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A calendar month, serialized by its short name (`Jan`..`Dec`).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

serde_plain::derive_display_from_serialize!(Month);
serde_plain::derive_fromstr_from_deserialize!(Month);

const FULL_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Month {
    /// Calendar order.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Returns the month for a 1-based month number.
    pub fn from_number(n: u32) -> Option<Month> {
        let ix = usize::try_from(n).ok()?.checked_sub(1)?;
        Self::ALL.get(ix).copied()
    }

    /// The 1-based month number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn of(date: NaiveDate) -> Month {
        // chrono months are always 1..=12
        Self::from_number(date.month()).unwrap_or(Month::Jan)
    }

    /// Matches a short (`Nov`) or full (`November`) month name, ignoring case.
    pub fn from_name(name: &str) -> Option<Month> {
        let name = name.trim();
        Self::ALL.into_iter().find(|m| {
            m.to_string().eq_ignore_ascii_case(name)
                || FULL_NAMES[m.number() as usize - 1].eq_ignore_ascii_case(name)
        })
    }

    /// Formats a month label such as `Nov 2025`.
    pub fn label(self, year: i32) -> String {
        format!("{self} {year}")
    }
}

/// Parses a month label such as `Nov 2025` or `November 2025` into its year and month.
pub fn parse_month_label(label: &str) -> Option<(i32, Month)> {
    let mut parts = label.split_whitespace();
    let month = Month::from_name(parts.next()?)?;
    let year = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((year, month))
}

const TIMESTAMP_FORMATS: [&str; 3] = [
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
];
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Parses the date and time formats found in sheet exports and master files. A bare date is
/// taken to be at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .into_iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .into_iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// The day of the week an expense was logged on.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum DayOfWeek {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

serde_plain::derive_display_from_serialize!(DayOfWeek);
serde_plain::derive_fromstr_from_deserialize!(DayOfWeek);

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Matches a day name ignoring case and surrounding whitespace.
    pub fn normalize(raw: &str) -> Option<DayOfWeek> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(raw))
    }
}

/// The part of the day an expense was logged in.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum TimeOfDay {
    Morning,
    #[default]
    Afternoon,
    Evening,
    Night,
}

serde_plain::derive_display_from_serialize!(TimeOfDay);
serde_plain::derive_fromstr_from_deserialize!(TimeOfDay);

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// Matches a time of day ignoring case. `Late Night` is an older spelling of `Night`.
    pub fn normalize(raw: &str) -> Option<TimeOfDay> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("late night") {
            return Some(TimeOfDay::Night);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.to_string().eq_ignore_ascii_case(raw))
    }
}
