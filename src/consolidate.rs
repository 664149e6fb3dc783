//! Cleans a raw monthly V2 export and writes it to the V2 master file.
//!
//! A monthly export looks like this:
//!
//! ```text
//! November 2025,,,,,,
//!
//! Amount,Category,Mood,Time of Day,Day of Week,Week Number,Date
//! 12.50,eating out,Impulsive,Late Night,Friday,1,11/1/2025 23:06:12
//! ```
//!
//! Every data row is validated and normalized. Rows that fail are reported with their line number
//! and never stop the run.

use crate::error::{ErrorType, IntoResult};
use crate::model::{
    canonical_category, parse_month_label, parse_timestamp, Amount, DayOfWeek, Mood, TimeOfDay,
};
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// The columns of the V2 master file.
pub const MASTER_HEADER: [&str; 8] = [
    "Month",
    "Date",
    "Amount",
    "Category",
    "Mood",
    "TimeOfDay",
    "DayOfWeek",
    "WeekNumber",
];

const MASTER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MIN_LINES: usize = 4;
const MIN_COLUMNS: usize = 7;
const CONTENT_PREVIEW: usize = 50;

/// A validated row, in master file column order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MasterRow {
    pub month: String,
    pub date: String,
    pub amount: String,
    pub category: String,
    pub mood: Option<Mood>,
    pub time_of_day: Option<TimeOfDay>,
    pub day_of_week: Option<DayOfWeek>,
    pub week_number: String,
}

/// A data row that failed validation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRow {
    /// The 1-based line number in the export.
    pub row: u64,
    /// The start of the offending line.
    pub content: String,
    /// Every problem found, joined with `; `.
    pub reason: String,
}

/// The validated rows of one monthly export.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MonthlyExport {
    pub month: String,
    pub rows: Vec<MasterRow>,
    pub dropped: Vec<DroppedRow>,
}

/// What a consolidation run did.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationReport {
    pub month: String,
    pub output: PathBuf,
    pub appended: bool,
    pub written: usize,
    /// Rows of the same month that were already in the master file and have been replaced.
    pub replaced: usize,
    pub dropped: Vec<DroppedRow>,
}

/// Validates the export at `input` and writes it to `output`.
///
/// Without `append` the master file is recreated. With `append` any rows of the same month are
/// removed from the existing master before the new rows are added to its end.
///
/// # Errors
/// - The input cannot be read or has fewer than four lines
/// - Not a single row is valid
/// - The output cannot be written
pub async fn consolidate(input: &Path, output: &Path, append: bool) -> Result<ConsolidationReport> {
    let text = utils::read(input).await.pub_result(ErrorType::Source)?;
    let export = parse_export(&text).pub_result(ErrorType::Validation)?;
    for dropped in &export.dropped {
        warn!(
            "Dropped row {}: {} ({})",
            dropped.row, dropped.reason, dropped.content
        );
    }
    if export.rows.is_empty() {
        return Err(anyhow::anyhow!(
            "No valid rows in '{}', {} rows dropped",
            input.display(),
            export.dropped.len()
        ))
        .pub_result(ErrorType::Validation);
    }

    let replaced = write_master(output, &export.month, &export.rows, append)
        .await
        .pub_result(ErrorType::Io)?;
    if replaced > 0 {
        info!("Replaced {replaced} existing rows for {}", export.month);
    }

    Ok(ConsolidationReport {
        month: export.month,
        output: output.to_path_buf(),
        appended: append,
        written: export.rows.len(),
        replaced,
        dropped: export.dropped,
    })
}

/// Validates the rows of a monthly export.
pub fn parse_export(text: &str) -> Result<MonthlyExport> {
    let lines: Vec<&str> = text.lines().collect();
    ensure!(
        lines.len() >= MIN_LINES,
        "The export has too few lines ({}), expected a month header, a blank line, column headers \
        and data",
        lines.len()
    );
    let month = header_month(lines[0]);
    debug!("Export month is {month}");

    // Line 2 is blank and line 3 holds the column headers.
    let data = lines[MIN_LINES - 1..].join("\n");
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data.as_bytes()));

    let mut rows = Vec::new();
    let mut dropped = Vec::new();
    for result in rdr.records() {
        let record = result.context("Unable to read the export")?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row = line + (MIN_LINES as u64 - 1);
        // whitespace-only lines; a row of bare commas is validated and reported
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        match validate_row(&month, &record) {
            Ok(valid) => rows.push(valid),
            Err(reason) => dropped.push(DroppedRow {
                row,
                content: preview(&record),
                reason,
            }),
        }
    }
    debug!("{} valid rows, {} dropped", rows.len(), dropped.len());
    Ok(MonthlyExport {
        month,
        rows,
        dropped,
    })
}

/// Reads the month from a header such as `November 2025,,,,` and formats it as `Nov 2025`. A
/// header that is not a month label is used as is, without its commas.
fn header_month(line: &str) -> String {
    let clean = line.replace(',', "");
    let clean = clean.trim();
    match parse_month_label(clean) {
        Some((year, month)) => month.label(year),
        None => clean.to_string(),
    }
}

fn validate_row(month: &str, record: &StringRecord) -> std::result::Result<MasterRow, String> {
    if record.len() < MIN_COLUMNS {
        return Err(format!(
            "insufficient columns ({}/{MIN_COLUMNS})",
            record.len()
        ));
    }
    let field = |ix: usize| record.get(ix).unwrap_or_default();
    let (raw_amount, raw_category, raw_mood, raw_time, raw_day, week, raw_date) = (
        field(0),
        field(1),
        field(2),
        field(3),
        field(4),
        field(5),
        field(6),
    );

    let mut errors = Vec::new();
    for (value, name) in [
        (raw_amount, "amount"),
        (raw_category, "category"),
        (raw_date, "date"),
    ] {
        if value.is_empty() {
            errors.push(format!("missing {name}"));
        }
    }

    let amount = match Amount::from_str(raw_amount) {
        Ok(a) if a.is_positive() => Some(a),
        _ if raw_amount.is_empty() => None,
        _ => {
            errors.push(format!("invalid amount: {raw_amount}"));
            None
        }
    };

    let category = canonical_category(raw_category);
    if category.is_none() && !raw_category.is_empty() {
        errors.push(format!("invalid category: {raw_category}"));
    }

    let mood = optional(raw_mood, Mood::normalize);
    if mood.is_none() && !raw_mood.is_empty() {
        errors.push(format!("invalid mood: {raw_mood}"));
    }

    let time_of_day = optional(raw_time, TimeOfDay::normalize);
    if time_of_day.is_none() && !raw_time.is_empty() {
        errors.push(format!("invalid time_of_day: {raw_time}"));
    }

    let day_of_week = optional(raw_day, DayOfWeek::normalize);
    if day_of_week.is_none() && !raw_day.is_empty() {
        errors.push(format!("invalid day_of_week: {raw_day}"));
    }

    let date = parse_timestamp(raw_date);
    if date.is_none() && !raw_date.is_empty() {
        errors.push(format!("unparseable date: {raw_date}"));
    }

    match (amount, category, date) {
        (Some(amount), Some(category), Some(date)) if errors.is_empty() => Ok(MasterRow {
            month: month.to_string(),
            date: date.format(MASTER_DATE_FORMAT).to_string(),
            amount: amount.value().normalize().to_string(),
            category: category.to_string(),
            mood,
            time_of_day,
            day_of_week,
            week_number: week.to_string(),
        }),
        _ => Err(errors.join("; ")),
    }
}

fn optional<T>(raw: &str, normalize: impl Fn(&str) -> Option<T>) -> Option<T> {
    if raw.is_empty() {
        None
    } else {
        normalize(raw)
    }
}

fn preview(record: &StringRecord) -> String {
    let line = record.iter().collect::<Vec<_>>().join(",");
    if line.chars().count() > CONTENT_PREVIEW {
        let start: String = line.chars().take(CONTENT_PREVIEW).collect();
        format!("{start}...")
    } else {
        line
    }
}

/// Writes `rows` to the master file at `path` and returns the number of existing rows of `month`
/// that were replaced.
async fn write_master(path: &Path, month: &str, rows: &[MasterRow], append: bool) -> Result<usize> {
    let mut kept: Vec<StringRecord> = Vec::new();
    let mut replaced = 0;
    if append && path.is_file() {
        let existing = utils::read(path).await?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(Cursor::new(existing.as_bytes()));
        for result in rdr.records() {
            let record = result
                .with_context(|| format!("Unable to read the master file '{}'", path.display()))?;
            if record.get(0).map(str::trim) == Some(month) {
                replaced += 1;
            } else {
                kept.push(record);
            }
        }
        debug!("Keeping {} rows of the existing master file", kept.len());
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());
    wtr.write_record(MASTER_HEADER)?;
    for record in &kept {
        wtr.write_record(record)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = match wtr.into_inner() {
        Ok(bytes) => bytes,
        Err(e) => bail!("Unable to finish writing the master file: {}", e.error()),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        utils::make_dir(parent).await?;
    }
    utils::write(path, bytes).await?;
    Ok(replaced)
}
