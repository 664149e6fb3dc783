//! Access to the data that lives outside of the process: the Google Sheet that expenses are logged
//! to, and the CSV files (local or remote) that hold past expenses and subscriptions.

mod google_sheet;
mod ledger;
mod service_account;
mod source;
mod test_sheet;

use crate::error::{ErrorType, IntoResult};
use crate::model::{ExtendedExpenseRecord, NewExpense};
use crate::{Config, Result};
use google_sheet::GoogleSheet;
use ledger::SheetLedger;
pub use source::Source;
pub use test_sheet::{TestSheet, TestSheetState};
use tracing::debug;

/// The data region of the transactions tab: Amount, Category, Mood, TimeOfDay, DayOfWeek,
/// WeekNumber, Date. Rows 1 through 4 hold the sheet's own headers.
pub(crate) const TRANSACTIONS_READ_RANGE: &str = "Transactions!C5:I";

/// The columns that a new expense is written to: Amount, Category, Mood. The remaining columns are
/// filled by the sheet.
pub(crate) const TRANSACTIONS_APPEND_RANGE: &str = "Transactions!C:E";

/// The name of the tab holding expenses.
pub(crate) const TRANSACTIONS: &str = "Transactions";

const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Set this to a non-empty value to use the in-memory `TestSheet` instead of Google Sheets.
pub const TEST_MODE_ENV: &str = "EXPENSE_INSIGHTS_TEST_MODE";

/// Reads and appends rows of cells in A1 notation ranges, e.g. `Transactions!C5:I`.
#[async_trait::async_trait]
pub trait Sheet: Send {
    /// Get the formatted values in `range`. Trailing empty cells and rows are not returned.
    async fn get(&mut self, range: &str) -> Result<Vec<Vec<String>>>;

    /// Append `rows` after the last row of data in `range`.
    async fn append(&mut self, range: &str, rows: &[Vec<String>]) -> Result<()>;
}

/// The expense log kept in the spreadsheet.
#[async_trait::async_trait]
pub trait Ledger: Send {
    /// Reads every expense from the transactions tab. Rows that cannot be parsed are skipped.
    async fn fetch_rows(&mut self) -> Result<Vec<ExtendedExpenseRecord>>;

    /// Adds a new expense to the end of the transactions tab.
    async fn append(&mut self, expense: &NewExpense) -> Result<()>;
}

/// Whether we talk to Google or to an in-memory stand-in.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Google,
    Test,
}

impl Mode {
    /// `Mode::Test` when `EXPENSE_INSIGHTS_TEST_MODE` is set and non-empty, otherwise
    /// `Mode::Google`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// Creates the `Sheet` for `mode`. In `Mode::Google` this obtains an access token for the service
/// account first.
pub async fn sheet(config: &Config, mode: Mode) -> Result<Box<dyn Sheet>> {
    debug!("Creating a sheet client in {mode:?} mode");
    match mode {
        Mode::Google => {
            let token = service_account::access_token(config)
                .await
                .pub_result(ErrorType::Auth)?;
            Ok(Box::new(GoogleSheet::new(config.spreadsheet_id(), token)))
        }
        Mode::Test => Ok(Box::new(TestSheet::new(config.spreadsheet_id()))),
    }
}

/// Creates the `Ledger` backed by the sheet for `mode`.
pub async fn ledger(config: &Config, mode: Mode) -> Result<Box<dyn Ledger>> {
    let sheet = sheet(config, mode).await?;
    Ok(Box::new(SheetLedger::new(sheet)))
}
