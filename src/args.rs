//! These structs provide the CLI interface for the expense CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// expense: insights into your personal spending.
///
/// Reads your expense history from CSV files and the expenses you log to a Google Sheet, and
/// prints spending analytics, behavioral insights, subscription totals and a forecast of the
/// current month as JSON.
///
/// The Google Sheet is reached with a service account. Share the sheet with the service account's
/// email address and either pass its key file to `expense init` or set
/// GOOGLE_SERVICE_ACCOUNT_EMAIL and GOOGLE_PRIVATE_KEY.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration file.
    ///
    /// This is the first command you should run. Afterwards put your CSV files in the `data`
    /// directory it creates, or edit `config.json` to point at other paths or URLs.
    Init(InitArgs),
    /// Spending analytics for the V1 history file.
    Analytics,
    /// Mood, day and time of day insights from the live sheet and the V2 history.
    Insights(InsightsArgs),
    /// Monthly and yearly totals of your subscriptions.
    Subscriptions,
    /// Log a new expense to the Google Sheet.
    Log(LogArgs),
    /// Forecast the current month's spending from the months before it.
    Forecast,
    /// Clean a raw monthly V2 export and add it to the V2 history.
    Consolidate(ConsolidateArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration and data files are held. Defaults to ~/expense-insights
    #[arg(long, env = "EXPENSE_INSIGHTS_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `expense init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL to your Google sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    sheet_url: String,

    /// The path to a downloaded service account key. This file will be copied to the default
    /// secrets location in the home directory.
    #[arg(long)]
    service_account: Option<PathBuf>,
}

impl InitArgs {
    pub fn new(sheet_url: impl Into<String>, service_account: Option<PathBuf>) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            service_account,
        }
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn service_account(&self) -> Option<&Path> {
        self.service_account.as_deref()
    }
}

/// (Not shown): Args for the `expense insights` command.
#[derive(Debug, Parser, Clone)]
pub struct InsightsArgs {
    /// Only include one month, e.g. "Jan 2026".
    #[arg(long)]
    month: Option<String>,
}

impl InsightsArgs {
    pub fn new(month: Option<String>) -> Self {
        Self { month }
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }
}

/// (Not shown): Args for the `expense log` command.
#[derive(Debug, Parser, Clone)]
pub struct LogArgs {
    /// The amount spent, e.g. 12.50 or $1,200
    #[arg(long)]
    amount: String,

    /// One of: Cooking/Groceries, Eating Out, Transportation, Projects, Utilities,
    /// Beauty/Grooming, Clothing, Travel/Adventure, Other
    #[arg(long)]
    category: String,

    /// One of: Planned, Impulse, Social, Necessary, Treat, Family
    #[arg(long, default_value = "Planned")]
    mood: String,
}

impl LogArgs {
    pub fn new(
        amount: impl Into<String>,
        category: impl Into<String>,
        mood: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            mood: mood.into(),
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn mood(&self) -> &str {
        &self.mood
    }
}

/// (Not shown): Args for the `expense consolidate` command.
#[derive(Debug, Parser, Clone)]
pub struct ConsolidateArgs {
    /// The raw monthly export to clean.
    input: PathBuf,

    /// The master file to write, defaults to the V2 history in config.json
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Append to the existing master file. Rows of the same month are replaced.
    #[arg(long)]
    append: bool,
}

impl ConsolidateArgs {
    pub fn new(input: impl Into<PathBuf>, output: Option<PathBuf>, append: bool) -> Self {
        Self {
            input: input.into(),
            output,
            append,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn append(&self) -> bool {
        self.append
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expense-insights"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or EXPENSE_INSIGHTS_HOME instead of relying on the \
                default home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("expense-insights")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
