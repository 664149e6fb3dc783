//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSE_INSIGHTS_HOME/config.json` and names the Google
//! Sheet that expenses are logged to, the three CSV data sources, and the service account key used
//! to reach the sheet.

use crate::api::Source;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const APP_NAME: &str = "expense-insights";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const DATA: &str = "data";
const SERVICE_ACCOUNT_JSON: &str = "service_account.json";
const CONFIG_JSON: &str = "config.json";
const HISTORY_CSV: &str = "V1_master_finances-2025.csv";
const INSIGHTS_CSV: &str = "V2_master_finances-2026.csv";
const SUBSCRIPTIONS_CSV: &str = "subscriptions_master.csv";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSE_INSIGHTS_HOME` and from there it loads `config.json`. It resolves the
/// data sources and secrets paths relative to the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    spreadsheet_id: String,
}

impl Config {
    /// Creates the home directory, its subdirectories and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/expense-insights`
    /// - `service_account_file` - A downloaded service account key. When given it is copied to its
    ///   default location in the secrets directory.
    /// - `sheet_url` - The URL of the Google Sheet that expenses are logged to.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or the sheet URL is not a Google Sheets URL.
    pub async fn create(
        dir: impl Into<PathBuf>,
        service_account_file: Option<&Path>,
        sheet_url: &str,
    ) -> Result<Self> {
        let spreadsheet_id = extract_spreadsheet_id(sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;
        utils::make_dir(root.join(DATA)).await?;

        if let Some(key) = service_account_file {
            let destination = secrets.join(SERVICE_ACCOUNT_JSON);
            utils::copy(key, &destination).await?;
            info!("Copied the service account key to {}", destination.display());
        }

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            sheet_url: sheet_url.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            spreadsheet_id,
        })
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load and validate the config file
    /// - validate that the secrets directory exists
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The home directory is missing, run `expense init` first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        let config = Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
            spreadsheet_id,
        };
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn sheet_url(&self) -> &str {
        &self.config_file.sheet_url
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// The V1 history CSV.
    pub fn history_source(&self) -> Result<Source> {
        Source::resolve(&self.root, &self.config_file.history_source)
    }

    /// The V2 history CSV, also the output of `consolidate`.
    pub fn insights_source(&self) -> Result<Source> {
        Source::resolve(&self.root, &self.config_file.insights_source)
    }

    pub fn subscriptions_source(&self) -> Result<Source> {
        Source::resolve(&self.root, &self.config_file.subscriptions_source)
    }

    /// Returns the stored `service_account_path` if it is absolute, otherwise resolves the relative
    /// path.
    pub fn service_account_path(&self) -> PathBuf {
        let p = self.config_file.service_account_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expense-insights",
///   "config_version": 1,
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
///   "history_source": "data/V1_master_finances-2025.csv",
///   "insights_source": "data/V2_master_finances-2026.csv",
///   "subscriptions_source": "https://example.com/subscriptions_master.csv",
///   "service_account_path": ".secrets/service_account.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expense-insights"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL of the Google Sheet that expenses are logged to
    sheet_url: String,

    /// Path (relative to the home directory, or absolute) or URL of the V1 history CSV
    history_source: String,

    /// Path or URL of the V2 history CSV
    insights_source: String,

    /// Path or URL of the subscriptions CSV
    subscriptions_source: String,

    /// Path to the service account key (optional, relative to the home directory or absolute)
    /// Defaults to $EXPENSE_INSIGHTS_HOME/.secrets/service_account.json if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    service_account_path: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let data = |name: &str| format!("{DATA}/{name}");
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: String::new(),
            history_source: data(HISTORY_CSV),
            insights_source: data(INSIGHTS_CSV),
            subscriptions_source: data(SUBSCRIPTIONS_CSV),
            service_account_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the service account key path.
    ///
    /// If None, defaults to $EXPENSE_INSIGHTS_HOME/.secrets/service_account.json
    pub fn service_account_path(&self) -> PathBuf {
        self.service_account_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(SERVICE_ACCOUNT_JSON))
    }
}

/// Extracts the spreadsheet ID from a Google Sheets URL
///
/// # Arguments
/// * `url` - The Google Sheets URL (e.g., "https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...")
///
/// # Returns
/// The spreadsheet ID or an error if the URL format is invalid. Returns an empty string if the URL
/// is empty.
fn extract_spreadsheet_id(url: &str) -> Result<&str> {
    if url.is_empty() {
        return Ok(url);
    }

    // URL format: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...
    // or: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID?foo=bar
    let parts: Vec<&str> = url.split('/').collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "d" && i + 1 < parts.len() {
            let id_part = parts[i + 1];
            let id = id_part
                .split('?')
                .next()
                .unwrap_or(id_part)
                .split('#')
                .next()
                .unwrap_or(id_part);
            return Ok(id);
        }
    }
    Err(anyhow::anyhow!(
        "Invalid Google Sheets URL format. Expected: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    ))
}
