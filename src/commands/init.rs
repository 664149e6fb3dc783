use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its subdirectories and:
/// - Creates an initial `config.json` file using `sheet_url` along with default data sources
/// - Copies `service_account` into its default location in the home directory, if given
///
/// # Arguments
/// - `home` - The directory that will be the home directory, e.g. `$HOME/expense-insights`
/// - `service_account` - A downloaded service account key. Without it, the key is read from the
///   `GOOGLE_SERVICE_ACCOUNT_EMAIL` and `GOOGLE_PRIVATE_KEY` environment variables.
/// - `sheet_url` - The URL of the Google Sheet that expenses are logged to.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path, service_account: Option<&Path>, sheet_url: &str) -> Result<Out<()>> {
    let config = Config::create(home, service_account, sheet_url)
        .await
        .context("Unable to create the home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Created {}, put your CSV files in {}",
        config.config_path().display(),
        config.root().join("data").display()
    )
    .into())
}
