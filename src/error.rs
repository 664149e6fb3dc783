//! Error handling for the crate.
//!
//! All fallible paths return `anyhow` errors. When an error crosses the public boundary of a
//! command we attach an `ErrorType` as context so that the kind of failure (bad configuration, a
//! source that could not be read, the sheet API, etc.) survives alongside the message.

use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of the failures that a command can report.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or `config.json` is missing or invalid.
    Config,
    /// A CSV file or URL could not be read.
    Source,
    /// The Google Sheets API returned an error.
    Sheet,
    /// A service account access token could not be obtained.
    Auth,
    /// User supplied data was rejected.
    Validation,
    /// A local file could not be written.
    Io,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// Attaches an `ErrorType` to the error of a `Result`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let e: Error = e.into();
            e.context(error_type)
        })
    }
}

/// Finds the `ErrorType` attached to `e`, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<ErrorType>().copied()
}
