//! Implements the `Sheet` trait using the `sheets::Client` to interact with a Google sheet.

use crate::api::Sheet;
use crate::error::{ErrorType, IntoResult};
use crate::Result;
use anyhow::Context;
use sheets::types::{
    DateTimeRenderOption, Dimension, InsertDataOption, ValueInputOption, ValueRange,
    ValueRenderOption,
};
use sheets::ClientError;
use tracing::trace;

/// A `Sheet` backed by the Google Sheets API, authorized with a service account access token.
pub(super) struct GoogleSheet {
    spreadsheet_id: String,
    client: sheets::Client,
}

impl GoogleSheet {
    pub(super) fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        // The sheets crate wants OAuth client details, but API calls only use the access token.
        let client = sheets::Client::new(
            String::new(),
            String::new(),
            String::new(),
            access_token.into(),
            String::new(),
        );
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    async fn get(&mut self, range: &str) -> Result<Vec<Vec<String>>> {
        trace!("get {range}");
        let response = self
            .client
            .spreadsheets()
            .values_get(
                &self.spreadsheet_id,
                range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to fetch {range}"))
            .pub_result(ErrorType::Sheet)?;
        Ok(response.body.values)
    }

    async fn append(&mut self, range: &str, rows: &[Vec<String>]) -> Result<()> {
        trace!("append {} rows to {range}", rows.len());
        self.client
            .spreadsheets()
            .values_append(
                &self.spreadsheet_id,
                range,
                false,
                InsertDataOption::InsertRows,
                DateTimeRenderOption::Noop,
                ValueRenderOption::Noop,
                ValueInputOption::UserEntered,
                &value_range(range, rows),
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to append to {range}"))
            .pub_result(ErrorType::Sheet)?;
        Ok(())
    }
}

fn value_range(range: &str, rows: &[Vec<String>]) -> ValueRange {
    ValueRange {
        major_dimension: Some(Dimension::Rows),
        range: range.to_string(),
        values: rows.to_vec(),
    }
}

fn map_client_error(e: ClientError) -> anyhow::Error {
    let error_name = match &e {
        ClientError::EmptyRefreshToken => "EmptyRefreshToken".to_string(),
        ClientError::FromUtf8Error(inner) => format!("FromUtf8Error {inner}"),
        ClientError::UrlParserError(inner) => format!("UrlParserError {inner}"),
        ClientError::SerdeJsonError(inner) => format!("SerdeJsonError {inner}"),
        ClientError::ReqwestError(inner) => format!("ReqwestError {inner}"),
        ClientError::InvalidHeaderValue(inner) => format!("InvalidHeaderValue {inner}"),
        ClientError::ReqwestMiddleWareError(inner) => format!("ReqwestMiddleWareError {inner}"),
        ClientError::HttpError { .. } => "HttpError".to_string(),
        ClientError::Other(_) => "Other".to_string(),
    };
    anyhow::Error::new(e).context(error_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range() {
        let rows = vec![vec![
            "12.50".to_string(),
            "Eating Out".to_string(),
            "Planned".to_string(),
        ]];
        let body = value_range("Transactions!C:E", &rows);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["majorDimension"], "ROWS");
        assert_eq!(json["range"], "Transactions!C:E");
        assert_eq!(json["values"][0][1], "Eating Out");
    }
}
