//! Full-sheet overwrite through the Google Sheets v4 values API.
//!
//! An upload clears the worksheet, then writes header and rows starting at
//! `A1`. Authentication is a bearer access token supplied by the caller.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::Serialize;

use crate::error::ExportError;
use crate::table::Table;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

/// Client for one spreadsheet.
pub struct SheetsClient {
    client: Client,
    access_token: String,
    spreadsheet_id: String,
    base_url: Url,
}

impl SheetsClient {
    /// Creates a client against `base_url`, normally
    /// `https://sheets.googleapis.com/`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ExportError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        access_token: &str,
        spreadsheet_id: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ExportError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            spreadsheet_id: spreadsheet_id.to_owned(),
            base_url,
        })
    }

    /// Replaces the content of `worksheet` with `table`.
    ///
    /// # Errors
    ///
    /// - [`ExportError::SheetsApi`] if either call answers with a non-2xx
    ///   status; a failed clear skips the write.
    /// - [`ExportError::Http`] on network failure.
    pub async fn overwrite(&self, worksheet: &str, table: &Table) -> Result<(), ExportError> {
        let clear_url = self.values_url(&format!("{worksheet}:clear"))?;
        let response = self
            .client
            .post(clear_url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::check_status(response).await?;

        let range = format!("{worksheet}!A1");
        let mut update_url = self.values_url(&range)?;
        update_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "RAW");
        let body = ValueRange {
            range: &range,
            major_dimension: "ROWS",
            values: table.to_values(),
        };
        let response = self
            .client
            .put(update_url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;

        tracing::info!(
            spreadsheet_id = %self.spreadsheet_id,
            worksheet,
            rows = table.rows().len(),
            "spreadsheet overwritten"
        );
        Ok(())
    }

    /// `v4/spreadsheets/{id}/values/{range}`, with `range` as a single
    /// percent-encoded path segment.
    fn values_url(&self, range: &str) -> Result<Url, ExportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ExportError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "base URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    async fn check_status(response: Response) -> Result<(), ExportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ExportError::SheetsApi {
            status: status.as_u16(),
            body,
        })
    }
}
