use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{HeaderStyle, StoreError, TabularStore};
use crate::config::GoogleSheetConfig;

/// Google Sheets v4 REST backend. Authenticates with a pre-issued OAuth bearer token.
pub struct GoogleSheet {
    client: reqwest::Client,
    config: GoogleSheetConfig,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: AppendUpdates,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: String,
}

impl GoogleSheet {
    pub fn new(config: GoogleSheetConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, tail: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| StoreError::from(format!("Invalid Sheets API base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::from("Sheets API base cannot be a base URL"))?
            .pop_if_empty()
            .push("spreadsheets")
            .extend(tail);
        Ok(url)
    }

    fn values_url(&self, range: &str) -> Result<Url, StoreError> {
        let range = format!("{}!{range}", self.config.tab);
        self.url(&[self.config.spreadsheet_id.as_str(), "values", range.as_str()])
    }

    async fn batch_update(&self, requests: Value) -> Result<(), StoreError> {
        let action = format!("{}:batchUpdate", self.config.spreadsheet_id);
        self.client
            .post(self.url(&[action.as_str()])?)
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "requests": requests }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl TabularStore for GoogleSheet {
    async fn header_row(&self) -> Result<Option<Vec<String>>, StoreError> {
        let range: ValueRange = self
            .client
            .get(self.values_url("A1:1")?)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(range.values.into_iter().next().map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect()
        }))
    }

    async fn write_header(&self, cells: &[String], style: &HeaderStyle) -> Result<(), StoreError> {
        let mut url = self.values_url("A1")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        self.client
            .put(url)
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "values": [cells] }))
            .send()
            .await?
            .error_for_status()?;

        self.batch_update(json!([{
            "repeatCell": {
                "range": {
                    "sheetId": self.config.gid,
                    "startRowIndex": 0,
                    "endRowIndex": 1,
                    "startColumnIndex": 0,
                    "endColumnIndex": cells.len(),
                },
                "cell": {
                    "userEnteredFormat": {
                        "backgroundColor": color_json(&style.background)?,
                        "textFormat": {
                            "foregroundColor": color_json(&style.font_color)?,
                            "bold": style.bold,
                        },
                    },
                },
                "fields": "userEnteredFormat(backgroundColor,textFormat)",
            }
        }]))
        .await
    }

    async fn append_row(&self, cells: Vec<String>) -> Result<u64, StoreError> {
        let mut url = self.values_url("A1:append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let response: AppendResponse = self
            .client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "values": [cells] }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        row_from_range(&response.updates.updated_range).ok_or_else(|| {
            StoreError::from(format!(
                "Unexpected updated range: {}",
                response.updates.updated_range
            ))
        })
    }

    async fn resize_columns(&self, first: usize, count: usize) -> Result<(), StoreError> {
        let start = first.saturating_sub(1);
        self.batch_update(json!([{
            "autoResizeDimensions": {
                "dimensions": {
                    "sheetId": self.config.gid,
                    "dimension": "COLUMNS",
                    "startIndex": start,
                    "endIndex": start + count,
                }
            }
        }]))
        .await
    }
}

/// Row number of the first cell in an A1 range such as `Sheet1!A5:F5`.
pub fn row_from_range(range: &str) -> Option<u64> {
    let cells = range.rsplit_once('!').map_or(range, |(_, cells)| cells);
    let start = cells.split(':').next()?;
    let digits: String = start
        .trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == '$')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// `#rrggbb` to the Sheets API colour object.
fn color_json(hex: &str) -> Result<Value, StoreError> {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| -> Result<f64, StoreError> {
        hex.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .map(|v| f64::from(v) / 255.0)
            .ok_or_else(|| StoreError::from(format!("Invalid colour: #{hex}")))
    };
    if hex.len() != 6 {
        return Err(StoreError::from(format!("Invalid colour: #{hex}")));
    }
    Ok(json!({ "red": channel(0)?, "green": channel(2)?, "blue": channel(4)? }))
}
