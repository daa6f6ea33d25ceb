pub mod google;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::models::SubmissionRecord;

pub use google::GoogleSheet;
pub use memory::MemorySheet;
pub use postgres::PgSheet;

pub const HEADER: [&str; 6] = ["Timestamp", "Name", "Email", "Message", "Source", "Status"];

/// Status given to every freshly appended lead.
pub const NEW_STATUS: &str = "New";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeaderStyle {
    pub background: String,
    pub font_color: String,
    pub bold: bool,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            background: "#4285f4".to_string(),
            font_color: "#ffffff".to_string(),
            bold: true,
        }
    }
}

#[derive(Debug)]
pub struct StoreError {
    pub message: String,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<String> for StoreError {
    fn from(s: String) -> Self {
        StoreError { message: s }
    }
}

impl From<&str> for StoreError {
    fn from(s: &str) -> Self {
        StoreError {
            message: s.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError {
            message: format!("Database error: {err}"),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError {
            message: format!("Sheets request failed: {err}"),
        }
    }
}

/// A spreadsheet-like, append-only table with a mutable header row.
/// Row indexes are 1-based; the header occupies row 1.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Cells of row 1, or `None` when the sheet has no rows at all.
    async fn header_row(&self) -> Result<Option<Vec<String>>, StoreError>;

    /// Write `cells` into row 1 and apply `style` to it.
    async fn write_header(&self, cells: &[String], style: &HeaderStyle) -> Result<(), StoreError>;

    /// Append a row after the last used row and return its index.
    /// Must be atomic with respect to other appends.
    async fn append_row(&self, cells: Vec<String>) -> Result<u64, StoreError>;

    /// Fit columns `first..first + count` (1-based) to their content.
    async fn resize_columns(&self, first: usize, count: usize) -> Result<(), StoreError>;
}

/// Persist one lead: ensure the header exists, append the data row, fit columns.
pub async fn append_record(
    store: &dyn TabularStore,
    record: &SubmissionRecord,
) -> Result<u64, StoreError> {
    let header = store.header_row().await?;
    let has_header = header
        .as_ref()
        .and_then(|cells| cells.first())
        .is_some_and(|first| !first.is_empty());

    if !has_header {
        let cells: Vec<String> = HEADER.iter().map(|s| s.to_string()).collect();
        store.write_header(&cells, &HeaderStyle::default()).await?;
        tracing::info!("Wrote header row to empty sheet");
    }

    let row = record_row(record);
    let width = row.len();
    let index = store.append_row(row).await?;
    store.resize_columns(1, width).await?;

    Ok(index)
}

pub fn record_row(record: &SubmissionRecord) -> Vec<String> {
    vec![
        record.timestamp.to_rfc3339(),
        record.name.clone(),
        record.email.clone(),
        record.message.clone(),
        record.source.clone(),
        NEW_STATUS.to_string(),
    ]
}

/// Widest cell, in characters, of each column in `first..first + count` (1-based).
pub fn column_widths<'a>(
    rows: impl IntoIterator<Item = &'a [String]>,
    first: usize,
    count: usize,
) -> Vec<usize> {
    let start = first.saturating_sub(1);
    let mut widths = vec![0; count];

    for row in rows {
        for (offset, width) in widths.iter_mut().enumerate() {
            if let Some(cell) = row.get(start + offset) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    widths
}

/// Open the backend selected in configuration.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn TabularStore>, StoreError> {
    let store: Arc<dyn TabularStore> = match config {
        StoreConfig::Memory => {
            tracing::warn!("Using in-memory sheet; leads are lost on restart");
            Arc::new(MemorySheet::new())
        }
        StoreConfig::Postgres {
            database_url,
            sheet_id,
        } => Arc::new(PgSheet::connect(database_url, sheet_id).await?),
        StoreConfig::Google(google) => Arc::new(GoogleSheet::new(google.clone())?),
    };
    Ok(store)
}
