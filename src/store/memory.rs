use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{HeaderStyle, StoreError, TabularStore, column_widths};

/// Process-local sheet. Backs local development and the test suite.
#[derive(Default)]
pub struct MemorySheet {
    inner: Mutex<SheetData>,
}

#[derive(Default)]
struct SheetData {
    rows: Vec<Vec<String>>,
    header_style: Option<HeaderStyle>,
    column_widths: Vec<usize>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lock().map(|data| data.rows.clone()).unwrap_or_default()
    }

    pub fn header_style(&self) -> Option<HeaderStyle> {
        self.lock().ok().and_then(|data| data.header_style.clone())
    }

    pub fn column_widths(&self) -> Vec<usize> {
        self.lock()
            .map(|data| data.column_widths.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, SheetData>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::from("Sheet lock poisoned"))
    }
}

#[async_trait]
impl TabularStore for MemorySheet {
    async fn header_row(&self) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.lock()?.rows.first().cloned())
    }

    async fn write_header(&self, cells: &[String], style: &HeaderStyle) -> Result<(), StoreError> {
        let mut data = self.lock()?;
        match data.rows.first_mut() {
            Some(first) => *first = cells.to_vec(),
            None => data.rows.push(cells.to_vec()),
        }
        data.header_style = Some(style.clone());
        Ok(())
    }

    async fn append_row(&self, cells: Vec<String>) -> Result<u64, StoreError> {
        let mut data = self.lock()?;
        data.rows.push(cells);
        Ok(data.rows.len() as u64)
    }

    async fn resize_columns(&self, first: usize, count: usize) -> Result<(), StoreError> {
        let mut data = self.lock()?;
        let widths = column_widths(data.rows.iter().map(Vec::as_slice), first, count);

        let end = first.saturating_sub(1) + count;
        if data.column_widths.len() < end {
            data.column_widths.resize(end, 0);
        }
        data.column_widths[first.saturating_sub(1)..end].copy_from_slice(&widths);
        Ok(())
    }
}
