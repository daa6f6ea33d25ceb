use std::sync::Arc;

use chrono::Utc;

use crate::config::Config;
use crate::email::{self, Notifier};
use crate::models::{SubmissionForm, SubmissionRecord};
use crate::store::{self, StoreError, TabularStore};

/// Validates, persists and announces one submission at a time.
/// Holds no state between submissions beyond its collaborators.
pub struct SubmissionHandler {
    config: Arc<Config>,
    store: Arc<dyn TabularStore>,
    notifier: Option<Arc<dyn Notifier>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submitted {
    pub sheet_row: u64,
    pub email_sent: bool,
}

#[derive(Debug)]
pub enum SubmitError {
    MissingFields,
    Persistence(StoreError),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::MissingFields => write!(f, "Missing required fields"),
            SubmitError::Persistence(err) => write!(f, "Failed to save data to sheet: {err}"),
        }
    }
}

impl SubmissionHandler {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn TabularStore>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            config,
            store,
            notifier,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn submit(&self, form: SubmissionForm) -> Result<Submitted, SubmitError> {
        if !form.has_required() {
            return Err(SubmitError::MissingFields);
        }

        let record = SubmissionRecord::from_form(form, &self.config.source, Utc::now());

        let sheet_row = self.persist(&record).await?;
        let email_sent = self.notify(&record).await;

        Ok(Submitted {
            sheet_row,
            email_sent,
        })
    }

    /// Append the record to the sheet. Failure aborts the submission.
    pub async fn persist(&self, record: &SubmissionRecord) -> Result<u64, SubmitError> {
        match store::append_record(self.store.as_ref(), record).await {
            Ok(row) => {
                tracing::info!("Saved lead from {} to sheet row {row}", record.email);
                Ok(row)
            }
            Err(e) => {
                tracing::error!("Error saving to sheet: {e}");
                Err(SubmitError::Persistence(e))
            }
        }
    }

    /// Send the operator notification. Failure is logged and reported as `false`,
    /// never propagated: the lead is already stored.
    pub async fn notify(&self, record: &SubmissionRecord) -> bool {
        let Some(notifier) = &self.notifier else {
            tracing::warn!("No mailer configured, skipping notification");
            return false;
        };

        match email::notify_new_lead(
            notifier.as_ref(),
            &self.config.notification,
            &self.config.site_name,
            record,
        )
        .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error sending email: {e}");
                false
            }
        }
    }
}
