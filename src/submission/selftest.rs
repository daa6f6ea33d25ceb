use chrono::{DateTime, Utc};

use crate::models::SubmissionRecord;

use super::pipeline::SubmissionHandler;

pub fn test_record(now: DateTime<Utc>) -> SubmissionRecord {
    SubmissionRecord {
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        message: "This is a test message to verify the setup is working correctly.".to_string(),
        timestamp: now,
        source: "Test Setup".to_string(),
    }
}

/// Operator check: persist and announce a canned record, reporting to the log.
/// Passes when the record was stored; a failed notification is only reported.
pub async fn run(handler: &SubmissionHandler) -> bool {
    tracing::info!("Testing contact form setup...");

    let record = test_record(Utc::now());

    match handler.persist(&record).await {
        Ok(row) => tracing::info!("Sheet access working: row {row}"),
        Err(e) => {
            tracing::error!("Setup test failed: {e}");
            return false;
        }
    }

    if handler.notify(&record).await {
        tracing::info!(
            "Email notification working: sent to {}",
            handler.config().notification.to
        );
    } else {
        tracing::warn!("Email notification was not sent");
    }

    tracing::info!("Setup test completed successfully");
    true
}
