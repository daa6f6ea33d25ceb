use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of every `POST` reply, success or failure.
///
/// Success: `{ "success": true, "message", "sheetRow", "emailSent" }`.
/// Failure: `{ "success": false, "error" }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_row: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitReply {
    pub fn accepted(sheet_row: u64, email_sent: bool) -> Self {
        Self {
            success: true,
            message: Some("Form submitted successfully".to_string()),
            sheet_row: Some(sheet_row),
            email_sent: Some(email_sent),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            sheet_row: None,
            email_sent: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReply {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
