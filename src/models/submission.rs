use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::validation;

/// Raw fields as they arrive on the wire. Every key is optional, and a null
/// or non-text value counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubmissionForm {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub message: String,
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    optional_text(deserializer).map(Option::unwrap_or_default)
}

impl SubmissionForm {
    pub fn has_required(&self) -> bool {
        validation::has_required(&self.name, &self.email, &self.message)
    }
}

/// A lead, written once to the sheet and never updated.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionRecord {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl SubmissionRecord {
    /// Build a record from a form that already passed the presence check.
    /// A missing or unreadable timestamp falls back to `now`.
    pub fn from_form(form: SubmissionForm, source: &str, now: DateTime<Utc>) -> Self {
        let timestamp = match form.timestamp.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                Ok(ts) => ts.with_timezone(&Utc),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable timestamp '{raw}': {e}");
                    now
                }
            },
        };

        Self {
            name: form.name,
            email: form.email,
            message: form.message,
            timestamp,
            source: source.to_string(),
        }
    }
}
