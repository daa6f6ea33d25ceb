pub mod transport;

use chrono::Utc;

use crate::models::SubmitReply;
use crate::validation::{self, FieldErrors};

pub use crate::validation::Field;
pub use transport::{HttpTransport, SubmissionPayload, Transport, TransportError};

pub const DEFAULT_FALLBACK_CONTACT: &str = "hello@leadgenpro.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    SuccessDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Toast-style message shown after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent.
    Invalid,
    /// A submission is in flight or the success display is showing.
    Busy,
    Accepted { sheet_row: Option<u64>, email_sent: bool },
    /// The server answered with `success: false`.
    Rejected(String),
    /// No readable reply was obtained.
    Failed(String),
}

pub struct ContactForm<T> {
    transport: T,
    fields: FormFields,
    errors: FieldErrors,
    state: FormState,
    notice: Option<Notice>,
    fallback_contact: String,
}

impl<T: Transport> ContactForm<T> {
    pub fn new(transport: T, fallback_contact: impl Into<String>) -> Self {
        Self {
            transport,
            fields: FormFields::default(),
            errors: FieldErrors::default(),
            state: FormState::Editing,
            notice: None,
            fallback_contact: fallback_contact.into(),
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// While true the host should disable the submit control and show a spinner.
    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    /// Update a field and drop its pending error. It is not re-validated until
    /// the next submit. Ignored while the success display is showing.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if self.state == FormState::SuccessDisplay {
            return;
        }

        let value = value.into();
        match field {
            Field::Name => self.fields.name = value,
            Field::Email => self.fields.email = value,
            Field::Message => self.fields.message = value,
        }
        self.errors.clear(field);
    }

    /// Re-run every rule against the current values and store the result.
    pub fn validate(&mut self) -> bool {
        self.errors = validation::validate(
            &self.fields.name,
            &self.fields.email,
            &self.fields.message,
        );
        self.errors.is_empty()
    }

    /// Validate and, if clean, enter `Submitting` and return what to send.
    pub fn begin_submit(&mut self) -> Option<SubmissionPayload> {
        if self.state != FormState::Editing || !self.validate() {
            return None;
        }

        self.state = FormState::Submitting;
        self.notice = None;

        Some(SubmissionPayload {
            name: self.fields.name.clone(),
            email: self.fields.email.clone(),
            message: self.fields.message.clone(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Apply the result of the request started by [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(&mut self, result: Result<SubmitReply, TransportError>) -> SubmitOutcome {
        if self.state != FormState::Submitting {
            return SubmitOutcome::Busy;
        }

        match result {
            Ok(reply) if reply.success => {
                self.fields = FormFields::default();
                self.state = FormState::SuccessDisplay;
                self.notice = Some(Notice {
                    kind: NoticeKind::Success,
                    title: "Message sent successfully!".to_string(),
                    description:
                        "Thank you for your interest. We'll get back to you within 24 hours."
                            .to_string(),
                });
                SubmitOutcome::Accepted {
                    sheet_row: reply.sheet_row,
                    email_sent: reply.email_sent.unwrap_or(false),
                }
            }
            Ok(reply) => {
                let error = reply
                    .error
                    .unwrap_or_else(|| "Submission was not accepted".to_string());
                tracing::warn!("Submission rejected: {error}");
                self.fail(format!(
                    "{error}. Please try again or contact us directly at {}",
                    self.fallback_contact
                ));
                SubmitOutcome::Rejected(error)
            }
            Err(e) => {
                tracing::error!("Error submitting form: {e}");
                self.fail(format!(
                    "Please try again or contact us directly at {}",
                    self.fallback_contact
                ));
                SubmitOutcome::Failed(e.message)
            }
        }
    }

    /// Full submission: validate, send, and apply the reply.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(payload) = self.begin_submit() else {
            return match self.state {
                FormState::Editing => SubmitOutcome::Invalid,
                _ => SubmitOutcome::Busy,
            };
        };

        let result = self.transport.send(&payload).await;
        self.finish_submit(result)
    }

    /// Leave the success display for an empty form.
    pub fn reset(&mut self) {
        if self.state != FormState::SuccessDisplay {
            return;
        }
        self.fields = FormFields::default();
        self.errors = FieldErrors::default();
        self.notice = None;
        self.state = FormState::Editing;
    }

    fn fail(&mut self, description: String) {
        self.state = FormState::Editing;
        self.notice = Some(Notice {
            kind: NoticeKind::Failure,
            title: "Error sending message".to_string(),
            description,
        });
    }
}
