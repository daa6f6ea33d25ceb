use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Minimum message length in characters, measured after trimming.
pub const MIN_MESSAGE_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Message,
}

/// Per-field error messages. A field with `None` passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Message => self.message.as_deref(),
        }
    }

    pub fn clear(&mut self, field: Field) {
        *self.slot(field) = None;
    }

    fn set(&mut self, field: Field, message: &str) {
        *self.slot(field) = Some(message.to_string());
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Full client-side rule set, evaluated before anything is sent.
pub fn validate(name: &str, email: &str, message: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if name.trim().is_empty() {
        errors.set(Field::Name, "Name is required");
    }

    if email.trim().is_empty() {
        errors.set(Field::Email, "Email is required");
    } else if !is_valid_email(email) {
        errors.set(Field::Email, "Please enter a valid email address");
    }

    let trimmed = message.trim();
    if trimmed.is_empty() {
        errors.set(Field::Message, "Message is required");
    } else if trimmed.chars().count() < MIN_MESSAGE_LEN {
        errors.set(
            Field::Message,
            "Message must be at least 10 characters long",
        );
    }

    errors
}

/// Server-side presence rule: every required field must be non-blank.
pub fn has_required(name: &str, email: &str, message: &str) -> bool {
    [name, email, message].iter().all(|v| !v.trim().is_empty())
}
