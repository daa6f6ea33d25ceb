pub mod templates;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{NotificationConfig, SmtpConfig};
use crate::models::SubmissionRecord;

#[derive(Debug)]
pub struct NotifyError {
    pub message: String,
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for NotifyError {}

impl From<String> for NotifyError {
    fn from(s: String) -> Self {
        NotifyError { message: s }
    }
}

impl From<&str> for NotifyError {
    fn from(s: &str) -> Self {
        NotifyError {
            message: s.to_string(),
        }
    }
}

/// Outbound mail. Success only means the message was accepted for delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_html(
        &self,
        to: &str,
        sender_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotifyError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpMailer {
    async fn send_html(
        &self,
        to: &str,
        sender_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotifyError> {
        let from = format!("{sender_name} <{}>", self.from);

        let message = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| NotifyError::from(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| NotifyError::from(format!("Invalid to address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| NotifyError::from(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::from(format!("Failed to send email: {e}")))?;

        Ok(())
    }
}

/// Render and send the operator notification for a new lead.
pub async fn notify_new_lead(
    notifier: &dyn Notifier,
    config: &NotificationConfig,
    site_name: &str,
    record: &SubmissionRecord,
) -> Result<(), NotifyError> {
    let html = templates::render_new_lead(site_name, record)
        .map_err(|e| NotifyError::from(format!("Failed to render email: {e}")))?;

    notifier
        .send_html(&config.to, &config.sender_name, &config.subject, &html)
        .await
}
