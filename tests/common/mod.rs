#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use leadform::config::{Config, NotificationConfig, RateLimitConfig, StoreConfig};
use leadform::email::{Notifier, NotifyError};
use leadform::store::{HeaderStyle, MemorySheet, StoreError, TabularStore};

/// A running test server backed by an in-memory sheet.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub sheet: Arc<MemorySheet>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn contact_url(&self) -> String {
        self.url("/api/contact")
    }

    /// Submit form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.contact_url())
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Data rows only, header excluded.
    pub fn data_rows(&self) -> Vec<Vec<String>> {
        self.sheet.rows().into_iter().skip(1).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub sender_name: String,
    pub subject: String,
    pub html: String,
}

/// Records every message instead of delivering it. Optionally fails every send.
#[derive(Default)]
pub struct RecordingMailer {
    pub fail: bool,
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingMailer {
    async fn send_html(
        &self,
        to: &str,
        sender_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            sender_name: sender_name.to_string(),
            subject: subject.to_string(),
            html: html_body.to_string(),
        });
        if self.fail {
            return Err(NotifyError::from("Service invoked too many times for one day: email"));
        }
        Ok(())
    }
}

/// A sheet that rejects every operation.
pub struct FailingSheet;

#[async_trait]
impl TabularStore for FailingSheet {
    async fn header_row(&self) -> Result<Option<Vec<String>>, StoreError> {
        Err(StoreError::from("Spreadsheet not found"))
    }

    async fn write_header(&self, _: &[String], _: &HeaderStyle) -> Result<(), StoreError> {
        Err(StoreError::from("Spreadsheet not found"))
    }

    async fn append_row(&self, _: Vec<String>) -> Result<u64, StoreError> {
        Err(StoreError::from("Spreadsheet not found"))
    }

    async fn resize_columns(&self, _: usize, _: usize) -> Result<(), StoreError> {
        Err(StoreError::from("Spreadsheet not found"))
    }
}

/// A working in-memory sheet whose column fitting always fails.
#[derive(Default)]
pub struct UnresizableSheet {
    pub inner: MemorySheet,
}

#[async_trait]
impl TabularStore for UnresizableSheet {
    async fn header_row(&self) -> Result<Option<Vec<String>>, StoreError> {
        self.inner.header_row().await
    }

    async fn write_header(&self, cells: &[String], style: &HeaderStyle) -> Result<(), StoreError> {
        self.inner.write_header(cells, style).await
    }

    async fn append_row(&self, cells: Vec<String>) -> Result<u64, StoreError> {
        self.inner.append_row(cells).await
    }

    async fn resize_columns(&self, _: usize, _: usize) -> Result<(), StoreError> {
        Err(StoreError::from("Column resize rejected"))
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 65_536,
        trusted_proxies: vec![],
        allowed_origins: vec![
            "https://your-domain.com".to_string(),
            "http://localhost:3000".to_string(),
        ],
        log_level: "warn".to_string(),
        site_name: "LeadGen Pro".to_string(),
        source: "LeadGen Pro Website".to_string(),
        notification: NotificationConfig {
            to: "owner@leadgenpro.com".to_string(),
            subject: "🚀 New Lead from LeadGen Pro Website!".to_string(),
            sender_name: "LeadGen Pro Contact Form".to_string(),
        },
        smtp: None,
        rate_limit: RateLimitConfig {
            limit: 100,
            window_secs: 60,
        },
        store: StoreConfig::Memory,
    }
}

/// Spawn a test app with a fresh in-memory sheet and a recording mailer.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(), Arc::new(RecordingMailer::default())).await
}

pub async fn spawn_app_with(config: Config, mailer: Arc<RecordingMailer>) -> TestApp {
    let sheet = Arc::new(MemorySheet::new());
    let addr = serve(config, sheet.clone(), Some(mailer.clone())).await;

    TestApp {
        addr,
        client: Client::new(),
        sheet,
        mailer,
    }
}

/// Serve the app over any store/notifier pair, return its address.
pub async fn serve(
    config: Config,
    store: Arc<dyn TabularStore>,
    notifier: Option<Arc<dyn Notifier>>,
) -> SocketAddr {
    let (app, _state) = leadform::build_app(config, store, notifier);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    addr
}

pub const JANE: [(&str, &str); 3] = [
    ("name", "Jane Doe"),
    ("email", "jane@example.com"),
    ("message", "Interested in SEO services for my shop."),
];
