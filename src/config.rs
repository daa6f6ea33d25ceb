use std::net::IpAddr;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
    pub site_name: String,
    /// Value written to the `Source` column of every row.
    pub source: String,
    pub notification: NotificationConfig,
    pub smtp: Option<SmtpConfig>,
    pub rate_limit: RateLimitConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub to: String,
    pub subject: String,
    pub sender_name: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub limit: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    Memory,
    Postgres {
        database_url: String,
        sheet_id: String,
    },
    Google(GoogleSheetConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoogleSheetConfig {
    pub api_base: String,
    pub spreadsheet_id: String,
    pub tab: String,
    /// Numeric sheet id, needed by the formatting requests.
    pub gid: i64,
    pub access_token: String,
}

const DEFAULT_ALLOWED_ORIGINS: &str =
    "https://your-domain.com,https://lovable.dev,http://localhost:3000,http://localhost:8080";

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("LEADFORM_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LEADFORM_HOST: {e}"))?;

        let port: u16 = env_or("LEADFORM_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid LEADFORM_PORT: {e}"))?;

        let max_body_size: usize = env_or("LEADFORM_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid LEADFORM_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = split_list(&env_or("LEADFORM_TRUSTED_PROXIES", ""))
            .map(|s| {
                s.parse()
                    .map_err(|e| format!("Invalid LEADFORM_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let allowed_origins = split_list(&env_or("LEADFORM_ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS))
            .map(str::to_string)
            .collect();

        let log_level = env_or("LEADFORM_LOG_LEVEL", "info");

        let site_name = env_or("LEADFORM_SITE_NAME", "LeadGen Pro");
        let source = env_or("LEADFORM_SOURCE", &format!("{site_name} Website"));

        let smtp = match (
            std::env::var("LEADFORM_SMTP_HOST").ok(),
            std::env::var("LEADFORM_SMTP_PORT").ok(),
            std::env::var("LEADFORM_SMTP_USER").ok(),
            std::env::var("LEADFORM_SMTP_PASS").ok(),
            std::env::var("LEADFORM_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid LEADFORM_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        let notify_to = match &smtp {
            Some(_) => env_required("LEADFORM_NOTIFY_TO")?,
            None => env_or("LEADFORM_NOTIFY_TO", ""),
        };

        let notification = NotificationConfig {
            to: notify_to,
            subject: env_or(
                "LEADFORM_NOTIFY_SUBJECT",
                &format!("🚀 New Lead from {site_name} Website!"),
            ),
            sender_name: format!("{site_name} Contact Form"),
        };

        let rate_limit = RateLimitConfig {
            limit: env_or("LEADFORM_RATE_LIMIT", "10")
                .parse()
                .map_err(|e| format!("Invalid LEADFORM_RATE_LIMIT: {e}"))?,
            window_secs: env_or("LEADFORM_RATE_LIMIT_WINDOW_SECS", "60")
                .parse()
                .map_err(|e| format!("Invalid LEADFORM_RATE_LIMIT_WINDOW_SECS: {e}"))?,
        };

        let store = match env_or("LEADFORM_STORE", "memory").as_str() {
            "memory" => StoreConfig::Memory,
            "postgres" => StoreConfig::Postgres {
                database_url: env_required("DATABASE_URL")?,
                sheet_id: env_or("LEADFORM_SHEET_ID", "leads"),
            },
            "google" => StoreConfig::Google(GoogleSheetConfig {
                api_base: env_or("LEADFORM_SHEETS_API", "https://sheets.googleapis.com/v4"),
                spreadsheet_id: env_required("LEADFORM_SHEET_ID")?,
                tab: env_or("LEADFORM_SHEETS_TAB", "Sheet1"),
                gid: env_or("LEADFORM_SHEETS_GID", "0")
                    .parse()
                    .map_err(|e| format!("Invalid LEADFORM_SHEETS_GID: {e}"))?,
                access_token: env_required("LEADFORM_SHEETS_TOKEN")?,
            }),
            other => return Err(format!("Invalid LEADFORM_STORE: {other}")),
        };

        Ok(Config {
            host,
            port,
            max_body_size,
            trusted_proxies,
            allowed_origins,
            log_level,
            site_name,
            source,
            notification,
            smtp,
            rate_limit,
            store,
        })
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
