use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Redis connection string
    pub redis_url: String,

    /// Redis list the upstream trigger pushes completion events onto
    pub event_queue_key: String,

    /// Redis list that exhausted deliveries are dead-lettered onto;
    /// empty disables the sink and failures are only logged
    pub dead_letter_key: String,

    /// WhatsApp provider name: "twilio" or "360dialog" (unset = channel disabled)
    pub whatsapp_provider: Option<String>,

    /// Email provider name: "sendgrid" or "resend" (unset = channel disabled)
    pub email_provider: Option<String>,

    /// Twilio credentials
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_from_number: Option<String>,

    /// 360dialog API key
    pub dialog_api_key: Option<String>,

    /// SendGrid API key
    pub sendgrid_api_key: Option<String>,

    /// Resend API key
    pub resend_api_key: Option<String>,

    /// Email sender address
    pub from_email: String,

    /// Maximum delivery attempts per channel (default: 3)
    pub max_delivery_attempts: u32,

    /// Base backoff between failed attempts in seconds, scaled linearly
    /// by the attempt number (default: 30)
    pub retry_backoff_seconds: u64,

    /// Request timeout for a single provider send call in seconds (default: 10)
    pub send_timeout_seconds: u64,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            event_queue_key: std::env::var("EVENT_QUEUE_KEY")
                .unwrap_or_else(|_| "laudo:completed".to_string()),
            dead_letter_key: std::env::var("DEAD_LETTER_KEY")
                .unwrap_or_else(|_| "laudo:dead_letter".to_string()),
            whatsapp_provider: std::env::var("WHATSAPP_PROVIDER").ok(),
            email_provider: std::env::var("EMAIL_PROVIDER").ok(),
            twilio_account_sid: std::env::var("TWILIO_ACCOUNT_SID").ok(),
            twilio_auth_token: std::env::var("TWILIO_AUTH_TOKEN").ok(),
            twilio_from_number: std::env::var("TWILIO_FROM_NUMBER").ok(),
            dialog_api_key: std::env::var("DIALOG_API_KEY").ok(),
            sendgrid_api_key: std::env::var("SENDGRID_API_KEY").ok(),
            resend_api_key: std::env::var("RESEND_API_KEY").ok(),
            from_email: std::env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "no-reply@example.com".to_string()),
            max_delivery_attempts: std::env::var("MAX_DELIVERY_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_DELIVERY_ATTEMPTS must be a valid u32"))?,
            retry_backoff_seconds: std::env::var("RETRY_BACKOFF_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RETRY_BACKOFF_SECONDS must be a valid u64"))?,
            send_timeout_seconds: std::env::var("SEND_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SEND_TIMEOUT_SECONDS must be a valid u64"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
        })
    }
}
