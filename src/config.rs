use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub delivery: DeliveryConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "NEBLINA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "NEBLINA_PORT", default_value_t = 3000)]
    pub port: u16,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Maximum contact submissions allowed per client within the window
    #[arg(long, env = "NEBLINA_RATE_LIMIT", default_value_t = 5)]
    pub limit: u32,

    /// Length of the sliding window in seconds
    #[arg(long, env = "NEBLINA_RATE_LIMIT_WINDOW_SECS", default_value_t = 3600)]
    pub window_secs: u64,

    /// Run a full sweep of stale client buckets every N checks
    #[arg(long, env = "NEBLINA_RATE_LIMIT_CLEANUP_INTERVAL", default_value_t = 100)]
    pub cleanup_interval: u64,
}

#[derive(Clone, Debug, Args)]
pub struct DeliveryConfig {
    /// Endpoint of the Web3Forms submission API
    #[arg(long, env = "NEBLINA_RELAY_URL", default_value = "https://api.web3forms.com/submit")]
    pub api_url: String,

    /// Web3Forms access key; submissions fail with a configuration error when unset
    #[arg(long, env = "NEBLINA_WEB3FORMS_ACCESS_KEY")]
    pub access_key: Option<String>,

    /// Inbox that receives relayed messages (bound to the access key on the relay side)
    #[arg(long, env = "NEBLINA_CONTACT_RECIPIENT")]
    pub recipient: Option<String>,

    /// Upper bound on a single outbound relay call in seconds
    #[arg(long, env = "NEBLINA_RELAY_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "NEBLINA_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics export is disabled when unset
    #[arg(long, env = "NEBLINA_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
