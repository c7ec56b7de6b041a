use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_SMS_MONTHLY_LIMIT: u32 = 100;
pub const TENANT_CONFIG_CACHE_TTL_SECS: i64 = 300;
pub const KB_CACHE_TTL_SECS: i64 = 300;
pub const REQUEST_TIMEOUT_SECS: u64 = 300;
pub const OUTBOUND_HTTP_TIMEOUT_SECS: u64 = 10;
pub const HEARTBEAT_INTERVAL_SECS: u64 = 2;
pub const SMS_MAX_CHARS: usize = 160;
pub const DEFAULT_CTA_MAX_DISPLAY: usize = 3;

/// Top-level config (gateway.toml + GATEWAY_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub fulfillment: FulfillmentConfig,
    #[serde(default)]
    pub integrations: IntegrationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

/// Object-store location of tenant config documents (§6.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Bucket (or local directory root when using the filesystem object store).
    #[serde(default = "default_config_bucket")]
    pub config_bucket: String,
    /// HTTP base URL for the config object store. Unset means `config_bucket`
    /// is a local filesystem root instead.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            config_bucket: default_config_bucket(),
            endpoint: None,
        }
    }
}

/// Local persistence for form submissions and SMS usage counters (§6.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_forms_db_path")]
    pub form_submissions_path: String,
    #[serde(default = "default_sms_db_path")]
    pub sms_usage_path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            form_submissions_path: default_forms_db_path(),
            sms_usage_path: default_sms_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_id")]
    pub bedrock_model_id: String,
    /// Streaming completion endpoint. Unset means the gateway has no LLM
    /// binding and falls back to `UnconfiguredModelStreamer`.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            bedrock_model_id: default_model_id(),
            endpoint: None,
        }
    }
}

/// External collaborators the gateway never implements itself (spec §1
/// Non-goals): vector KB, mail, SMS, nested-function front door, submission
/// archive. Each is reached over plain HTTP when an endpoint is configured,
/// else the gateway degrades to a null/unconfigured stand-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    #[serde(default)]
    pub knowledge_base_endpoint: Option<String>,
    #[serde(default)]
    pub mailer_endpoint: Option<String>,
    #[serde(default)]
    pub sms_endpoint: Option<String>,
    #[serde(default)]
    pub nested_endpoint: Option<String>,
    /// HTTP base URL for the submission archive. Unset means the local
    /// filesystem (under `archive_root`) is used instead.
    #[serde(default)]
    pub archive_endpoint: Option<String>,
    #[serde(default = "default_archive_root")]
    pub archive_root: String,
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            knowledge_base_endpoint: None,
            mailer_endpoint: None,
            sms_endpoint: None,
            nested_endpoint: None,
            archive_endpoint: None,
            archive_root: default_archive_root(),
        }
    }
}

fn default_archive_root() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.conversa-gateway/archive", home)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentConfig {
    #[serde(default = "default_sms_limit")]
    pub sms_monthly_limit: u32,
    pub ses_from_email: Option<String>,
    pub bubble_webhook_url: Option<String>,
    pub bubble_api_key: Option<String>,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            sms_monthly_limit: default_sms_limit(),
            ses_from_email: None,
            bubble_webhook_url: None,
            bubble_api_key: None,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            database: DatabaseConfig::default(),
            model: ModelConfig::default(),
            fulfillment: FulfillmentConfig::default(),
            integrations: IntegrationsConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_config_bucket() -> String {
    "tenant-configs".to_string()
}
fn default_forms_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.conversa-gateway/forms.db", home)
}
fn default_sms_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.conversa-gateway/sms_usage.db", home)
}
fn default_model_id() -> String {
    "anthropic.claude-3-5-sonnet".to_string()
}
fn default_sms_limit() -> u32 {
    DEFAULT_SMS_MONTHLY_LIMIT
}

impl GatewayConfig {
    /// Load config from a TOML file with GATEWAY_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./gateway.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.map(String::from).unwrap_or_else(|| "gateway.toml".to_string());

        let config: GatewayConfig = Figment::from(figment::providers::Serialized::defaults(
            GatewayConfig::default(),
        ))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("GATEWAY_").split("_"))
        .extract()
        .map_err(|e| crate::error::GatewayError::Config(e.to_string()))?;

        Ok(config)
    }
}
