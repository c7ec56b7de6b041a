use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Object store error: {0}")]
    ObjectStore(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Channel error ({channel}): {reason}")]
    Channel { channel: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request timeout after {ms}ms")]
    Timeout { ms: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Short machine-readable code, sent to clients in `error` SSE frames.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Config(_) => "CONFIG_ERROR",
            GatewayError::ObjectStore(_) => "OBJECT_STORE_ERROR",
            GatewayError::KnowledgeBase(_) => "KNOWLEDGE_BASE_ERROR",
            GatewayError::LlmProvider(_) => "LLM_PROVIDER_ERROR",
            GatewayError::Database(_) => "DATABASE_ERROR",
            GatewayError::Channel { .. } => "CHANNEL_ERROR",
            GatewayError::Validation(_) => "VALIDATION_ERROR",
            GatewayError::Serialization(_) => "SERIALIZATION_ERROR",
            GatewayError::Io(_) => "IO_ERROR",
            GatewayError::Timeout { .. } => "TIMEOUT",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
