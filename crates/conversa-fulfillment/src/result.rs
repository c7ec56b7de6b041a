use serde::Serialize;

/// One channel's outcome from a fulfillment fan-out (§4.10). The array order
/// callers build results in is the execution order (Bubble, lambda|s3, email,
/// sms, webhook) — no ordering is implied by the type itself.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ChannelResult {
    pub channel: String,
    /// One of: sent, stored, invoked, skipped, failed.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ChannelResult {
    pub fn sent(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            status: "sent".to_string(),
            ..Default::default()
        }
    }

    pub fn failed(channel: &str, error: impl Into<String>) -> Self {
        Self {
            channel: channel.to_string(),
            status: "failed".to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
