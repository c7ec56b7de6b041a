use async_trait::async_trait;
use conversa_core::Result;

/// Abstracts the outbound SMS transport (SNS, Twilio, …).
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<()>;
}

/// Priority emoji prefix for organization SMS notifications (§4.10).
pub fn priority_emoji(priority: &str) -> &'static str {
    match priority {
        "high" => "\u{1F6A8}",  // 🚨
        "low" => "\u{1F4CB}",   // 📋
        _ => "\u{1F4DD}",       // 📝
    }
}

/// Truncates to 160 UTF-16 code units, matching the JS-string-length
/// semantics the spec's `.slice(0, 160)` implies.
pub fn truncate_to_160_units(s: &str) -> String {
    let units: Vec<u16> = s.encode_utf16().collect();
    if units.len() <= 160 {
        return s.to_string();
    }
    String::from_utf16_lossy(&units[..160])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_body() {
        let long = "x".repeat(200);
        let truncated = truncate_to_160_units(&long);
        assert_eq!(truncated.encode_utf16().count(), 160);
    }

    #[test]
    fn leaves_short_body_untouched() {
        assert_eq!(truncate_to_160_units("hi"), "hi");
    }

    #[test]
    fn emoji_by_priority() {
        assert_eq!(priority_emoji("high"), "\u{1F6A8}");
        assert_eq!(priority_emoji("low"), "\u{1F4CB}");
        assert_eq!(priority_emoji("normal"), "\u{1F4DD}");
    }
}
