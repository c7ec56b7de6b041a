//! SSE frame shapes for the request dispatcher (§4.12, §6.1). Every frame
//! the dispatcher may write is constructed here so the bit-exact wire text
//! lives in one place rather than being assembled ad hoc at each call site.

use bytes::Bytes;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct Frame(String);

impl Frame {
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.0)
    }

    pub fn prelude() -> Self {
        Frame(":ok\n\n".to_string())
    }

    pub fn start() -> Self {
        data(&json!({ "type": "start" }))
    }

    pub fn heartbeat() -> Self {
        data(&json!({ "type": "heartbeat" }))
    }

    pub fn stream_start() -> Self {
        data(&json!({ "type": "stream_start" }))
    }

    pub fn text(content: &str, session_id: Option<&str>) -> Self {
        data(&json!({ "type": "text", "content": content, "session_id": session_id }))
    }

    /// `: x-first-token-ms=<n>\n\n` — closes the telemetry block's leading line.
    pub fn telemetry_first_token_ms(ms: u64) -> Self {
        Frame(format!(": x-first-token-ms={}\n\n", ms))
    }

    pub fn telemetry_total_tokens(n: usize) -> Self {
        Frame(format!(": x-total-tokens={}\n", n))
    }

    pub fn telemetry_total_time_ms(ms: u64) -> Self {
        Frame(format!(": x-total-time-ms={}\n", ms))
    }

    pub fn cta_buttons(value: Value) -> Self {
        data(&value)
    }

    pub fn form_result(value: Value) -> Self {
        data(&value)
    }

    pub fn error(message: &str) -> Self {
        data(&json!({ "type": "error", "error": message }))
    }

    pub fn done() -> Self {
        Frame("data: [DONE]\n\n".to_string())
    }
}

fn data(value: &Value) -> Frame {
    Frame(format!("data: {}\n\n", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_is_bare_comment_line() {
        assert_eq!(Frame::prelude().into_bytes().as_ref(), b":ok\n\n");
    }

    #[test]
    fn done_is_literal_done_marker() {
        assert_eq!(Frame::done().into_bytes().as_ref(), b"data: [DONE]\n\n");
    }

    #[test]
    fn text_frame_includes_session_id() {
        let frame = Frame::text("hi", Some("sess-1"));
        let bytes = frame.into_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("data: "));
        assert!(text.ends_with("\n\n"));
        assert!(text.contains("\"session_id\":\"sess-1\""));
    }
}
