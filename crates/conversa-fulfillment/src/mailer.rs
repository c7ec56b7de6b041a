use async_trait::async_trait;
use conversa_core::Result;
use std::collections::HashMap;

/// Abstracts the outbound mail transport (SES HTTP API, SMTP relay, …).
/// Both the organization-notification channel (C10) and the applicant
/// confirmation email (C9) send through this one seam, the same way
/// `LlmProvider`/`Channel` abstract their externals.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// Renders `form_data` as an HTML table with a trailing `Priority: <UPPER>`
/// footer, per §4.10's organization-notification email.
pub fn render_submission_table(form_data: &HashMap<String, serde_json::Value>, priority: &str) -> String {
    let mut keys: Vec<&String> = form_data.keys().collect();
    keys.sort();

    let rows: String = keys
        .iter()
        .map(|k| {
            let value = display_value(&form_data[*k]);
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                html_escape(k),
                html_escape(&value)
            )
        })
        .collect();

    format!(
        "<table>{}</table><p>Priority: {}</p>",
        rows,
        priority.to_uppercase()
    )
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_table_with_priority_footer() {
        let mut data = HashMap::new();
        data.insert("email".to_string(), serde_json::json!("a@b.com"));
        let html = render_submission_table(&data, "high");
        assert!(html.contains("<table>"));
        assert!(html.contains("a@b.com"));
        assert!(html.contains("Priority: HIGH"));
    }

    #[test]
    fn escapes_html_special_characters() {
        let mut data = HashMap::new();
        data.insert("notes".to_string(), serde_json::json!("<script>alert(1)</script>"));
        let html = render_submission_table(&data, "normal");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
