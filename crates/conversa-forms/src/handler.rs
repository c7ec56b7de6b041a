//! Ties field validation and form submission together into the two
//! operations the request dispatcher picks between by `action` (§4.9).

use std::collections::HashMap;

use chrono::Utc;
use conversa_core::model::{FormSubmissionRecord, TenantConfig};
use conversa_fulfillment::{fulfill, ChannelResult, FulfillmentContext};
use serde::Serialize;
use tracing::warn;

use crate::priority::determine_priority;
use crate::store::{save_best_effort, SubmissionStore};
use crate::validation::validate_field;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ValidateFieldResult {
    #[serde(rename = "validation_success")]
    Success { field: String },
    #[serde(rename = "validation_error")]
    Error { field: String, errors: Vec<String> },
}

/// `validate_field(field_id, field_value) -> ValidateFieldResult`. The
/// spec's rule table is pure, so this wraps `validation::validate_field`
/// without consulting `tenant_config` — no field has per-tenant validation
/// rules today, but the signature keeps the seam open.
pub fn handle_validate_field(field_id: &str, field_value: &str, _tenant_config: &TenantConfig) -> ValidateFieldResult {
    match validate_field(field_id, field_value) {
        Ok(()) => ValidateFieldResult::Success {
            field: field_id.to_string(),
        },
        Err(e) => ValidateFieldResult::Error {
            field: e.field,
            errors: e.errors,
        },
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SubmitFormResult {
    #[serde(rename = "form_complete")]
    Complete {
        submission_id: String,
        priority: String,
        fulfillment: Vec<ChannelResult>,
    },
    #[serde(rename = "form_error")]
    Error { error: String },
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_submit_form(
    form_id: Option<&str>,
    form_data: &HashMap<String, serde_json::Value>,
    tenant_config: &TenantConfig,
    session_id: Option<&str>,
    conversation_id: Option<&str>,
    submissions: &dyn SubmissionStore,
    fulfillment_ctx: &FulfillmentContext<'_>,
    mailer: &dyn conversa_fulfillment::EmailSender,
) -> SubmitFormResult {
    let Some(form_id) = form_id else {
        return SubmitFormResult::Error {
            error: "form_id is required".to_string(),
        };
    };
    if form_data.is_empty() {
        return SubmitFormResult::Error {
            error: "form_data is required".to_string(),
        };
    }

    let form = tenant_config.conversational_forms.get(form_id);
    let priority_rules = form.map(|f| f.priority_rules.as_slice()).unwrap_or(&[]);
    let priority = determine_priority(form_id, form_data, priority_rules);

    let submission_id = format!("{}_{}", form_id, Utc::now().timestamp_millis());

    let record = FormSubmissionRecord {
        submission_id: submission_id.clone(),
        tenant_id: tenant_config.tenant_id.clone(),
        form_id: form_id.to_string(),
        form_data: form_data.clone(),
        priority: priority.clone(),
        submitted_at: Utc::now().to_rfc3339(),
        status: "pending_fulfillment".to_string(),
    };
    save_best_effort(submissions, &record).await;

    let fulfillment = fulfill(
        form_id,
        form,
        form_data,
        tenant_config,
        &submission_id,
        &priority,
        session_id,
        conversation_id,
        fulfillment_ctx,
    )
    .await;

    if tenant_config.send_confirmation_email {
        if let Some(email) = form_data.get("email").and_then(|v| v.as_str()) {
            let html = format!(
                "<p>Thank you for your submission. We'll be in touch soon.</p><p>Reference: {}</p>",
                submission_id
            );
            if let Err(e) = mailer.send(email, "We received your submission", &html).await {
                warn!(submission_id = %submission_id, error = %e, "confirmation email failed");
            }
        }
    }

    SubmitFormResult::Complete {
        submission_id,
        priority,
        fulfillment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conversa_core::Result as GwResult;
    use conversa_fulfillment::{ArchiveStore, EmailSender, HttpPoster, NestedInvoker, SmsSender, SmsUsageMeter};
    use rusqlite::Connection;

    struct NoopHttp;
    #[async_trait]
    impl HttpPoster for NoopHttp {
        async fn post_json(&self, _url: &str, _bearer: Option<&str>, _body: serde_json::Value) -> GwResult<conversa_fulfillment::PostOutcome> {
            Ok(conversa_fulfillment::PostOutcome { status: 200, body: String::new() })
        }
        async fn put_json(&self, _url: &str, _body: serde_json::Value) -> GwResult<conversa_fulfillment::PostOutcome> {
            Ok(conversa_fulfillment::PostOutcome { status: 200, body: String::new() })
        }
    }

    struct NoopMailer {
        calls: std::sync::Mutex<Vec<String>>,
    }
    #[async_trait]
    impl EmailSender for NoopMailer {
        async fn send(&self, to: &str, _subject: &str, _html: &str) -> GwResult<()> {
            self.calls.lock().unwrap().push(to.to_string());
            Ok(())
        }
    }

    struct NoopSms;
    #[async_trait]
    impl SmsSender for NoopSms {
        async fn send(&self, _to: &str, _body: &str) -> GwResult<()> {
            Ok(())
        }
    }

    struct NoopNested;
    #[async_trait]
    impl NestedInvoker for NoopNested {
        async fn invoke(&self, _function_name: &str, _payload: serde_json::Value) -> GwResult<()> {
            Ok(())
        }
    }

    struct NoopArchive;
    #[async_trait]
    impl ArchiveStore for NoopArchive {
        async fn put(&self, _key: &str, _body: Vec<u8>) -> GwResult<()> {
            Ok(())
        }
    }

    #[test]
    fn validate_field_wraps_validation_module() {
        let tenant_config = TenantConfig::default();
        let result = handle_validate_field("email", "not-an-email", &tenant_config);
        match result {
            ValidateFieldResult::Error { field, errors } => {
                assert_eq!(field, "email");
                assert_eq!(errors[0], "Please enter a valid email address");
            }
            _ => panic!("expected validation_error"),
        }
    }

    #[tokio::test]
    async fn missing_form_id_is_form_error() {
        let tenant_config = TenantConfig::default();
        let submissions = crate::store::SqliteSubmissionStore::new(Connection::open_in_memory().unwrap()).unwrap();
        let sms_meter = SmsUsageMeter::new(Connection::open_in_memory().unwrap()).unwrap();
        let http = NoopHttp;
        let mailer = NoopMailer { calls: std::sync::Mutex::new(vec![]) };
        let sms = NoopSms;
        let nested = NoopNested;
        let archive = NoopArchive;
        let ctx = FulfillmentContext {
            http: &http,
            mailer: &mailer,
            sms: &sms,
            nested: &nested,
            archive: &archive,
            sms_meter: &sms_meter,
            sms_monthly_limit: 100,
            bubble_default_webhook_url: None,
            bubble_default_api_key: None,
        };

        let result = handle_submit_form(
            None,
            &HashMap::new(),
            &tenant_config,
            None,
            None,
            &submissions,
            &ctx,
            &mailer,
        )
        .await;

        match result {
            SubmitFormResult::Error { error } => assert_eq!(error, "form_id is required"),
            _ => panic!("expected form_error"),
        }
    }

    #[tokio::test]
    async fn complete_submission_dispatches_confirmation_email_when_email_present() {
        let mut tenant_config = TenantConfig::default();
        tenant_config.tenant_id = "tenant-a".to_string();
        let submissions = crate::store::SqliteSubmissionStore::new(Connection::open_in_memory().unwrap()).unwrap();
        let sms_meter = SmsUsageMeter::new(Connection::open_in_memory().unwrap()).unwrap();
        let http = NoopHttp;
        let mailer = NoopMailer { calls: std::sync::Mutex::new(vec![]) };
        let sms = NoopSms;
        let nested = NoopNested;
        let archive = NoopArchive;
        let ctx = FulfillmentContext {
            http: &http,
            mailer: &mailer,
            sms: &sms,
            nested: &nested,
            archive: &archive,
            sms_meter: &sms_meter,
            sms_monthly_limit: 100,
            bubble_default_webhook_url: None,
            bubble_default_api_key: None,
        };

        let mut form_data = HashMap::new();
        form_data.insert("email".to_string(), serde_json::json!("ada@example.com"));

        let result = handle_submit_form(
            Some("contact"),
            &form_data,
            &tenant_config,
            Some("sess-1"),
            None,
            &submissions,
            &ctx,
            &mailer,
        )
        .await;

        match result {
            SubmitFormResult::Complete { priority, .. } => assert_eq!(priority, "normal"),
            _ => panic!("expected form_complete"),
        }
        assert_eq!(mailer.calls.lock().unwrap().as_slice(), &["ada@example.com".to_string()]);
    }
}
