use std::collections::HashMap;

use chrono::Utc;
use conversa_core::model::{ConversationalForm, FulfillmentSpec, TenantConfig};
use serde_json::json;
use tracing::warn;

use crate::archive::ArchiveStore;
use crate::bubble::humanize_form_data;
use crate::http_poster::HttpPoster;
use crate::mailer::{render_submission_table, EmailSender};
use crate::meter::SmsUsageMeter;
use crate::nested::NestedInvoker;
use crate::result::ChannelResult;
use crate::sms::{priority_emoji, truncate_to_160_units, SmsSender};

/// External collaborators + tunables the orchestrator needs, gathered in one
/// place so `fulfill` doesn't take a dozen positional arguments. Borrowed for
/// the duration of one call — no lifetime outlives a single request.
pub struct FulfillmentContext<'a> {
    pub http: &'a dyn HttpPoster,
    pub mailer: &'a dyn EmailSender,
    pub sms: &'a dyn SmsSender,
    pub nested: &'a dyn NestedInvoker,
    pub archive: &'a dyn ArchiveStore,
    pub sms_meter: &'a SmsUsageMeter,
    pub sms_monthly_limit: u32,
    pub bubble_default_webhook_url: Option<&'a str>,
    pub bubble_default_api_key: Option<&'a str>,
}

/// `fulfill(form_id, form_data, tenant_config, submission_id, priority,
/// session_id?, conversation_id?) -> [ChannelResult]` (C10).
///
/// Channels execute in this fixed order — Bubble, (lambda | s3), email, sms,
/// webhook — and each is independent: one channel's failure never aborts
/// another (spec §4.10, §9 "a task-group abstraction ... MUST not cancel
/// siblings on individual failure").
#[allow(clippy::too_many_arguments)]
pub async fn fulfill(
    form_id: &str,
    form: Option<&ConversationalForm>,
    form_data: &HashMap<String, serde_json::Value>,
    tenant_config: &TenantConfig,
    submission_id: &str,
    priority: &str,
    session_id: Option<&str>,
    conversation_id: Option<&str>,
    ctx: &FulfillmentContext<'_>,
) -> Vec<ChannelResult> {
    let mut results = Vec::new();

    if let Some(result) = bubble_channel(
        form_id,
        form,
        form_data,
        tenant_config,
        submission_id,
        session_id,
        conversation_id,
        ctx,
    )
    .await
    {
        results.push(result);
    }

    let spec = form
        .map(|f| &f.fulfillment)
        .or(tenant_config.default_fulfillment.as_ref());

    if let Some(spec) = spec {
        match spec.kind.as_deref() {
            Some("lambda") => {
                results.push(lambda_channel(form_id, form_data, tenant_config, submission_id, priority, spec, ctx).await);
            }
            Some("s3") => {
                results.push(s3_channel(form_id, form_data, tenant_config, submission_id, priority, ctx).await);
            }
            _ => {}
        }

        if let Some(result) = email_channel(form_data, priority, spec, ctx).await {
            results.push(result);
        }

        if let Some(result) = sms_channel(form_id, form_data, tenant_config, priority, spec, ctx).await {
            results.push(result);
        }

        if let Some(result) = webhook_channel(form_id, form_data, submission_id, priority, spec, ctx).await {
            results.push(result);
        }
    }

    results
}

#[allow(clippy::too_many_arguments)]
async fn bubble_channel(
    form_id: &str,
    form: Option<&ConversationalForm>,
    form_data: &HashMap<String, serde_json::Value>,
    tenant_config: &TenantConfig,
    submission_id: &str,
    session_id: Option<&str>,
    conversation_id: Option<&str>,
    ctx: &FulfillmentContext<'_>,
) -> Option<ChannelResult> {
    let webhook_url = tenant_config
        .bubble_integration
        .as_ref()
        .map(|b| b.webhook_url.clone())
        .or_else(|| ctx.bubble_default_webhook_url.map(String::from))?;

    let api_key = tenant_config
        .bubble_integration
        .as_ref()
        .and_then(|b| b.api_key.clone())
        .or_else(|| ctx.bubble_default_api_key.map(String::from));

    let humanized = humanize_form_data(form_data, form);
    let payload = json!({
        "submission_id": submission_id,
        "timestamp": Utc::now().to_rfc3339(),
        "tenant_id": tenant_config.tenant_id,
        "tenant_hash": tenant_config.tenant_hash,
        "organization_name": tenant_config.bubble_integration.as_ref().and_then(|b| b.organization_name.clone()),
        "form_id": form_id,
        "form_title": form.map(|f| f.title.clone()),
        "program_id": form.and_then(|f| f.program.clone()),
        "session_id": session_id,
        "conversation_id": conversation_id,
        "form_data": serde_json::to_string(&humanized).unwrap_or_default(),
    });

    match ctx.http.post_json(&webhook_url, api_key.as_deref(), payload).await {
        Ok(outcome) if (200..300).contains(&outcome.status) => Some(ChannelResult::sent("bubble")),
        Ok(outcome) => {
            warn!(status = outcome.status, "bubble webhook returned non-2xx");
            Some(ChannelResult::failed(
                "bubble",
                format!("bubble webhook returned {}", outcome.status),
            ))
        }
        Err(e) => {
            warn!(error = %e, "bubble webhook request failed");
            Some(ChannelResult::failed("bubble", e.to_string()))
        }
    }
}

async fn lambda_channel(
    form_id: &str,
    form_data: &HashMap<String, serde_json::Value>,
    tenant_config: &TenantConfig,
    submission_id: &str,
    priority: &str,
    spec: &FulfillmentSpec,
    ctx: &FulfillmentContext<'_>,
) -> ChannelResult {
    let function_name = spec
        .function_name
        .clone()
        .unwrap_or_else(|| "default-fulfillment".to_string());

    let payload = json!({
        "action": "fulfill_form",
        "form_type": form_id,
        "submission_id": submission_id,
        "responses": form_data,
        "tenant_id": tenant_config.tenant_id,
        "priority": priority,
    });

    match ctx.nested.invoke(&function_name, payload).await {
        Ok(()) => ChannelResult {
            channel: "lambda".to_string(),
            status: "invoked".to_string(),
            function: Some(function_name),
            ..Default::default()
        },
        Err(e) => {
            warn!(function = %function_name, error = %e, "nested function invocation failed");
            ChannelResult {
                channel: "lambda".to_string(),
                status: "failed".to_string(),
                error: Some(e.to_string()),
                function: Some(function_name),
                ..Default::default()
            }
        }
    }
}

async fn s3_channel(
    form_id: &str,
    form_data: &HashMap<String, serde_json::Value>,
    tenant_config: &TenantConfig,
    submission_id: &str,
    priority: &str,
    ctx: &FulfillmentContext<'_>,
) -> ChannelResult {
    let key = format!(
        "submissions/{}/{}/{}.json",
        tenant_config.tenant_id, form_id, submission_id
    );
    let body = serde_json::to_vec(&json!({
        "form_id": form_id,
        "submission_id": submission_id,
        "priority": priority,
        "form_data": form_data,
    }))
    .unwrap_or_default();

    match ctx.archive.put(&key, body).await {
        Ok(()) => ChannelResult {
            channel: "s3".to_string(),
            status: "stored".to_string(),
            location: Some(key),
            ..Default::default()
        },
        Err(e) => {
            warn!(key = %key, error = %e, "object-store archive failed");
            ChannelResult {
                channel: "s3".to_string(),
                status: "failed".to_string(),
                error: Some(e.to_string()),
                location: Some(key),
                ..Default::default()
            }
        }
    }
}

async fn email_channel(
    form_data: &HashMap<String, serde_json::Value>,
    priority: &str,
    spec: &FulfillmentSpec,
    ctx: &FulfillmentContext<'_>,
) -> Option<ChannelResult> {
    let to = spec.email_to.as_deref()?;
    let html = render_submission_table(form_data, priority);
    match ctx.mailer.send(to, "New form submission", &html).await {
        Ok(()) => Some(ChannelResult::sent("email")),
        Err(e) => {
            warn!(error = %e, "organization notification email failed");
            Some(ChannelResult::failed("email", e.to_string()))
        }
    }
}

async fn sms_channel(
    form_id: &str,
    form_data: &HashMap<String, serde_json::Value>,
    tenant_config: &TenantConfig,
    priority: &str,
    spec: &FulfillmentSpec,
    ctx: &FulfillmentContext<'_>,
) -> Option<ChannelResult> {
    let to = spec.sms_to.as_deref()?;

    let check = ctx
        .sms_meter
        .check_and_increment(&tenant_config.tenant_id, ctx.sms_monthly_limit);

    if !check.allowed {
        return Some(ChannelResult {
            channel: "sms".to_string(),
            status: "skipped".to_string(),
            reason: Some("monthly_limit_reached".to_string()),
            usage: Some(check.usage_before),
            limit: Some(check.limit),
            ..Default::default()
        });
    }

    let first_name = form_data.get("first_name").and_then(|v| v.as_str()).unwrap_or("");
    let last_name = form_data.get("last_name").and_then(|v| v.as_str()).unwrap_or("");
    let email = form_data.get("email").and_then(|v| v.as_str()).unwrap_or("");
    let body = truncate_to_160_units(&format!(
        "{} New {} submission. Name: {} {}, Email: {}",
        priority_emoji(priority),
        form_id,
        first_name,
        last_name,
        email
    ));

    match ctx.sms.send(to, &body).await {
        Ok(()) => Some(ChannelResult {
            channel: "sms".to_string(),
            status: "sent".to_string(),
            usage: Some(check.usage_after),
            limit: Some(check.limit),
            ..Default::default()
        }),
        Err(e) => {
            warn!(error = %e, "organization sms notification failed");
            Some(ChannelResult {
                channel: "sms".to_string(),
                status: "failed".to_string(),
                error: Some(e.to_string()),
                usage: Some(check.usage_after),
                limit: Some(check.limit),
                ..Default::default()
            })
        }
    }
}

async fn webhook_channel(
    form_id: &str,
    form_data: &HashMap<String, serde_json::Value>,
    submission_id: &str,
    priority: &str,
    spec: &FulfillmentSpec,
    ctx: &FulfillmentContext<'_>,
) -> Option<ChannelResult> {
    let url = spec.webhook_url.as_deref()?;
    let payload = json!({
        "form_id": form_id,
        "submission_id": submission_id,
        "priority": priority,
        "timestamp": Utc::now().to_rfc3339(),
        "data": form_data,
    });

    match ctx.http.post_json(url, None, payload).await {
        Ok(outcome) if (200..300).contains(&outcome.status) => Some(ChannelResult::sent("webhook")),
        Ok(outcome) => Some(ChannelResult::failed(
            "webhook",
            format!("webhook returned {}", outcome.status),
        )),
        Err(e) => {
            warn!(error = %e, "fulfillment webhook request failed");
            Some(ChannelResult::failed("webhook", e.to_string()))
        }
    }
}
