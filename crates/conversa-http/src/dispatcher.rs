//! The Request Dispatcher (C12): one streaming HTTP endpoint, parsing
//! either a direct event body or an HTTP-event-shape envelope, and writing
//! the bit-exact SSE frame sequence from spec §4.12/§6.1.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use conversa_core::config::HEARTBEAT_INTERVAL_SECS;
use conversa_core::model::{ChatRequest as WireChatRequest, FormRequest, RoutingMetadata};
use conversa_enhance::enhance;
use conversa_llm::provider::{run_stream, ChatRequest as LlmChatRequest};
use conversa_llm::stream::StreamEvent;
use conversa_prompt::PromptComposer;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::interval;
use futures_util::StreamExt as _;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::sse::Frame;
use crate::state::AppState;

const SSE_CHANNEL_CAPACITY: usize = 64;

/// `POST /chat` — the single streaming endpoint (§6.1). The prelude and
/// `start` frame are written before the response is returned, forcing
/// early paint through intermediaries exactly as spec §4.12 step 1
/// requires; everything after that is produced by a background task
/// draining into the channel the response body streams from.
pub async fn chat_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => return immediate_error_response(&format!("invalid JSON body: {e}")),
    };

    let payload = match unwrap_envelope(raw) {
        Ok(v) => v,
        Err(message) => return immediate_error_response(&message),
    };

    let (tx, rx) = mpsc::channel::<Frame>(SSE_CHANNEL_CAPACITY);
    let _ = tx.send(Frame::prelude()).await;
    let _ = tx.send(Frame::start()).await;

    tokio::spawn(async move {
        run_dispatch(state, payload, tx).await;
    });

    sse_response(ReceiverStream::new(rx).map(|f| Ok::<Bytes, Infallible>(f.into_bytes())))
}

/// Requests are either the event itself, or an API-gateway-style proxy
/// envelope carrying the real event JSON-encoded under `body`. Only the
/// latter is unwrapped; anything else is treated as a direct event.
fn unwrap_envelope(raw: Value) -> Result<Value, String> {
    if let Value::Object(map) = &raw {
        let looks_like_proxy_event =
            map.contains_key("httpMethod") || map.contains_key("requestContext") || map.contains_key("isBase64Encoded");
        if looks_like_proxy_event {
            if let Some(Value::String(inner)) = map.get("body") {
                return serde_json::from_str(inner).map_err(|e| format!("invalid JSON in event body: {e}"));
            }
        }
    }
    Ok(raw)
}

async fn run_dispatch(state: Arc<AppState>, payload: Value, tx: mpsc::Sender<Frame>) {
    let form_mode = payload.get("form_mode").and_then(Value::as_bool).unwrap_or(false);

    let tenant_hash = payload
        .get("tenant_hash")
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty());

    let Some(tenant_hash) = tenant_hash else {
        let _ = tx.send(Frame::error("tenant_hash is required")).await;
        let _ = tx.send(Frame::done()).await;
        return;
    };

    if form_mode {
        run_form_mode(state, payload, &tenant_hash, tx).await;
    } else {
        run_chat_mode(state, payload, &tenant_hash, tx).await;
    }
}

async fn run_form_mode(state: Arc<AppState>, payload: Value, tenant_hash: &str, tx: mpsc::Sender<Frame>) {
    let req: FormRequest = match serde_json::from_value(payload) {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(Frame::error(&format!("malformed form request: {e}"))).await;
            let _ = tx.send(Frame::done()).await;
            return;
        }
    };

    let tenant_config = state.tenant_store.load_config(tenant_hash).await.unwrap_or_default();

    let result: Value = match req.action.as_str() {
        "validate_field" => {
            let (Some(field_id), Some(field_value)) = (req.field_id.as_deref(), req.field_value.as_deref()) else {
                let _ = tx.send(Frame::error("field_id and field_value are required")).await;
                let _ = tx.send(Frame::done()).await;
                return;
            };
            let outcome = conversa_forms::handle_validate_field(field_id, field_value, &tenant_config);
            serde_json::to_value(outcome).unwrap_or(Value::Null)
        }
        "submit_form" => {
            let ctx = state.fulfillment_context();
            let outcome = conversa_forms::handle_submit_form(
                req.form_id.as_deref(),
                &req.form_data,
                &tenant_config,
                req.session_id.as_deref(),
                req.conversation_id.as_deref(),
                state.submissions.as_ref(),
                &ctx,
                state.mailer.as_ref(),
            )
            .await;
            serde_json::to_value(outcome).unwrap_or(Value::Null)
        }
        other => {
            let _ = tx.send(Frame::error(&format!("unsupported form action '{other}'"))).await;
            let _ = tx.send(Frame::done()).await;
            return;
        }
    };

    let _ = tx.send(Frame::form_result(result)).await;
    let _ = tx.send(Frame::done()).await;
}

async fn run_chat_mode(state: Arc<AppState>, payload: Value, tenant_hash: &str, tx: mpsc::Sender<Frame>) {
    let chat_req: WireChatRequest = match serde_json::from_value(payload) {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(Frame::error(&format!("malformed chat request: {e}"))).await;
            let _ = tx.send(Frame::done()).await;
            return;
        }
    };

    if chat_req.user_input.trim().is_empty() {
        let _ = tx.send(Frame::error("user_input is required")).await;
        let _ = tx.send(Frame::done()).await;
        return;
    }

    let session_id = chat_req
        .session_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let routing_metadata: RoutingMetadata = chat_req.routing_metadata.clone().into();

    let tenant_config = state.tenant_store.load_config(tenant_hash).await.unwrap_or_default();

    let kb_id = tenant_config.aws.knowledge_base_id.clone();
    let kb_context = state.knowledge.retrieve(&chat_req.user_input, kb_id.as_deref()).await;

    let prompt = PromptComposer::build(&chat_req.user_input, &kb_context, &tenant_config, &chat_req.conversation_history);

    let model_id = tenant_config
        .model_id
        .clone()
        .or_else(|| tenant_config.aws.model_id.clone())
        .unwrap_or_else(|| state.config.model.bedrock_model_id.clone());

    let llm_req = LlmChatRequest {
        prompt,
        model_id,
        max_tokens: tenant_config.streaming.max_tokens,
        temperature: tenant_config.streaming.temperature,
    };

    // Separate timer task for the heartbeat, aborted the moment the first
    // content frame is queued — the same per-operation timer bookkeeping
    // the teacher keeps in `active_operations`, scoped down to one timer.
    let heartbeat_tx = tx.clone();
    let heartbeat = tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        ticker.tick().await; // first tick fires immediately; not a real interval
        loop {
            ticker.tick().await;
            if heartbeat_tx.send(Frame::heartbeat()).await.is_err() {
                break;
            }
        }
    });

    let (llm_tx, mut llm_rx) = mpsc::channel::<StreamEvent>(32);
    let stream_state = state.clone();
    let stream_task = tokio::spawn(async move { run_stream(stream_state.model_streamer.as_ref(), llm_req, llm_tx).await });

    let mut assistant_text = String::new();
    let mut started = false;
    let mut error_message: Option<String> = None;

    while let Some(event) = llm_rx.recv().await {
        match event {
            StreamEvent::TextDelta { text } => {
                if !started {
                    started = true;
                    heartbeat.abort();
                    let _ = tx.send(Frame::stream_start()).await;
                }
                assistant_text.push_str(&text);
                let _ = tx.send(Frame::text(&text, Some(&session_id))).await;
            }
            StreamEvent::Done { .. } => {}
            StreamEvent::Error { message } => {
                error_message = Some(message);
            }
        }
    }
    if !started {
        heartbeat.abort();
    }

    let telemetry = stream_task.await.unwrap_or_default();

    if let Some(message) = error_message {
        warn!(tenant_hash, session_id, error = %message, "chat stream ended in error");
        let _ = tx.send(Frame::error(&message)).await;
        let _ = tx.send(Frame::done()).await;
        return;
    }

    if let Some(ms) = telemetry.first_delta_ms {
        let _ = tx.send(Frame::telemetry_first_token_ms(ms)).await;
    }
    let _ = tx.send(Frame::telemetry_total_tokens(telemetry.total_deltas)).await;
    let _ = tx.send(Frame::telemetry_total_time_ms(telemetry.total_time_ms)).await;

    let enhancement = enhance(
        &assistant_text,
        &chat_req.user_input,
        &chat_req.session_context,
        &routing_metadata,
        &tenant_config,
    );

    let metadata_signals_required = enhancement
        .metadata
        .get("program_switch_detected")
        .and_then(Value::as_bool)
        .unwrap_or(false)
        || enhancement.metadata.get("suspended_forms_detected").is_some();

    if !enhancement.cta_buttons.is_empty() || metadata_signals_required {
        let mut frame = json!({
            "type": "cta_buttons",
            "ctaButtons": enhancement.cta_buttons,
            "metadata": enhancement.metadata,
            "session_id": session_id,
        });
        if let Some(showcase) = &enhancement.showcase_card {
            frame["showcaseCard"] = serde_json::to_value(showcase).unwrap_or(Value::Null);
        }
        let _ = tx.send(Frame::cta_buttons(frame)).await;
    }

    info!(
        tenant_hash,
        session_id,
        total_deltas = telemetry.total_deltas,
        total_time_ms = telemetry.total_time_ms,
        "chat turn complete"
    );
    let _ = tx.send(Frame::done()).await;
}

fn immediate_error_response(message: &str) -> Response {
    let frames = vec![Frame::prelude(), Frame::start(), Frame::error(message), Frame::done()];
    sse_response(tokio_stream::iter(
        frames.into_iter().map(|f| Ok::<Bytes, Infallible>(f.into_bytes())),
    ))
}

fn sse_response<S>(stream: S) -> Response
where
    S: futures_util::Stream<Item = Result<Bytes, Infallible>> + Send + 'static,
{
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache, no-transform")
        .header("X-Accel-Buffering", "no")
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
