use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use conversa_core::config::{GatewayConfig, OUTBOUND_HTTP_TIMEOUT_SECS};
use conversa_fulfillment::SmsUsageMeter;
use conversa_http::adapters::{
    FsArchiveStore, HttpArchiveStore, HttpEmailSender, HttpKnowledgeBase, HttpModelStreamer, HttpNestedInvoker,
    HttpSmsSender, NullKnowledgeBase, UnconfiguredEmailSender, UnconfiguredModelStreamer, UnconfiguredNestedInvoker,
    UnconfiguredSmsSender,
};
use conversa_http::state::AppState;
use conversa_knowledge::KnowledgeRetriever;
use conversa_tenant::{FsObjectStore, HttpObjectStore, ObjectStore, TenantConfigStore};
use rusqlite::Connection;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conversa_http=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path > GATEWAY_CONFIG env > ./gateway.toml
    let config_path = std::env::var("GATEWAY_CONFIG").ok();
    let config = GatewayConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("config load failed ({e}), using defaults");
        GatewayConfig::default()
    });

    let bind = config.server.bind.clone();
    let port = config.server.port;

    let state = Arc::new(build_state(config)?);
    let router = conversa_http::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("conversa gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Wires every external-collaborator trait to its real HTTP/filesystem
/// adapter when an endpoint is configured, or to the matching
/// null/unconfigured stand-in otherwise — the gateway boots with zero
/// configuration, same as `skynet-gateway::app::AppState::new`.
fn build_state(config: GatewayConfig) -> anyhow::Result<AppState> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(OUTBOUND_HTTP_TIMEOUT_SECS))
        .build()?;

    let object_store: Box<dyn ObjectStore> = match &config.store.endpoint {
        Some(url) => Box::new(HttpObjectStore::new(http_client.clone(), url.clone())),
        None => Box::new(FsObjectStore::new(config.store.config_bucket.clone())),
    };
    let tenant_store = TenantConfigStore::new(object_store);

    let kb: Box<dyn conversa_knowledge::KnowledgeBase> = match &config.integrations.knowledge_base_endpoint {
        Some(url) => Box::new(HttpKnowledgeBase::new(http_client.clone(), url.clone())),
        None => Box::new(NullKnowledgeBase),
    };
    let knowledge = KnowledgeRetriever::new(kb);

    let model_streamer: Box<dyn conversa_llm::ModelStreamer> = match &config.model.endpoint {
        Some(url) => Box::new(HttpModelStreamer::new(http_client.clone(), url.clone())),
        None => Box::new(UnconfiguredModelStreamer),
    };

    let mailer: Box<dyn conversa_fulfillment::EmailSender> = match &config.integrations.mailer_endpoint {
        Some(url) => Box::new(HttpEmailSender::new(
            http_client.clone(),
            url.clone(),
            config.fulfillment.ses_from_email.clone(),
        )),
        None => Box::new(UnconfiguredEmailSender),
    };

    let sms: Box<dyn conversa_fulfillment::SmsSender> = match &config.integrations.sms_endpoint {
        Some(url) => Box::new(HttpSmsSender::new(http_client.clone(), url.clone())),
        None => Box::new(UnconfiguredSmsSender),
    };

    let nested: Box<dyn conversa_fulfillment::NestedInvoker> = match &config.integrations.nested_endpoint {
        Some(url) => Box::new(HttpNestedInvoker::new(http_client.clone(), url.clone())),
        None => Box::new(UnconfiguredNestedInvoker),
    };

    let archive: Box<dyn conversa_fulfillment::ArchiveStore> = match &config.integrations.archive_endpoint {
        Some(url) => Box::new(HttpArchiveStore::new(http_client.clone(), url.clone())),
        None => Box::new(FsArchiveStore::new(config.integrations.archive_root.clone())),
    };

    let http_poster: Box<dyn conversa_fulfillment::HttpPoster> =
        Box::new(conversa_fulfillment::ReqwestHttpPoster::new(http_client.clone()));

    ensure_parent_dir(&config.database.form_submissions_path)?;
    ensure_parent_dir(&config.database.sms_usage_path)?;

    let submissions_conn = Connection::open(&config.database.form_submissions_path)?;
    let submissions: Box<dyn conversa_forms::SubmissionStore> =
        Box::new(conversa_forms::SqliteSubmissionStore::new(submissions_conn)?);

    let sms_meter_conn = Connection::open(&config.database.sms_usage_path)?;
    let sms_meter = SmsUsageMeter::new(sms_meter_conn)?;

    Ok(AppState {
        config,
        tenant_store,
        knowledge,
        model_streamer,
        submissions,
        sms_meter,
        http_poster,
        mailer,
        sms,
        nested,
        archive,
    })
}

fn ensure_parent_dir(path: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
