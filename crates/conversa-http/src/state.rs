use conversa_core::config::GatewayConfig;
use conversa_fulfillment::{ArchiveStore, EmailSender, HttpPoster, NestedInvoker, SmsSender, SmsUsageMeter};
use conversa_knowledge::KnowledgeRetriever;
use conversa_llm::ModelStreamer;
use conversa_tenant::TenantConfigStore;

/// Central shared state, passed as `Arc<AppState>` to every handler —
/// the same role `skynet-gateway::app::AppState` plays for that server.
pub struct AppState {
    pub config: GatewayConfig,
    pub tenant_store: TenantConfigStore,
    pub knowledge: KnowledgeRetriever,
    pub model_streamer: Box<dyn ModelStreamer>,
    pub submissions: Box<dyn conversa_forms::SubmissionStore>,
    pub sms_meter: SmsUsageMeter,
    pub http_poster: Box<dyn HttpPoster>,
    pub mailer: Box<dyn EmailSender>,
    pub sms: Box<dyn SmsSender>,
    pub nested: Box<dyn NestedInvoker>,
    pub archive: Box<dyn ArchiveStore>,
}

impl AppState {
    pub fn fulfillment_context(&self) -> conversa_fulfillment::FulfillmentContext<'_> {
        conversa_fulfillment::FulfillmentContext {
            http: self.http_poster.as_ref(),
            mailer: self.mailer.as_ref(),
            sms: self.sms.as_ref(),
            nested: self.nested.as_ref(),
            archive: self.archive.as_ref(),
            sms_meter: &self.sms_meter,
            sms_monthly_limit: self.config.fulfillment.sms_monthly_limit,
            bubble_default_webhook_url: self.config.fulfillment.bubble_webhook_url.as_deref(),
            bubble_default_api_key: self.config.fulfillment.bubble_api_key.as_deref(),
        }
    }
}
