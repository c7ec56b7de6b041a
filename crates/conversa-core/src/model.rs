//! The per-tenant configuration document and the request/session shapes
//! that flow through the gateway. Field names mirror the wire JSON exactly
//! so `TenantConfig` and `Request` deserialize straight from the documents
//! described by the external interfaces.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------
// TenantConfig
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub tenant_id: String,
    #[serde(default)]
    pub tenant_hash: Option<String>,

    #[serde(default)]
    pub role_instructions: Option<String>,
    /// Legacy alias for `role_instructions`, consulted only as a fallback.
    #[serde(default)]
    pub tone_prompt: Option<String>,

    #[serde(default)]
    pub formatting_preferences: FormattingPreferences,

    #[serde(default)]
    pub custom_constraints: Vec<String>,

    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,

    #[serde(default)]
    pub conversation_branches: HashMap<String, ConversationBranch>,

    #[serde(default)]
    pub cta_definitions: HashMap<String, CtaDefinition>,

    #[serde(default)]
    pub cta_settings: CtaSettings,

    #[serde(default)]
    pub action_chips: ActionChips,

    #[serde(default)]
    pub content_showcase: Vec<ShowcaseItem>,

    #[serde(default)]
    pub conversational_forms: HashMap<String, ConversationalForm>,

    #[serde(default)]
    pub bubble_integration: Option<BubbleIntegration>,

    #[serde(default)]
    pub default_fulfillment: Option<FulfillmentSpec>,

    #[serde(default = "bool_true")]
    pub send_confirmation_email: bool,

    #[serde(default)]
    pub aws: AwsBinding,

    #[serde(default)]
    pub streaming: StreamingPreferences,

    #[serde(default)]
    pub model_id: Option<String>,
}

fn bool_true() -> bool {
    true
}

fn default_fallback_message() -> String {
    "I'm sorry, I don't have information on that right now.".to_string()
}

impl Default for TenantConfig {
    /// The minimal default configuration C1 substitutes on any retrieval
    /// failure: a model id, a default tone, empty branches/CTAs.
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            tenant_hash: None,
            role_instructions: None,
            tone_prompt: None,
            formatting_preferences: FormattingPreferences::default(),
            custom_constraints: Vec::new(),
            fallback_message: default_fallback_message(),
            conversation_branches: HashMap::new(),
            cta_definitions: HashMap::new(),
            cta_settings: CtaSettings::default(),
            action_chips: ActionChips::default(),
            content_showcase: Vec::new(),
            conversational_forms: HashMap::new(),
            bubble_integration: None,
            default_fulfillment: None,
            send_confirmation_email: true,
            aws: AwsBinding::default(),
            streaming: StreamingPreferences::default(),
            model_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStyle {
    #[default]
    ProfessionalConcise,
    WarmConversational,
    StructuredDetailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    #[default]
    Concise,
    Balanced,
    Comprehensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmojiUsage {
    #[default]
    None,
    Minimal,
    Moderate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattingPreferences {
    #[serde(default)]
    pub response_style: ResponseStyle,
    #[serde(default)]
    pub detail_level: DetailLevel,
    #[serde(default)]
    pub emoji_usage: EmojiUsage,
    #[serde(default = "default_max_emojis")]
    pub max_emojis_per_response: u32,
}

fn default_max_emojis() -> u32 {
    1
}

impl Default for FormattingPreferences {
    fn default() -> Self {
        Self {
            response_style: ResponseStyle::default(),
            detail_level: DetailLevel::default(),
            emoji_usage: EmojiUsage::default(),
            max_emojis_per_response: default_max_emojis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AvailableCtas {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationBranch {
    #[serde(default)]
    pub available_ctas: AvailableCtas,
    #[serde(default)]
    pub showcase_item_id: Option<String>,
    /// Legacy; ignored by the resolver, kept for the keyword-fallback path only.
    #[serde(default)]
    pub detection_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtaDefinition {
    pub label: String,
    pub action: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default, rename = "formId")]
    pub form_id: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default, rename = "type")]
    pub cta_type: Option<String>,
    /// Legacy presentational field. MUST be stripped before reaching the client.
    #[serde(default)]
    pub style: Option<serde_json::Value>,
    /// Any other fields a tenant config carries — preserved and forwarded verbatim.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl CtaDefinition {
    pub fn is_form_cta(&self) -> bool {
        matches!(self.action.as_str(), "start_form" | "form_trigger")
            || self.cta_type.as_deref() == Some("form_cta")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtaSettings {
    #[serde(default)]
    pub fallback_branch: Option<String>,
    #[serde(default = "default_max_display")]
    pub max_display: usize,
}

fn default_max_display() -> usize {
    crate::config::DEFAULT_CTA_MAX_DISPLAY
}

impl Default for CtaSettings {
    fn default() -> Self {
        Self {
            fallback_branch: None,
            max_display: default_max_display(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionChip {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub target_branch: Option<String>,
}

/// `action_chips` may be a mapping keyed by chip-ID (current schema) or an
/// ordered sequence (legacy). Both deserialize into the same ordered list.
#[derive(Debug, Clone, Default)]
pub struct ActionChips(pub Vec<ActionChip>);

impl Serialize for ActionChips {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActionChips {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Mapping(HashMap<String, ActionChip>),
            Sequence(Vec<ActionChip>),
        }

        let raw = Raw::deserialize(deserializer)?;
        let chips = match raw {
            Raw::Sequence(v) => v,
            Raw::Mapping(m) => {
                let mut v: Vec<(String, ActionChip)> = m.into_iter().collect();
                v.sort_by(|a, b| a.0.cmp(&b.0));
                v.into_iter().map(|(_, c)| c).collect()
            }
        };
        Ok(ActionChips(chips))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowcaseItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub available_ctas: Option<AvailableCtas>,
    #[serde(default = "bool_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    pub label: String,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub subfields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityRule {
    pub field: String,
    pub value: String,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FulfillmentSpec {
    /// "lambda" or "s3"; absent means neither nested-function nor archive fires.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub function_name: Option<String>,
    #[serde(default)]
    pub email_to: Option<String>,
    #[serde(default)]
    pub sms_to: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationalForm {
    pub title: String,
    #[serde(default = "bool_true")]
    pub enabled: bool,
    #[serde(default)]
    pub trigger_phrases: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub fulfillment: FulfillmentSpec,
    #[serde(default)]
    pub priority_rules: Vec<PriorityRule>,
    #[serde(default)]
    pub cta_text: Option<String>,
    /// Explicit program tag. Explicit-path configs should set this rather than
    /// relying on the legacy form-id/branch-name inference (spec Open Questions).
    #[serde(default)]
    pub program: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BubbleIntegration {
    pub webhook_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwsBinding {
    #[serde(default)]
    pub knowledge_base_id: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingPreferences {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    1024
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for StreamingPreferences {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

// ---------------------------------------------------------------------
// Request / session shapes
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionContext {
    #[serde(default)]
    pub completed_forms: Vec<String>,
    #[serde(default)]
    pub suspended_forms: Vec<String>,
    #[serde(default)]
    pub program_interest: Option<String>,
}

/// Wire shape of `routing_metadata`. Deserializes straight off the request
/// body; converted to the tagged `RoutingMetadata` enum before it reaches C5.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawRoutingMetadata {
    #[serde(default)]
    pub action_chip_triggered: bool,
    #[serde(default)]
    pub action_chip_id: Option<String>,
    #[serde(default)]
    pub cta_triggered: bool,
    #[serde(default)]
    pub cta_id: Option<String>,
    #[serde(default)]
    pub target_branch: Option<String>,
}

/// Tagged sum type removing the "did the caller set this field?" ambiguity
/// from the raw wire shape (see spec Design Notes / REDESIGN FLAGS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingMetadata {
    ActionChip { target_branch: Option<String> },
    CtaClick { target_branch: Option<String> },
    FreeForm,
}

impl From<RawRoutingMetadata> for RoutingMetadata {
    fn from(raw: RawRoutingMetadata) -> Self {
        if raw.action_chip_triggered {
            RoutingMetadata::ActionChip {
                target_branch: raw.target_branch,
            }
        } else if raw.cta_triggered {
            RoutingMetadata::CtaClick {
                target_branch: raw.target_branch,
            }
        } else {
            RoutingMetadata::FreeForm
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub tenant_hash: String,
    #[serde(default)]
    pub user_input: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub session_context: SessionContext,
    #[serde(default)]
    pub routing_metadata: RawRoutingMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormRequest {
    pub tenant_hash: String,
    pub action: String,
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(default)]
    pub field_id: Option<String>,
    #[serde(default)]
    pub field_value: Option<String>,
    #[serde(default)]
    pub form_data: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub session_context: SessionContext,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

// ---------------------------------------------------------------------
// Persisted records
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSubmissionRecord {
    pub submission_id: String,
    pub tenant_id: String,
    pub form_id: String,
    pub form_data: HashMap<String, serde_json::Value>,
    pub priority: String,
    pub submitted_at: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsUsageRecord {
    pub tenant_id: String,
    pub month: String,
    pub count: u32,
    pub updated_at: String,
}
