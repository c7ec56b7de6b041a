use std::collections::HashMap;

use conversa_core::model::{CtaDefinition, FormField};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Primary,
    Secondary,
}

/// Outbound CTA card (§6.1 CTA card schema). The `style` field never appears
/// here — it is excluded by construction, not filtered out after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtaCard {
    pub id: String,
    pub label: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(rename = "formId", skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FormField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(rename = "_position")]
    pub position: Position,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl CtaCard {
    /// Build a card from a definition, attaching `id` and `_position`, with
    /// `style` dropped (it is never copied into `extra` to begin with).
    pub fn from_definition(id: &str, def: &CtaDefinition, position: Position) -> Self {
        Self {
            id: id.to_string(),
            label: def.label.clone(),
            action: def.action.clone(),
            url: def.url.clone(),
            route: def.route.clone(),
            form_id: def.form_id.clone(),
            fields: None,
            program: def.program.clone(),
            position,
            extra: def.extra.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResolvedCtas {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<CtaCard>,
    pub secondary: Vec<CtaCard>,
}
