use conversa_core::model::{RoutingMetadata, SessionContext, TenantConfig};
use serde_json::json;

use crate::cards::{CtaCard, Position};
use crate::cta_builder;
use crate::legacy::{detect_branch_by_keywords, detect_form_by_trigger, expresses_engagement};
use crate::program::{derive_form_program, derive_program, display_name, display_name_from_title};
use crate::resolver::resolve_branch;
use crate::showcase;

#[derive(Debug, Clone, serde::Serialize)]
pub struct EnhancementResult {
    pub message: String,
    pub cta_buttons: Vec<CtaCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showcase_card: Option<showcase::ShowcaseResolution>,
    pub metadata: serde_json::Value,
}

/// `enhance(assistant_text, user_message, tenant_hash, session_context, routing_metadata)
///  -> { message, cta_buttons[], showcase_card?, metadata }` (C8).
///
/// Rules are evaluated in order; the first whose guard fires is authoritative
/// and the rest are skipped. Every lookup here resolves through `Option`/empty
/// collections rather than indexing or unwrapping, so a missing branch, CTA,
/// or form degrades to rule 5 (no CTAs) rather than failing the request — the
/// assistant message itself is always returned intact.
pub fn enhance(
    assistant_text: &str,
    user_message: &str,
    session_context: &SessionContext,
    routing_metadata: &RoutingMetadata,
    tenant_config: &TenantConfig,
) -> EnhancementResult {
    // Rule 1: explicit routing path.
    if let Some(route) = resolve_branch(routing_metadata, tenant_config) {
        let cta_buttons = cta_builder::build(&route.branch, tenant_config, &session_context.completed_forms);
        let showcase_card = showcase::for_branch(&route.branch, tenant_config);
        let metadata = json!({
            "enhanced": true,
            "routing_tier": "explicit",
            "routing_method": route.method.as_str(),
            "branch": route.branch,
            "has_showcase": showcase_card.is_some(),
        });
        return EnhancementResult {
            message: assistant_text.to_string(),
            cta_buttons,
            showcase_card,
            metadata,
        };
    }

    // Rule 2: suspended-form program switch.
    if let Some(suspended_form_id) = session_context.suspended_forms.first() {
        if let Some((detected_id, detected_form)) =
            detect_form_by_trigger(user_message, &tenant_config.conversational_forms)
        {
            if detected_id != suspended_form_id {
                let suspended_program_name = session_context
                    .program_interest
                    .as_deref()
                    .and_then(display_name)
                    .map(str::to_string)
                    .or_else(|| {
                        tenant_config
                            .conversational_forms
                            .get(suspended_form_id)
                            .map(|f| display_name_from_title(&f.title))
                    })
                    .unwrap_or_else(|| suspended_form_id.clone());

                let new_program_name = derive_form_program(detected_id, detected_form)
                    .as_deref()
                    .and_then(display_name)
                    .map(str::to_string)
                    .unwrap_or_else(|| display_name_from_title(&detected_form.title));

                let metadata = json!({
                    "enhanced": false,
                    "program_switch_detected": true,
                    "suspended_form": {
                        "form_id": suspended_form_id,
                        "program_name": suspended_program_name,
                    },
                    "new_form_of_interest": {
                        "form_id": detected_id,
                        "program_name": new_program_name,
                        "cta_text": detected_form.cta_text,
                        "fields": detected_form.fields,
                    },
                });
                return EnhancementResult {
                    message: assistant_text.to_string(),
                    cta_buttons: Vec::new(),
                    showcase_card: None,
                    metadata,
                };
            }
        }

        let metadata = json!({
            "enhanced": false,
            "suspended_forms_detected": session_context.suspended_forms,
        });
        return EnhancementResult {
            message: assistant_text.to_string(),
            cta_buttons: Vec::new(),
            showcase_card: None,
            metadata,
        };
    }

    // Rule 3: form trigger (legacy).
    if let Some((form_id, form)) = detect_form_by_trigger(user_message, &tenant_config.conversational_forms) {
        let program = derive_form_program(form_id, form);
        let completed = program
            .as_ref()
            .map(|p| session_context.completed_forms.iter().any(|c| c == p))
            .unwrap_or(false);

        if !completed {
            let card = CtaCard {
                id: form_id.to_string(),
                label: form.cta_text.clone().unwrap_or_else(|| form.title.clone()),
                action: "start_form".to_string(),
                url: None,
                route: None,
                form_id: Some(form_id.to_string()),
                fields: Some(form.fields.clone()),
                program,
                position: Position::Primary,
                extra: {
                    let mut m = std::collections::HashMap::new();
                    m.insert("type".to_string(), json!("form_cta"));
                    m
                },
            };
            return EnhancementResult {
                message: assistant_text.to_string(),
                cta_buttons: vec![card],
                showcase_card: None,
                metadata: json!({ "enhanced": true, "routing_tier": "legacy_form_trigger" }),
            };
        }
    }

    // Rule 4: legacy keyword-based enhancement.
    if expresses_engagement(user_message) {
        if let Some(branch) = detect_branch_by_keywords(assistant_text, tenant_config) {
            let cta_buttons = cta_builder::build(branch, tenant_config, &session_context.completed_forms);
            let showcase_card = showcase::for_branch(branch, tenant_config);
            let metadata = json!({
                "enhanced": true,
                "routing_tier": "legacy_keyword",
                "branch": branch,
                "has_showcase": showcase_card.is_some(),
            });
            return EnhancementResult {
                message: assistant_text.to_string(),
                cta_buttons,
                showcase_card,
                metadata,
            };
        }
    }

    // Rule 5: no enhancement applies.
    EnhancementResult {
        message: assistant_text.to_string(),
        cta_buttons: Vec::new(),
        showcase_card: None,
        metadata: json!({ "enhanced": false }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversa_core::model::{
        AvailableCtas, ConversationBranch, ConversationalForm, CtaDefinition, CtaSettings, FulfillmentSpec,
    };
    use std::collections::HashMap;

    fn config_for_scenarios() -> TenantConfig {
        let mut cfg = TenantConfig::default();
        cfg.cta_definitions.insert(
            "volunteer_apply".into(),
            CtaDefinition {
                label: "Apply".into(),
                action: "start_form".into(),
                url: None,
                route: None,
                form_id: Some("volunteer_apply".into()),
                program: Some("volunteer".into()),
                cta_type: None,
                style: None,
                extra: HashMap::new(),
            },
        );
        cfg.cta_definitions.insert(
            "view_programs".into(),
            CtaDefinition {
                label: "View programs".into(),
                action: "navigate".into(),
                url: None,
                route: Some("/programs".into()),
                form_id: None,
                program: None,
                cta_type: None,
                style: None,
                extra: HashMap::new(),
            },
        );
        cfg.conversation_branches.insert(
            "volunteer_interest".into(),
            ConversationBranch {
                available_ctas: AvailableCtas {
                    primary: Some("volunteer_apply".into()),
                    secondary: vec!["view_programs".into()],
                },
                showcase_item_id: None,
                detection_keywords: vec![],
            },
        );
        cfg.conversation_branches.insert(
            "navigation_hub".into(),
            ConversationBranch {
                available_ctas: AvailableCtas {
                    primary: Some("view_programs".into()),
                    secondary: vec![],
                },
                showcase_item_id: None,
                detection_keywords: vec![],
            },
        );
        cfg.conversational_forms.insert(
            "dd_apply".into(),
            ConversationalForm {
                title: "Dare to Dream Application".into(),
                enabled: true,
                trigger_phrases: vec!["dare to dream".into()],
                fields: vec![],
                fulfillment: FulfillmentSpec::default(),
                priority_rules: vec![],
                cta_text: Some("Apply to Dare to Dream".into()),
                program: None,
            },
        );
        cfg.cta_settings = CtaSettings {
            fallback_branch: Some("navigation_hub".into()),
            max_display: 3,
        };
        cfg
    }

    #[test]
    fn scenario_action_chip_valid_branch() {
        let cfg = config_for_scenarios();
        let routing = RoutingMetadata::ActionChip {
            target_branch: Some("volunteer_interest".into()),
        };
        let result = enhance("hi", "hello", &SessionContext::default(), &routing, &cfg);
        assert_eq!(result.cta_buttons.len(), 2);
        assert_eq!(result.cta_buttons[0].id, "volunteer_apply");
        assert_eq!(result.metadata["routing_tier"], "explicit");
        assert_eq!(result.metadata["routing_method"], "action_chip");
    }

    #[test]
    fn scenario_action_chip_invalid_falls_back() {
        let cfg = config_for_scenarios();
        let routing = RoutingMetadata::ActionChip {
            target_branch: Some("nonexistent".into()),
        };
        let result = enhance("hi", "hello", &SessionContext::default(), &routing, &cfg);
        assert_eq!(result.metadata["routing_method"], "fallback");
        assert_eq!(result.cta_buttons[0].id, "view_programs");
    }

    #[test]
    fn scenario_free_form_no_fallback() {
        let mut cfg = config_for_scenarios();
        cfg.cta_settings.fallback_branch = None;
        let result = enhance("hi", "hello", &SessionContext::default(), &RoutingMetadata::FreeForm, &cfg);
        assert!(result.cta_buttons.is_empty());
        assert_eq!(result.metadata["enhanced"], false);
    }

    #[test]
    fn scenario_suspended_form_program_switch() {
        let cfg = config_for_scenarios();
        let session = SessionContext {
            completed_forms: vec![],
            suspended_forms: vec!["volunteer_apply".into()],
            program_interest: Some("lovebox".into()),
        };
        let result = enhance(
            "hi",
            "Tell me about Dare to Dream",
            &session,
            &RoutingMetadata::FreeForm,
            &cfg,
        );
        assert!(result.cta_buttons.is_empty());
        assert_eq!(result.metadata["program_switch_detected"], true);
        assert_eq!(result.metadata["suspended_form"]["program_name"], "Love Box");
        assert_eq!(result.metadata["new_form_of_interest"]["form_id"], "dd_apply");
        assert_eq!(
            result.metadata["new_form_of_interest"]["program_name"],
            "Dare to Dream"
        );
    }
}
