use conversa_core::model::{ConversationTurn, TenantConfig};
use tracing::debug;

use crate::blocks::{
    ANTI_HALLUCINATION_RULES, CAPABILITY_BOUNDARIES, CONTEXT_INTERPRETATION_RULES,
    DEFAULT_ROLE_INSTRUCTIONS, ESSENTIAL_INSTRUCTIONS, HISTORY_REUSE_REMINDER,
    LOOP_PREVENTION_RULES, NO_INLINE_CTA_DIRECTIVE, URL_CONTACT_PRESERVATION_RULES,
};
use crate::contracts::formatting_contract;

/// `build_prompt(user_input, kb_context, tenant_config, conversation_history) -> String` (C3).
///
/// Sections are concatenated in a fixed order; a section whose input is
/// empty is omitted entirely. The formatting contract is always last so
/// recency bias favors style compliance (spec §4.3 Rationale).
pub struct PromptComposer;

impl PromptComposer {
    pub fn build(
        user_input: &str,
        kb_context: &str,
        tenant_config: &TenantConfig,
        conversation_history: &[ConversationTurn],
    ) -> String {
        let mut sections: Vec<String> = Vec::new();

        sections.push(role_instructions(tenant_config));

        if let Some(history_section) = previous_conversation(conversation_history) {
            sections.push(history_section);
            sections.push(CONTEXT_INTERPRETATION_RULES.to_string());
            sections.push(CAPABILITY_BOUNDARIES.to_string());
            sections.push(LOOP_PREVENTION_RULES.to_string());
        }

        sections.push(knowledge_section(kb_context, tenant_config));

        if !tenant_config.custom_constraints.is_empty() {
            let mut block = String::from("CUSTOM INSTRUCTIONS:\n");
            for rule in &tenant_config.custom_constraints {
                block.push_str(rule);
                block.push('\n');
            }
            sections.push(block.trim_end().to_string());
        }

        sections.push(format!("CURRENT USER QUESTION: {}", user_input));

        if !kb_context.is_empty() {
            sections.push(NO_INLINE_CTA_DIRECTIVE.to_string());
        }

        sections.push(formatting_contract(&tenant_config.formatting_preferences));

        let prompt = sections
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        debug!(
            chars = prompt.len(),
            kb_present = !kb_context.is_empty(),
            history_turns = conversation_history.len(),
            "assembled prompt"
        );

        prompt
    }
}

fn role_instructions(tenant_config: &TenantConfig) -> String {
    tenant_config
        .role_instructions
        .as_ref()
        .filter(|s| !s.trim().is_empty())
        .or(tenant_config.tone_prompt.as_ref())
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_ROLE_INSTRUCTIONS.to_string())
}

fn previous_conversation(history: &[ConversationTurn]) -> Option<String> {
    let lines: Vec<String> = history
        .iter()
        .filter(|t| !t.content.trim().is_empty())
        .map(|t| format!("{}: {}", capitalize(&t.role), t.content.trim()))
        .collect();

    if lines.is_empty() {
        return None;
    }

    Some(format!(
        "PREVIOUS CONVERSATION:\n{}\n\n{}",
        lines.join("\n"),
        HISTORY_REUSE_REMINDER
    ))
}

fn capitalize(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn knowledge_section(kb_context: &str, tenant_config: &TenantConfig) -> String {
    if kb_context.is_empty() {
        return tenant_config.fallback_message.clone();
    }

    format!(
        "{}\n\n{}\n\n{}\n\nKNOWLEDGE BASE INFORMATION:\n{}",
        ANTI_HALLUCINATION_RULES, URL_CONTACT_PRESERVATION_RULES, ESSENTIAL_INSTRUCTIONS, kb_context
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversa_core::model::TenantConfig;

    #[test]
    fn empty_history_omits_locked_blocks() {
        let cfg = TenantConfig::default();
        let prompt = PromptComposer::build("hi", "", &cfg, &[]);
        assert!(!prompt.contains("CONTEXT INTERPRETATION RULES"));
        assert!(prompt.contains(DEFAULT_ROLE_INSTRUCTIONS));
        assert!(prompt.contains("CURRENT USER QUESTION: hi"));
    }

    #[test]
    fn non_empty_history_adds_locked_blocks_in_order() {
        let cfg = TenantConfig::default();
        let history = vec![ConversationTurn {
            role: "user".into(),
            content: "hello".into(),
        }];
        let prompt = PromptComposer::build("more", "", &cfg, &history);
        let ctx_pos = prompt.find("CONTEXT INTERPRETATION RULES").unwrap();
        let cap_pos = prompt.find("CAPABILITY BOUNDARIES").unwrap();
        let loop_pos = prompt.find("LOOP PREVENTION RULES").unwrap();
        assert!(ctx_pos < cap_pos && cap_pos < loop_pos);
    }

    #[test]
    fn empty_kb_context_falls_back_to_fallback_message_and_omits_cta_directive() {
        let mut cfg = TenantConfig::default();
        cfg.fallback_message = "Ask a human!".to_string();
        let prompt = PromptComposer::build("q", "", &cfg, &[]);
        assert!(prompt.contains("Ask a human!"));
        assert!(!prompt.contains("Do not include call-to-action"));
    }

    #[test]
    fn non_empty_kb_context_adds_knowledge_rules_and_cta_directive() {
        let cfg = TenantConfig::default();
        let prompt = PromptComposer::build("q", "Some facts", &cfg, &[]);
        assert!(prompt.contains("ANTI-HALLUCINATION RULES"));
        assert!(prompt.contains("KNOWLEDGE BASE INFORMATION:\nSome facts"));
        assert!(prompt.contains("Do not include call-to-action"));
    }

    #[test]
    fn formatting_contract_is_last_section() {
        let cfg = TenantConfig::default();
        let prompt = PromptComposer::build("q", "facts", &cfg, &[]);
        let contract_pos = prompt.find("FORMATTING CONTRACT:").unwrap();
        assert!(contract_pos > prompt.find("CURRENT USER QUESTION").unwrap());
        assert_eq!(contract_pos, prompt.rfind("FORMATTING CONTRACT:").unwrap());
        assert!(prompt.trim_end().ends_with(prompt[contract_pos..].trim_end()));
    }

    #[test]
    fn role_instructions_fall_back_to_tone_prompt_then_default() {
        let mut cfg = TenantConfig::default();
        cfg.tone_prompt = Some("Be cheerful".to_string());
        let prompt = PromptComposer::build("q", "", &cfg, &[]);
        assert!(prompt.contains("Be cheerful"));

        let cfg2 = TenantConfig::default();
        let prompt2 = PromptComposer::build("q", "", &cfg2, &[]);
        assert!(prompt2.contains(DEFAULT_ROLE_INSTRUCTIONS));
    }
}
