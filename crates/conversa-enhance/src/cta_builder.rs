use conversa_core::model::TenantConfig;

use crate::cards::{CtaCard, Position};
use crate::program::derive_program;

/// `build(branch_name, tenant_config, completed_forms) -> [CtaCard]` (C6).
pub fn build(branch_name: &str, tenant_config: &TenantConfig, completed_forms: &[String]) -> Vec<CtaCard> {
    let Some(branch) = tenant_config.conversation_branches.get(branch_name) else {
        return Vec::new();
    };

    let mut cards = Vec::new();

    if let Some(primary_id) = &branch.available_ctas.primary {
        if let Some(def) = tenant_config.cta_definitions.get(primary_id) {
            if !is_completed(def.is_form_cta().then(|| derive_program(def)).flatten(), completed_forms) {
                cards.push(CtaCard::from_definition(primary_id, def, Position::Primary));
            }
        }
    }

    for secondary_id in &branch.available_ctas.secondary {
        if let Some(def) = tenant_config.cta_definitions.get(secondary_id) {
            if !is_completed(def.is_form_cta().then(|| derive_program(def)).flatten(), completed_forms) {
                cards.push(CtaCard::from_definition(secondary_id, def, Position::Secondary));
            }
        }
    }

    cards.truncate(tenant_config.cta_settings.max_display);
    cards
}

fn is_completed(program: Option<String>, completed_forms: &[String]) -> bool {
    match program {
        Some(p) => completed_forms.iter().any(|c| c == &p),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversa_core::model::{AvailableCtas, ConversationBranch, CtaDefinition, CtaSettings};
    use std::collections::HashMap;

    fn base_config() -> TenantConfig {
        let mut cfg = TenantConfig::default();
        cfg.cta_definitions.insert(
            "volunteer_apply".to_string(),
            CtaDefinition {
                label: "Apply to volunteer".into(),
                action: "start_form".into(),
                url: None,
                route: None,
                form_id: Some("volunteer_apply".into()),
                program: Some("volunteer".into()),
                cta_type: None,
                style: Some(serde_json::json!({"color": "blue"})),
                extra: HashMap::new(),
            },
        );
        cfg.cta_definitions.insert(
            "view_programs".to_string(),
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
            "volunteer_interest".to_string(),
            ConversationBranch {
                available_ctas: AvailableCtas {
                    primary: Some("volunteer_apply".into()),
                    secondary: vec!["view_programs".into()],
                },
                showcase_item_id: None,
                detection_keywords: vec![],
            },
        );
        cfg.cta_settings = CtaSettings {
            fallback_branch: None,
            max_display: 3,
        };
        cfg
    }

    #[test]
    fn primary_first_then_secondary_no_style() {
        let cfg = base_config();
        let cards = build("volunteer_interest", &cfg, &[]);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, "volunteer_apply");
        assert_eq!(cards[0].position, Position::Primary);
        assert_eq!(cards[1].id, "view_programs");
        assert_eq!(cards[1].position, Position::Secondary);

        let json = serde_json::to_value(&cards[0]).unwrap();
        assert!(json.get("style").is_none());
    }

    #[test]
    fn missing_branch_yields_empty() {
        let cfg = base_config();
        assert!(build("nonexistent", &cfg, &[]).is_empty());
    }

    #[test]
    fn completed_program_drops_primary() {
        let cfg = base_config();
        let cards = build("volunteer_interest", &cfg, &["volunteer".to_string()]);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "view_programs");
    }

    #[test]
    fn respects_max_display() {
        let mut cfg = base_config();
        cfg.cta_settings.max_display = 1;
        let cards = build("volunteer_interest", &cfg, &[]);
        assert_eq!(cards.len(), 1);
    }
}
