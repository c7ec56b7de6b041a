use conversa_core::model::{AvailableCtas, ShowcaseItem, TenantConfig};
use serde::{Deserialize, Serialize};

use crate::cards::{CtaCard, Position, ResolvedCtas};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowcaseResolution {
    #[serde(flatten)]
    pub item: ShowcaseItem,
    pub resolved_ctas: ResolvedCtas,
}

/// `for_branch(branch_name, tenant_config) -> { item, resolved_ctas } | null` (C7).
pub fn for_branch(branch_name: &str, tenant_config: &TenantConfig) -> Option<ShowcaseResolution> {
    let branch = tenant_config.conversation_branches.get(branch_name)?;
    let item_id = branch.showcase_item_id.as_ref()?;
    let item = tenant_config
        .content_showcase
        .iter()
        .find(|i| &i.id == item_id)?;

    if !item.enabled {
        return None;
    }

    let ctas: &AvailableCtas = item.available_ctas.as_ref().unwrap_or(&branch.available_ctas);
    let resolved = resolve(ctas, tenant_config);

    Some(ShowcaseResolution {
        item: item.clone(),
        resolved_ctas: resolved,
    })
}

fn resolve(ctas: &AvailableCtas, tenant_config: &TenantConfig) -> ResolvedCtas {
    let primary = ctas.primary.as_ref().and_then(|id| {
        tenant_config
            .cta_definitions
            .get(id)
            .map(|def| CtaCard::from_definition(id, def, Position::Primary))
    });

    let secondary = ctas
        .secondary
        .iter()
        .filter_map(|id| {
            tenant_config
                .cta_definitions
                .get(id)
                .map(|def| CtaCard::from_definition(id, def, Position::Secondary))
        })
        .collect();

    ResolvedCtas { primary, secondary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversa_core::model::{ConversationBranch, CtaDefinition};
    use std::collections::HashMap;

    fn config_with_showcase(item_enabled: bool, item_has_own_ctas: bool) -> TenantConfig {
        let mut cfg = TenantConfig::default();
        cfg.cta_definitions.insert(
            "cta_a".into(),
            CtaDefinition {
                label: "A".into(),
                action: "navigate".into(),
                url: None,
                route: None,
                form_id: None,
                program: None,
                cta_type: None,
                style: None,
                extra: HashMap::new(),
            },
        );
        cfg.conversation_branches.insert(
            "branch1".into(),
            ConversationBranch {
                available_ctas: AvailableCtas {
                    primary: Some("cta_a".into()),
                    secondary: vec![],
                },
                showcase_item_id: Some("item1".into()),
                detection_keywords: vec![],
            },
        );
        cfg.content_showcase.push(ShowcaseItem {
            id: "item1".into(),
            item_type: "program".into(),
            name: "Love Box".into(),
            tagline: None,
            description: "desc".into(),
            image_url: None,
            highlights: vec![],
            available_ctas: if item_has_own_ctas {
                Some(AvailableCtas {
                    primary: None,
                    secondary: vec![],
                })
            } else {
                None
            },
            enabled: item_enabled,
        });
        cfg
    }

    #[test]
    fn disabled_item_returns_none() {
        let cfg = config_with_showcase(false, false);
        assert!(for_branch("branch1", &cfg).is_none());
    }

    #[test]
    fn missing_showcase_returns_none() {
        let cfg = TenantConfig::default();
        assert!(for_branch("branch1", &cfg).is_none());
    }

    #[test]
    fn falls_back_to_branch_ctas_when_item_has_none() {
        let cfg = config_with_showcase(true, false);
        let res = for_branch("branch1", &cfg).unwrap();
        assert!(res.resolved_ctas.primary.is_some());
    }

    #[test]
    fn item_own_ctas_take_precedence() {
        let cfg = config_with_showcase(true, true);
        let res = for_branch("branch1", &cfg).unwrap();
        assert!(res.resolved_ctas.primary.is_none());
    }
}
