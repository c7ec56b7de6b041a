use conversa_core::model::{RoutingMetadata, TenantConfig};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMethod {
    ActionChip,
    Cta,
    Fallback,
}

impl RoutingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingMethod::ActionChip => "action_chip",
            RoutingMethod::Cta => "cta",
            RoutingMethod::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub branch: String,
    pub method: RoutingMethod,
}

/// `resolve_branch(routing_metadata, tenant_config) -> branch_name | null` (C5).
///
/// The wire format carries a single shared `target_branch` for both the
/// action-chip and cta-click tiers, so a tier that fails never needs a
/// second attempt at the same (already-invalid) branch name — falling
/// straight through to the fallback tier is equivalent to re-checking tier 2.
pub fn resolve_branch(routing: &RoutingMetadata, tenant_config: &TenantConfig) -> Option<ResolvedRoute> {
    match routing {
        RoutingMetadata::ActionChip { target_branch } => {
            attempt_tier(target_branch, tenant_config, RoutingMethod::ActionChip)
                .or_else(|| fallback_tier(tenant_config))
        }
        RoutingMetadata::CtaClick { target_branch } => {
            attempt_tier(target_branch, tenant_config, RoutingMethod::Cta)
                .or_else(|| fallback_tier(tenant_config))
        }
        RoutingMetadata::FreeForm => fallback_tier(tenant_config),
    }
}

fn attempt_tier(
    target_branch: &Option<String>,
    tenant_config: &TenantConfig,
    method: RoutingMethod,
) -> Option<ResolvedRoute> {
    let target = target_branch.as_ref()?;
    if target.is_empty() {
        return None;
    }
    if tenant_config.conversation_branches.contains_key(target) {
        Some(ResolvedRoute {
            branch: target.clone(),
            method,
        })
    } else {
        warn!(branch = %target, tier = method.as_str(), "routing target_branch not found; falling through");
        None
    }
}

fn fallback_tier(tenant_config: &TenantConfig) -> Option<ResolvedRoute> {
    let fallback = tenant_config.cta_settings.fallback_branch.as_ref()?;
    if tenant_config.conversation_branches.contains_key(fallback) {
        Some(ResolvedRoute {
            branch: fallback.clone(),
            method: RoutingMethod::Fallback,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversa_core::model::{AvailableCtas, ConversationBranch, CtaSettings};
    use std::collections::HashMap;

    fn cfg_with_branches(names: &[&str], fallback: Option<&str>) -> TenantConfig {
        let mut branches = HashMap::new();
        for n in names {
            branches.insert(
                n.to_string(),
                ConversationBranch {
                    available_ctas: AvailableCtas::default(),
                    showcase_item_id: None,
                    detection_keywords: vec![],
                },
            );
        }
        let mut cfg = TenantConfig::default();
        cfg.conversation_branches = branches;
        cfg.cta_settings = CtaSettings {
            fallback_branch: fallback.map(|s| s.to_string()),
            max_display: 3,
        };
        cfg
    }

    #[test]
    fn action_chip_valid_branch_wins() {
        let cfg = cfg_with_branches(&["volunteer_interest"], None);
        let routing = RoutingMetadata::ActionChip {
            target_branch: Some("volunteer_interest".into()),
        };
        let route = resolve_branch(&routing, &cfg).unwrap();
        assert_eq!(route.branch, "volunteer_interest");
        assert_eq!(route.method, RoutingMethod::ActionChip);
    }

    #[test]
    fn action_chip_invalid_falls_back() {
        let cfg = cfg_with_branches(&["navigation_hub"], Some("navigation_hub"));
        let routing = RoutingMetadata::ActionChip {
            target_branch: Some("nonexistent".into()),
        };
        let route = resolve_branch(&routing, &cfg).unwrap();
        assert_eq!(route.branch, "navigation_hub");
        assert_eq!(route.method, RoutingMethod::Fallback);
    }

    #[test]
    fn free_form_no_fallback_returns_none() {
        let cfg = cfg_with_branches(&[], None);
        let route = resolve_branch(&RoutingMetadata::FreeForm, &cfg);
        assert!(route.is_none());
    }

    #[test]
    fn fallback_branch_invalid_is_null() {
        let cfg = cfg_with_branches(&[], Some("ghost"));
        let route = resolve_branch(&RoutingMetadata::FreeForm, &cfg);
        assert!(route.is_none());
    }
}
