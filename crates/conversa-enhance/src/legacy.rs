//! Backward-compatible enhancement paths that only fire when no explicit
//! routing survived (spec §4.8 rules 3-4, §9 Design Notes: "retain as a
//! clearly-named fallback function that is never called on the explicit
//! path").

use conversa_core::model::{ConversationalForm, TenantConfig};

/// Fixed priority order for the legacy keyword-based branch enhancement.
pub const KEYWORD_BRANCH_PRIORITY: &[&str] = &[
    "program_exploration",
    "volunteer_interest",
    "requirements_discussion",
    "lovebox_discussion",
    "daretodream_discussion",
];

/// Bounded engagement-expression check: the user message must contain one of
/// a small set of markers before keyword-matched assistant text triggers CTAs.
const ENGAGEMENT_MARKERS: &[&str] = &[
    "tell me",
    "more",
    "interested",
    "how",
    "what",
    "when",
    "where",
    "sign up",
    "apply",
    "learn",
];

pub fn expresses_engagement(user_message: &str) -> bool {
    let lower = user_message.to_lowercase();
    ENGAGEMENT_MARKERS.iter().any(|m| lower.contains(m))
}

/// First branch (in fixed priority order) whose `detection_keywords` case-
/// insensitively substring-match `assistant_text`.
pub fn detect_branch_by_keywords<'a>(
    assistant_text: &str,
    tenant_config: &'a TenantConfig,
) -> Option<&'a str> {
    let lower_text = assistant_text.to_lowercase();
    for branch_name in KEYWORD_BRANCH_PRIORITY {
        if let Some(branch) = tenant_config.conversation_branches.get(*branch_name) {
            if branch
                .detection_keywords
                .iter()
                .any(|k| lower_text.contains(&k.to_lowercase()))
            {
                return Some(branch_name);
            }
        }
    }
    None
}

/// First enabled form whose `trigger_phrases` case-insensitively substring-
/// match `user_message`. Forms are scanned in form-id sorted order so the
/// result is deterministic across runs of an unordered config map.
pub fn detect_form_by_trigger<'a>(
    user_message: &str,
    forms: &'a std::collections::HashMap<String, ConversationalForm>,
) -> Option<(&'a str, &'a ConversationalForm)> {
    let lower_message = user_message.to_lowercase();
    let mut ids: Vec<&String> = forms.keys().collect();
    ids.sort();
    for id in ids {
        let form = &forms[id];
        if !form.enabled {
            continue;
        }
        if form
            .trigger_phrases
            .iter()
            .any(|p| lower_message.contains(&p.to_lowercase()))
        {
            return Some((id.as_str(), form));
        }
    }
    None
}
