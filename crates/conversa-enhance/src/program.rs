use conversa_core::model::{ConversationalForm, CtaDefinition};

/// Program derivation for form CTAs (spec §4.6): explicit `program` field
/// first, else the legacy form-id mapping. `volunteer_general`'s
/// branch-name-bound mapping is intentionally NOT handled here — spec marks
/// it legacy-keyword-path-only (Open Questions).
pub fn derive_program(def: &CtaDefinition) -> Option<String> {
    if let Some(p) = &def.program {
        return Some(p.clone());
    }
    match def.form_id.as_deref() {
        Some("lb_apply") => Some("lovebox".to_string()),
        Some("dd_apply") => Some("daretodream".to_string()),
        _ => None,
    }
}

/// Program key for a conversational form, for the suspended-form
/// program-switch rule (spec §4.8 rule 2 / §9 Open Question: explicit-path
/// configs should name their program explicitly via `form.program`).
pub fn derive_form_program(form_id: &str, form: &ConversationalForm) -> Option<String> {
    if let Some(p) = &form.program {
        return Some(p.clone());
    }
    match form_id {
        "lb_apply" => Some("lovebox".to_string()),
        "dd_apply" => Some("daretodream".to_string()),
        _ => None,
    }
}

/// Human-readable program name, used by the suspended-form program-switch
/// rule (§4.8 rule 2).
pub fn display_name(program_key: &str) -> Option<&'static str> {
    match program_key {
        "lovebox" => Some("Love Box"),
        "daretodream" => Some("Dare to Dream"),
        "both" => Some("both programs"),
        "unsure" => Some("Volunteer"),
        _ => None,
    }
}

/// Fallback display name derived from a form's own title when no program
/// key maps through `display_name`.
pub fn display_name_from_title(title: &str) -> String {
    title
        .strip_suffix(" Application")
        .unwrap_or(title)
        .to_string()
}
