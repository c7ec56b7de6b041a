//! Priority determination (§4.9), evaluated top-down: urgency field, then
//! tenant-declared `priority_rules`, then the form-type default table.

use std::collections::HashMap;

use conversa_core::model::PriorityRule;

/// `determine_priority(form_id, form_data, priority_rules) -> "high" | "normal" | "low"`.
pub fn determine_priority(
    form_id: &str,
    form_data: &HashMap<String, serde_json::Value>,
    priority_rules: &[PriorityRule],
) -> String {
    if let Some(urgency) = form_data.get("urgency").and_then(|v| v.as_str()) {
        let normalized = urgency.to_lowercase();
        match normalized.as_str() {
            "immediate" | "urgent" | "high" => return "high".to_string(),
            "normal" | "this week" => return "normal".to_string(),
            _ => return "low".to_string(),
        }
    }

    for rule in priority_rules {
        if let Some(value) = form_data.get(&rule.field).and_then(|v| v.as_str()) {
            if value == rule.value {
                return rule.priority.clone();
            }
        }
    }

    default_for_form(form_id).to_string()
}

fn default_for_form(form_id: &str) -> &'static str {
    match form_id {
        "request_support" => "high",
        "volunteer_apply" | "lb_apply" | "dd_apply" | "donation" | "contact" => "normal",
        "newsletter" => "low",
        _ => "normal",
    }
}
