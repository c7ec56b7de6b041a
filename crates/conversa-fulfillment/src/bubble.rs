//! Human-readable key rendering for the Bubble integration payload (§4.10).
//!
//! Simple fields use their `label` normalized to snake_case; composite
//! (dotted) keys expose each subfield by the subfield's normalized label.
//! Unknown keys fall back to the portion after the last `.`.

use conversa_core::model::ConversationalForm;
use std::collections::HashMap;

pub fn humanize_form_data(
    form_data: &HashMap<String, serde_json::Value>,
    form: Option<&ConversationalForm>,
) -> serde_json::Map<String, serde_json::Value> {
    let mut out = serde_json::Map::new();
    for (key, value) in form_data {
        let human_key = humanize_key(key, form);
        out.insert(human_key, value.clone());
    }
    out
}

fn humanize_key(key: &str, form: Option<&ConversationalForm>) -> String {
    if let Some((parent, child)) = key.split_once('.') {
        if let Some(form) = form {
            if let Some(parent_field) = form.fields.iter().find(|f| f.id == parent) {
                if let Some(sub) = parent_field.subfields.iter().find(|s| s.id == child) {
                    return snake_case(&sub.label);
                }
            }
        }
        return key.rsplit('.').next().unwrap_or(key).to_string();
    }

    if let Some(form) = form {
        if let Some(field) = form.fields.iter().find(|f| f.id == key) {
            return snake_case(&field.label);
        }
    }

    key.to_string()
}

fn snake_case(label: &str) -> String {
    let mut out = String::new();
    let mut last_was_sep = true;
    for c in label.chars() {
        if c.is_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversa_core::model::{FormField, FulfillmentSpec};

    fn form_with_fields() -> ConversationalForm {
        ConversationalForm {
            title: "Volunteer Application".into(),
            enabled: true,
            trigger_phrases: vec![],
            fields: vec![
                FormField {
                    id: "first_name".into(),
                    label: "First Name".into(),
                    field_type: None,
                    subfields: vec![],
                },
                FormField {
                    id: "emergency_contact".into(),
                    label: "Emergency Contact".into(),
                    field_type: Some("composite".into()),
                    subfields: vec![FormField {
                        id: "phone".into(),
                        label: "Contact Phone Number".into(),
                        field_type: None,
                        subfields: vec![],
                    }],
                },
            ],
            fulfillment: FulfillmentSpec::default(),
            priority_rules: vec![],
            cta_text: None,
            program: None,
        }
    }

    #[test]
    fn simple_field_uses_normalized_label() {
        let form = form_with_fields();
        let mut data = HashMap::new();
        data.insert("first_name".to_string(), serde_json::json!("Ada"));
        let humanized = humanize_form_data(&data, Some(&form));
        assert_eq!(humanized.get("first_name").unwrap(), "Ada");
    }

    #[test]
    fn composite_subfield_uses_normalized_subfield_label() {
        let form = form_with_fields();
        let mut data = HashMap::new();
        data.insert("emergency_contact.phone".to_string(), serde_json::json!("555-1234"));
        let humanized = humanize_form_data(&data, Some(&form));
        assert!(humanized.contains_key("contact_phone_number"));
    }

    #[test]
    fn unknown_key_falls_back_to_trailing_segment() {
        let form = form_with_fields();
        let mut data = HashMap::new();
        data.insert("mystery.inner_field".to_string(), serde_json::json!("x"));
        let humanized = humanize_form_data(&data, Some(&form));
        assert!(humanized.contains_key("inner_field"));
    }

    #[test]
    fn no_form_falls_back_to_key_as_is() {
        let mut data = HashMap::new();
        data.insert("raw_key".to_string(), serde_json::json!(1));
        let humanized = humanize_form_data(&data, None);
        assert!(humanized.contains_key("raw_key"));
    }
}
