//! The formatting contract (spec §4.3.8) is the last prompt section, positioned
//! there to exploit recency bias. Kept data-driven — a table mapping
//! `{response_style, detail_level, emoji_usage}` to contract text — so the
//! wording can be revised without touching `Composer::build`.

use conversa_core::model::{DetailLevel, EmojiUsage, FormattingPreferences, ResponseStyle};

fn style_contract(style: ResponseStyle) -> &'static str {
    match style {
        ResponseStyle::ProfessionalConcise => {
            "STYLE: professional_concise\n\
- Write the way a knowledgeable staff member would in a brief email: direct, warm enough \
to not feel robotic, no filler.\n\
- Substitutions: \"we're\" → \"we are\"; \"great\" → \"comprehensive\"; \"stuff\" → \
\"materials\"/\"resources\" as appropriate.\n\
- Correct: \"We are able to support families within a 30 mile radius.\"\n\
- Wrong: \"We're able to help out with stuff for families nearby!\"\n\
- Checklist before sending: no contractions, no slang, every claim traceable to context."
        }
        ResponseStyle::WarmConversational => {
            "STYLE: warm_conversational\n\
- Write like a friendly volunteer coordinator talking to someone they want to put at ease.\n\
- Substitutions: \"utilize\" → \"use\"; \"individuals\" → \"people\"; \"prior to\" → \
\"before\".\n\
- Correct: \"We'd love to have you join us — here's how it works.\"\n\
- Wrong: \"Utilize the aforementioned materials prior to your visit.\"\n\
- Checklist before sending: reads naturally aloud, no jargon, friendly but not overfamiliar."
        }
        ResponseStyle::StructuredDetailed => {
            "STYLE: structured_detailed\n\
- Organize the answer with short headings or numbered steps when there is more than one \
idea to convey.\n\
- Substitutions: \"a lot of\" → \"numerous\"; \"thing\" → the specific noun it stands in \
for.\n\
- Correct: \"1. Eligibility\\n2. Application steps\\n3. What happens next\"\n\
- Wrong: a single unbroken paragraph covering all three topics.\n\
- Checklist before sending: every structural break earns its place, no orphaned single-item \
lists."
        }
    }
}

fn length_contract(level: DetailLevel) -> &'static str {
    match level {
        DetailLevel::Concise => {
            "LENGTH: concise\n\
- Target 2-3 sentences total.\n\
- Checklist: cut any sentence that restates the question instead of answering it."
        }
        DetailLevel::Balanced => {
            "LENGTH: balanced\n\
- Target 4-6 sentences total.\n\
- Checklist: cover the direct answer plus one piece of relevant context, no more."
        }
        DetailLevel::Comprehensive => {
            "LENGTH: comprehensive\n\
- Target 8 or more sentences, organized under headings when the answer has multiple parts.\n\
- Checklist: every heading has at least two sentences beneath it."
        }
    }
}

fn emoji_contract(usage: EmojiUsage, max_emojis: u32) -> String {
    match usage {
        EmojiUsage::None => "EMOJI: none\n- Do not use any emoji in the response.".to_string(),
        EmojiUsage::Minimal => {
            "EMOJI: minimal\n- Use at most one emoji in the entire response, and only if it \
genuinely reinforces the message."
                .to_string()
        }
        EmojiUsage::Moderate => format!(
            "EMOJI: moderate\n- Use at most {} emoji in the entire response, placed where they \
reinforce rather than decorate the message.",
            max_emojis.max(1)
        ),
    }
}

pub fn formatting_contract(prefs: &FormattingPreferences) -> String {
    format!(
        "FORMATTING CONTRACT:\n{}\n\n{}\n\n{}",
        style_contract(prefs.response_style),
        length_contract(prefs.detail_level),
        emoji_contract(prefs.emoji_usage, prefs.max_emojis_per_response)
    )
}
