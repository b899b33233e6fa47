use crate::config::GenerationConfig;
use crate::generation::GenerationRequest;
use crate::modules::analysis::AnalysisResult;
use crate::modules::memory::ConversationEntry;
use crate::modules::mood::MoodModifiers;
use crate::modules::persona::{interaction_dynamic, Persona, PersonaKind};

const MAX_TRIGGER_LINES: usize = 3;
const START_OF_CONVERSATION: &str = "This is the start of the conversation.";

/// Everything a prompt may draw on besides the speaking persona.
pub struct PromptContext<'a> {
    pub user_message: &'a str,
    pub analysis: &'a AnalysisResult,
    pub history: &'a [String],
    pub relevant: &'a [ConversationEntry],
    pub modifiers: MoodModifiers,
    pub mood_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoastTarget {
    User,
    Persona(PersonaKind),
}

impl RoastTarget {
    pub fn label(&self) -> &'static str {
        match self {
            RoastTarget::User => "you",
            RoastTarget::Persona(kind) => kind.name(),
        }
    }
}

pub fn response_request(persona: &Persona, context: &PromptContext<'_>, config: &GenerationConfig) -> GenerationRequest {
    let mut system = persona_header(persona, context);
    system.push_str(&guidelines(context.modifiers));
    system.push_str(&shared_context(persona, context));

    GenerationRequest::new(system, format!("User: {}", context.user_message))
        .with_temperature(config.temperature)
        .with_max_tokens(scaled_tokens(config.max_tokens, context.modifiers))
}

pub fn roast_request(
    persona: &Persona,
    target: RoastTarget,
    intensity: i32,
    context: &PromptContext<'_>,
    config: &GenerationConfig,
) -> GenerationRequest {
    let profile = persona.profile();
    let mut system = format!(
        "You are {}. Write a single-line roast aimed at {}.\n\n\
         ROASTER:\n- Signature: {}\n- Speech: {}\n- Roast style: {}\n- Strategy: {}\n\
         - Mood: {} ({}/100)\n- Heat: {}/10\n",
        profile.name,
        target.label(),
        profile.roast_signature,
        profile.speech_patterns.join(", "),
        profile.roast_style,
        profile.strategy.as_str(),
        context.mood_label,
        persona.mood,
        intensity,
    );

    if let RoastTarget::Persona(kind) = target {
        let target_profile = kind.profile();
        let quirks: Vec<&str> = target_profile.quirks.iter().take(2).copied().collect();
        system.push_str(&format!(
            "\nTARGET PERSONALITY: {}\nTARGET QUIRKS: {}\n",
            target_profile.style,
            quirks.join(", ")
        ));
        if let Some(dynamic) = interaction_dynamic(persona.kind, kind) {
            system.push_str(&format!("INTERACTION DYNAMIC: {}\n", dynamic));
        }
    }

    system.push_str(&shared_context(persona, context));
    system.push_str("\nBe witty and clever, never cruel. PG-13. One sentence only.");

    GenerationRequest::new(system, format!("Roast {} based on: {}", target.label(), context.user_message))
        .with_temperature(config.roast_temperature)
        .with_max_tokens(config.roast_max_tokens)
}

pub fn defense_request(
    persona: &Persona,
    target: PersonaKind,
    attacker: PersonaKind,
    context: &PromptContext<'_>,
    config: &GenerationConfig,
) -> GenerationRequest {
    let mut system = persona_header(persona, context);
    system.push_str(&format!(
        "\n\n{} just roasted your friend {}. Stick up for {} in your own voice, \
         and take a light jab back at {} if it fits.",
        attacker.name(),
        target.name(),
        target.name(),
        attacker.name()
    ));
    system.push_str(&guidelines(context.modifiers));
    system.push_str(&shared_context(persona, context));

    GenerationRequest::new(system, format!("Defend {} from {}", target.name(), attacker.name()))
        .with_temperature(config.temperature)
        .with_max_tokens(scaled_tokens(config.max_tokens, context.modifiers))
}

fn persona_header(persona: &Persona, context: &PromptContext<'_>) -> String {
    let profile = persona.profile();
    let quirks: String = profile.quirks.iter().map(|quirk| format!("- {}\n", quirk)).collect();

    format!(
        "You are {}, living in a chaotic flatshare.\n\n\
         PERSONALITY:\n- Style: {}\n- Background: {}\n- Interests: {}\n- Speech patterns: {}\n- Roast style: {}\n\n\
         QUIRKS:\n{}\n\
         CURRENT MOOD: {} ({}/100, baseline {})\nROASTING STRATEGY: {}",
        profile.name,
        profile.style,
        profile.background,
        profile.interests.join(", "),
        profile.speech_patterns.join(", "),
        profile.roast_style,
        quirks,
        context.mood_label,
        persona.mood,
        persona.baseline_mood,
        profile.strategy.as_str(),
    )
}

fn guidelines(modifiers: MoodModifiers) -> String {
    let tone = if modifiers.aggression > 1.0 {
        "sharper and shorter-fused than usual"
    } else if modifiers.humor > 1.0 {
        "playful and generous"
    } else {
        "your usual self"
    };
    format!(
        "\n\nRESPONSE GUIDELINES:\n- Stay in character and use your speech patterns\n\
         - Right now you are {}\n- Witty but PG-13\n- One or two sentences",
        tone
    )
}

fn shared_context(persona: &Persona, context: &PromptContext<'_>) -> String {
    let mut out = String::new();

    let triggers: Vec<&str> = context
        .analysis
        .topics
        .iter()
        .flat_map(|topic| persona.profile().trigger_lines(topic).iter().copied())
        .take(MAX_TRIGGER_LINES)
        .collect();
    if !triggers.is_empty() {
        out.push_str(&format!("\n\nRELEVANT TRIGGERS: {}", triggers.join(" | ")));
    }

    if let Some(patterns) = persona.user_patterns.as_ref().filter(|patterns| !patterns.is_empty()) {
        out.push_str(&format!("\n\nWHAT YOU KNOW ABOUT THE USER: {}", patterns.summary()));
    }

    if !context.relevant.is_empty() {
        out.push_str("\n\nYOU REMEMBER:");
        for entry in context.relevant {
            out.push_str(&format!("\n- {}: {}", entry.speaker, entry.message));
        }
    }

    out.push_str("\n\nRECENT CONVERSATION:\n");
    if context.history.is_empty() {
        out.push_str(START_OF_CONVERSATION);
    } else {
        out.push_str(&context.history.join("\n"));
    }
    out
}

fn scaled_tokens(max_tokens: u32, modifiers: MoodModifiers) -> u32 {
    ((max_tokens as f64) * modifiers.response_length).round().max(1.0) as u32
}
