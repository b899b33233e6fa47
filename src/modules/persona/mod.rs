pub mod profile;

pub use profile::{
    interaction_dynamic, seed_affinity, topic_preferences, PersonaKind, PersonaProfile, RoastingStrategy,
};

use crate::modules::analysis::UserPatterns;
use crate::modules::memory::ConversationEntry;

/// Mutable per-persona state. Owned by the orchestrator and changed only through
/// the mood model and the memory store.
#[derive(Debug, Clone)]
pub struct Persona {
    pub kind: PersonaKind,
    pub mood: i32,
    pub baseline_mood: i32,
    /// Fractional decay not yet reflected in `mood`.
    pub mood_carry: f64,
    pub spice: u8,
    pub memory: Vec<ConversationEntry>,
    pub user_patterns: Option<UserPatterns>,
    pub roast_count: u32,
}

impl Persona {
    pub fn new(kind: PersonaKind) -> Self {
        let profile = kind.profile();
        Self {
            kind,
            mood: profile.baseline_mood,
            baseline_mood: profile.baseline_mood,
            mood_carry: 0.0,
            spice: profile.spice,
            memory: Vec::new(),
            user_patterns: None,
            roast_count: 0,
        }
    }

    pub fn with_mood(mut self, mood: i32) -> Self {
        self.mood = mood.clamp(1, 100);
        self.mood_carry = 0.0;
        self
    }

    pub fn with_baseline(mut self, baseline: i32) -> Self {
        self.baseline_mood = baseline.clamp(1, 100);
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn profile(&self) -> &'static PersonaProfile {
        self.kind.profile()
    }

    pub fn cast() -> Vec<Persona> {
        PersonaKind::ALL.iter().copied().map(Persona::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Persona, PersonaKind};

    #[test]
    fn test_persona_starts_at_baseline() {
        let persona = Persona::new(PersonaKind::DeepThought);
        assert_eq!(persona.mood, 35);
        assert_eq!(persona.baseline_mood, 35);
        assert_eq!(persona.spice, 3);
        assert!(persona.memory.is_empty());
    }

    #[test]
    fn test_with_mood_clamps() {
        assert_eq!(Persona::new(PersonaKind::BeatDrop).with_mood(400).mood, 100);
        assert_eq!(Persona::new(PersonaKind::BeatDrop).with_mood(-4).mood, 1);
    }

    #[test]
    fn test_cast_has_every_kind_once() {
        let cast = Persona::cast();
        assert_eq!(cast.len(), PersonaKind::ALL.len());
        assert_eq!(cast[0].name(), "CodeMaster");
    }
}
