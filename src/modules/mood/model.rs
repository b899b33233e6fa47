use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::event::MoodEvent;
use crate::config::MoodConfig;
use crate::modules::persona::Persona;

pub const MIN_MOOD: i32 = 1;
pub const MAX_MOOD: i32 = 100;

const MAX_INITIATE_CHANCE: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodModifiers {
    pub aggression: f64,
    pub humor: f64,
    pub defensiveness: f64,
    pub roast_likelihood: f64,
    pub response_length: f64,
}

impl Default for MoodModifiers {
    fn default() -> Self {
        Self {
            aggression: 1.0,
            humor: 1.0,
            defensiveness: 1.0,
            roast_likelihood: 1.0,
            response_length: 1.0,
        }
    }
}

impl MoodModifiers {
    pub fn for_mood(mood: i32) -> Self {
        match mood {
            m if m < 30 => Self {
                aggression: 1.5,
                humor: 0.7,
                defensiveness: 1.3,
                roast_likelihood: 1.4,
                response_length: 0.8,
            },
            m if m < 50 => Self {
                aggression: 1.2,
                humor: 0.9,
                defensiveness: 1.1,
                roast_likelihood: 1.2,
                ..Self::default()
            },
            m if m < 60 => Self::default(),
            m if m <= 80 => Self {
                aggression: 0.8,
                humor: 1.1,
                roast_likelihood: 0.9,
                ..Self::default()
            },
            _ => Self {
                aggression: 0.6,
                humor: 1.3,
                defensiveness: 0.8,
                roast_likelihood: 0.7,
                response_length: 1.2,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSelection {
    Enemies,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStyle {
    Aggressive,
    Playful,
    Normal,
}

impl ResponseStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStyle::Aggressive => "aggressive",
            ResponseStyle::Playful => "playful",
            ResponseStyle::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoastInfluence {
    pub should_roast_more: bool,
    pub roast_intensity: f64,
    pub humor_level: f64,
    pub target_selection: TargetSelection,
    pub response_style: ResponseStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEventOutcome {
    pub event: String,
    pub mood_change: i32,
    pub old_mood: i32,
    pub new_mood: i32,
    pub old_description: &'static str,
    pub new_description: &'static str,
    pub behavioral_change: bool,
}

pub fn describe_mood(mood: i32) -> &'static str {
    match mood {
        m if m >= 90 => "ecstatic",
        m if m >= 80 => "very happy",
        m if m >= 70 => "happy",
        m if m >= 60 => "content",
        m if m >= 50 => "neutral",
        m if m >= 40 => "slightly annoyed",
        m if m >= 30 => "irritated",
        m if m >= 20 => "angry",
        m if m >= 10 => "furious",
        _ => "livid",
    }
}

#[derive(Debug, Clone)]
pub struct MoodModel {
    decay_rate: f64,
    initiate_threshold: i32,
    last_decay: DateTime<Utc>,
}

impl MoodModel {
    pub fn new(config: &MoodConfig) -> Self {
        Self::starting_at(config, Utc::now())
    }

    pub fn starting_at(config: &MoodConfig, now: DateTime<Utc>) -> Self {
        Self {
            decay_rate: config.decay_rate.max(0.0),
            initiate_threshold: config.initiate_roast_threshold,
            last_decay: now,
        }
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn last_decay(&self) -> DateTime<Utc> {
        self.last_decay
    }

    pub fn apply_event(&self, persona: &mut Persona, event: MoodEvent, intensity: i32) -> i32 {
        persona.mood = (persona.mood + event.delta(intensity)).clamp(MIN_MOOD, MAX_MOOD);
        persona.mood
    }

    /// Applies a named event; unknown names leave the mood untouched.
    pub fn apply_named_event(&self, persona: &mut Persona, event: &str, intensity: i32) -> i32 {
        match MoodEvent::parse(event) {
            Some(event) => self.apply_event(persona, event, intensity),
            None => persona.mood,
        }
    }

    pub fn modifiers(&self, persona: &Persona) -> MoodModifiers {
        MoodModifiers::for_mood(persona.mood)
    }

    /// Moves every mood toward its baseline by `decay_rate * minutes`, stopping at the baseline.
    /// The rounding remainder stays on the persona so short ticks add up.
    pub fn decay(&self, personas: &mut [Persona], minutes_elapsed: f64) {
        let amount = self.decay_rate * minutes_elapsed.max(0.0);

        for persona in personas.iter_mut() {
            let current = (persona.mood as f64 + persona.mood_carry).clamp(MIN_MOOD as f64, MAX_MOOD as f64);
            let baseline = persona.baseline_mood as f64;

            let next = if current > baseline {
                (current - amount).max(baseline)
            } else {
                (current + amount).min(baseline)
            };
            persona.mood = (next.round() as i32).clamp(MIN_MOOD, MAX_MOOD);
            persona.mood_carry = next - persona.mood as f64;
        }
    }

    pub fn auto_decay_tick(&mut self, personas: &mut [Persona]) -> bool {
        self.auto_decay_tick_at(personas, Utc::now())
    }

    /// Decays only when at least a minute has passed since the previous decay.
    pub fn auto_decay_tick_at(&mut self, personas: &mut [Persona], now: DateTime<Utc>) -> bool {
        let minutes = (now - self.last_decay).num_milliseconds() as f64 / 60_000.0;
        if minutes < 1.0 {
            return false;
        }

        self.decay(personas, minutes);
        self.last_decay = now;
        debug!(minutes, "mood decay tick");
        true
    }

    pub fn initiate_chance(&self, persona: &Persona) -> f64 {
        if persona.mood >= self.initiate_threshold || self.initiate_threshold <= 0 {
            return 0.0;
        }
        (self.initiate_threshold - persona.mood) as f64 / self.initiate_threshold as f64 * MAX_INITIATE_CHANCE
    }

    pub fn should_initiate_roast<R: Rng + ?Sized>(&self, persona: &Persona, rng: &mut R) -> bool {
        let chance = self.initiate_chance(persona);
        chance > 0.0 && rng.gen::<f64>() < chance
    }

    pub fn describe(&self, persona: &Persona) -> &'static str {
        describe_mood(persona.mood)
    }

    pub fn roast_influence(&self, persona: &Persona) -> RoastInfluence {
        let modifiers = self.modifiers(persona);
        let low = persona.mood < self.initiate_threshold;

        RoastInfluence {
            should_roast_more: low,
            roast_intensity: modifiers.aggression,
            humor_level: modifiers.humor,
            target_selection: if low {
                TargetSelection::Enemies
            } else {
                TargetSelection::Random
            },
            response_style: if low {
                ResponseStyle::Aggressive
            } else if persona.mood > 80 {
                ResponseStyle::Playful
            } else {
                ResponseStyle::Normal
            },
        }
    }

    pub fn simulate_event(&self, persona: &mut Persona, description: &str, delta: i32) -> MoodEventOutcome {
        let old_mood = persona.mood;
        let old_description = describe_mood(old_mood);

        persona.mood = (persona.mood + delta).clamp(MIN_MOOD, MAX_MOOD);
        let new_description = describe_mood(persona.mood);

        MoodEventOutcome {
            event: description.to_string(),
            mood_change: persona.mood - old_mood,
            old_mood,
            new_mood: persona.mood,
            old_description,
            new_description,
            behavioral_change: old_description != new_description,
        }
    }
}

impl Default for MoodModel {
    fn default() -> Self {
        Self::new(&MoodConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{describe_mood, MoodModel, MoodModifiers, ResponseStyle, TargetSelection};
    use crate::config::MoodConfig;
    use crate::modules::mood::MoodEvent;
    use crate::modules::persona::{Persona, PersonaKind};
    use chrono::{Duration, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_apply_event_clamps() {
        let model = MoodModel::default();
        let mut persona = Persona::new(PersonaKind::BeatDrop).with_mood(5);
        assert_eq!(model.apply_event(&mut persona, MoodEvent::RoastReceived, 10), 1);

        let mut persona = Persona::new(PersonaKind::BeatDrop).with_mood(97);
        assert_eq!(model.apply_event(&mut persona, MoodEvent::Praised, 10), 100);
    }

    #[test]
    fn test_unknown_named_event_is_noop() {
        let model = MoodModel::default();
        let mut persona = Persona::new(PersonaKind::UncleJi);
        assert_eq!(model.apply_named_event(&mut persona, "tickled", 9), 55);
        assert_eq!(model.apply_named_event(&mut persona, "criticized", 5), 50);
    }

    #[test]
    fn test_modifier_bands() {
        let low = MoodModifiers::for_mood(25);
        assert_eq!(low.aggression, 1.5);
        assert_eq!(low.roast_likelihood, 1.4);
        assert_eq!(low.humor, 0.7);

        assert_eq!(MoodModifiers::for_mood(55), MoodModifiers::default());
        assert_eq!(MoodModifiers::for_mood(60).aggression, 0.8);
        assert_eq!(MoodModifiers::for_mood(80).humor, 1.1);
        assert_eq!(MoodModifiers::for_mood(81).response_length, 1.2);
        assert_eq!(MoodModifiers::for_mood(45).response_length, 1.0);
    }

    #[test]
    fn test_decay_stops_at_baseline() {
        let model = MoodModel::new(&MoodConfig::new(0.5));
        let mut personas = vec![
            Persona::new(PersonaKind::CodeMaster).with_mood(90),
            Persona::new(PersonaKind::CodeMaster).with_mood(20),
            Persona::new(PersonaKind::CodeMaster),
        ];

        model.decay(&mut personas, 10.0);
        assert_eq!(personas[0].mood, 85);
        assert_eq!(personas[1].mood, 25);
        assert_eq!(personas[2].mood, 65);

        model.decay(&mut personas, 1000.0);
        assert!(personas.iter().all(|persona| persona.mood == 65));
    }

    #[test]
    fn test_auto_decay_needs_a_minute() {
        let start = Utc::now();
        let mut model = MoodModel::starting_at(&MoodConfig::new(1.0), start);
        let mut personas = vec![Persona::new(PersonaKind::SavageBurn).with_mood(50)];

        assert!(!model.auto_decay_tick_at(&mut personas, start + Duration::seconds(30)));
        assert_eq!(personas[0].mood, 50);

        assert!(model.auto_decay_tick_at(&mut personas, start + Duration::minutes(5)));
        assert_eq!(personas[0].mood, 55);
        assert_eq!(model.last_decay(), start + Duration::minutes(5));
    }

    #[test]
    fn test_short_ticks_add_up_to_one_long_decay() {
        let start = Utc::now();
        let mut model = MoodModel::starting_at(&MoodConfig::default(), start);
        let mut ticked = vec![
            Persona::new(PersonaKind::CodeMaster).with_mood(60).with_baseline(50),
            Persona::new(PersonaKind::CodeMaster).with_mood(40).with_baseline(50),
        ];
        let mut single = ticked.clone();

        for step in 1..=30 {
            assert!(model.auto_decay_tick_at(&mut ticked, start + Duration::minutes(2 * step)));
        }
        model.decay(&mut single, 60.0);

        assert_eq!(single[0].mood, 54);
        assert_eq!(single[1].mood, 46);
        assert_eq!(ticked[0].mood, single[0].mood);
        assert_eq!(ticked[1].mood, single[1].mood);
    }

    #[test]
    fn test_should_initiate_roast_only_when_low() {
        let model = MoodModel::default();
        let mut rng = StdRng::seed_from_u64(7);
        let happy = Persona::new(PersonaKind::BeatDrop);
        assert!((0..200).all(|_| !model.should_initiate_roast(&happy, &mut rng)));

        let livid = Persona::new(PersonaKind::BeatDrop).with_mood(1);
        assert!((model.initiate_chance(&livid) - 29.0 / 30.0 * 0.4).abs() < 1e-9);
        assert!((0..200).any(|_| model.should_initiate_roast(&livid, &mut rng)));
    }

    #[test]
    fn test_describe_bands() {
        assert_eq!(describe_mood(95), "ecstatic");
        assert_eq!(describe_mood(50), "neutral");
        assert_eq!(describe_mood(39), "irritated");
        assert_eq!(describe_mood(3), "livid");
    }

    #[test]
    fn test_roast_influence() {
        let model = MoodModel::default();
        let grumpy = model.roast_influence(&Persona::new(PersonaKind::PennyPincher).with_mood(20));
        assert!(grumpy.should_roast_more);
        assert_eq!(grumpy.target_selection, TargetSelection::Enemies);
        assert_eq!(grumpy.response_style, ResponseStyle::Aggressive);
        assert_eq!(grumpy.roast_intensity, 1.5);

        let giddy = model.roast_influence(&Persona::new(PersonaKind::BeatDrop).with_mood(85));
        assert_eq!(giddy.target_selection, TargetSelection::Random);
        assert_eq!(giddy.response_style, ResponseStyle::Playful);
    }

    #[test]
    fn test_simulate_event() {
        let model = MoodModel::default();
        let mut persona = Persona::new(PersonaKind::ChefCritic).with_mood(72);
        let outcome = model.simulate_event(&mut persona, "someone microwaved fish", -5);
        assert_eq!(outcome.old_mood, 72);
        assert_eq!(outcome.new_mood, 67);
        assert_eq!(outcome.mood_change, -5);
        assert_eq!(outcome.old_description, "happy");
        assert_eq!(outcome.new_description, "content");
        assert!(outcome.behavioral_change);
    }
}
