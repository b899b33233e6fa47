pub mod event;
pub mod model;

pub use event::MoodEvent;
pub use model::{
    describe_mood, MoodEventOutcome, MoodModel, MoodModifiers, ResponseStyle, RoastInfluence, TargetSelection,
    MAX_MOOD, MIN_MOOD,
};
