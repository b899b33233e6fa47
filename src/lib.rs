pub mod config;
pub mod generation;
pub mod modules;
pub mod safety;

#[cfg(test)]
mod _test_mock;

pub use config::{ConfigError, SessionConfig};
pub use generation::{CannedGenerator, GenerationError, GenerationRequest, Generator, OllamaGenerator};
pub use modules::analysis::{AnalysisResult, MessageAnalyzer};
pub use modules::memory::{ConversationEntry, MemoryError, MemoryStore};
pub use modules::mood::{MoodEvent, MoodModel};
pub use modules::orchestrator::{Orchestrator, TurnEvent};
pub use modules::persona::{Persona, PersonaKind};
pub use modules::relationship::{InteractionKind, RelationshipMatrix};
pub use safety::{RoastFilter, Sanitizer};
