pub mod prompts;
pub mod selection;
mod turn;

pub use prompts::RoastTarget;
pub use selection::select_speakers;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::SessionConfig;
use crate::generation::Generator;
use crate::modules::analysis::MessageAnalyzer;
use crate::modules::memory::{ConversationEntry, MemoryStore};
use crate::modules::mood::MoodModel;
use crate::modules::persona::{Persona, PersonaKind};
use crate::modules::relationship::RelationshipMatrix;
use crate::safety::{RoastFilter, Sanitizer};

pub const USER_LABEL: &str = "You";

/// Incremental view of a turn for streaming front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    Speaker(String),
    Fragment(String),
    EndOfLine,
    /// The line announced by the last `Speaker` was discarded part way through.
    Abandoned,
}

impl TurnEvent {
    pub fn render(&self) -> String {
        match self {
            TurnEvent::Speaker(name) => format!("{}: ", name),
            TurnEvent::Fragment(text) => text.clone(),
            TurnEvent::EndOfLine => "\n".to_string(),
            TurnEvent::Abandoned => " [...]\n".to_string(),
        }
    }
}

/// A roast aimed at the user, scored once the user's next message arrives.
#[derive(Debug, Clone)]
struct PendingUserRoast {
    persona: usize,
    entry_id: String,
    text: String,
    at: DateTime<Utc>,
}

/// Owns the cast and every piece of per-session state. Turns run one at a time
/// and each persona line is generated after the previous one is recorded.
pub struct Orchestrator {
    config: SessionConfig,
    personas: Vec<Persona>,
    relationships: RelationshipMatrix,
    mood: MoodModel,
    memory: MemoryStore,
    analyzer: MessageAnalyzer,
    generator: Box<dyn Generator>,
    sanitizer: Box<dyn Sanitizer>,
    rng: StdRng,
    history: VecDeque<String>,
    session_log: Vec<ConversationEntry>,
    pending_user_roasts: Vec<PendingUserRoast>,
}

impl Orchestrator {
    pub fn new(config: SessionConfig, generator: Box<dyn Generator>) -> Self {
        Self {
            personas: Persona::cast(),
            relationships: RelationshipMatrix::seeded(&PersonaKind::ALL),
            mood: MoodModel::new(&config.mood),
            memory: MemoryStore::from_config(&config.memory),
            analyzer: MessageAnalyzer::new(),
            generator,
            sanitizer: Box::new(RoastFilter::from_config(&config.safety)),
            rng: StdRng::from_entropy(),
            history: VecDeque::with_capacity(config.turn.history_window),
            session_log: Vec::new(),
            pending_user_roasts: Vec::new(),
            config,
        }
    }

    /// Replaces the cast and reseeds the relationship matrix for it.
    pub fn with_personas(mut self, personas: Vec<Persona>) -> Self {
        let kinds: Vec<PersonaKind> = personas.iter().map(|persona| persona.kind).collect();
        self.relationships = RelationshipMatrix::seeded(&kinds);
        self.personas = personas;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Box<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn with_relationships(mut self, relationships: RelationshipMatrix) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn with_mood_model(mut self, mood: MoodModel) -> Self {
        self.mood = mood;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn persona(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|persona| persona.name().eq_ignore_ascii_case(name))
    }

    pub fn relationships(&self) -> &RelationshipMatrix {
        &self.relationships
    }

    pub fn mood_model(&self) -> &MoodModel {
        &self.mood
    }

    pub fn memory_store(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// The rolling "speaker: text" window used as prompt context.
    pub fn history(&self) -> Vec<String> {
        self.history.iter().cloned().collect()
    }

    pub fn session_log(&self) -> &[ConversationEntry] {
        &self.session_log
    }

    /// Runs one turn and returns its transcript, starting with the user's line.
    pub async fn compose_turn(&mut self, message: &str) -> Vec<String> {
        self.run_turn(message, None, None).await
    }

    /// Like [`compose_turn`](Self::compose_turn) but stops when `cancel` fires.
    /// A line in flight at that moment is dropped without being recorded.
    pub async fn compose_turn_with_cancel(&mut self, message: &str, cancel: &CancellationToken) -> Vec<String> {
        self.run_turn(message, Some(cancel), None).await
    }

    /// Streams the turn as [`TurnEvent`]s and returns the same transcript as
    /// [`compose_turn`](Self::compose_turn).
    pub async fn compose_turn_stream(&mut self, message: &str, events: mpsc::Sender<TurnEvent>) -> Vec<String> {
        self.run_turn(message, None, Some(&events)).await
    }

    pub async fn compose_turn_stream_with_cancel(
        &mut self,
        message: &str,
        events: mpsc::Sender<TurnEvent>,
        cancel: &CancellationToken,
    ) -> Vec<String> {
        self.run_turn(message, Some(cancel), Some(&events)).await
    }

    fn push_history(&mut self, line: String) {
        let window = self.config.turn.history_window;
        if window == 0 {
            return;
        }
        while self.history.len() >= window {
            self.history.pop_front();
        }
        self.history.push_back(line);
    }
}
