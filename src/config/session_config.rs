use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub max_memory_size: usize,
    pub preserved_recent: usize,
    pub relevant_context_limit: usize,
    pub purge_after_days: i64,
}

impl MemoryConfig {
    pub fn new(max_memory_size: usize) -> Self {
        Self {
            max_memory_size,
            ..Self::default()
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_memory_size: 50,
            preserved_recent: 10,
            relevant_context_limit: 5,
            purge_after_days: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    /// Mood points recovered toward baseline per elapsed minute.
    pub decay_rate: f64,
    pub initiate_roast_threshold: i32,
}

impl MoodConfig {
    pub fn new(decay_rate: impl Into<f64>) -> Self {
        Self {
            decay_rate: decay_rate.into(),
            ..Self::default()
        }
    }
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            decay_rate: 0.1,
            initiate_roast_threshold: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    pub max_speakers_per_turn: usize,
    pub min_speakers_per_turn: usize,
    pub history_window: usize,
    pub roast_probability: f64,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            max_speakers_per_turn: 4,
            min_speakers_per_turn: 2,
            history_window: 10,
            roast_probability: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub roast_temperature: f32,
    pub max_tokens: u32,
    pub roast_max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            roast_temperature: 0.9,
            max_tokens: 100,
            roast_max_tokens: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    pub max_length: usize,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self { max_length: 200 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub memory: MemoryConfig,
    pub mood: MoodConfig,
    pub turn: TurnConfig,
    pub generation: GenerationConfig,
    pub safety: SafetyConfig,
}

impl SessionConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory.max_memory_size < self.memory.preserved_recent {
            return Err(ConfigError::Invalid(format!(
                "memory.max_memory_size ({}) must be at least memory.preserved_recent ({})",
                self.memory.max_memory_size, self.memory.preserved_recent
            )));
        }

        if self.turn.max_speakers_per_turn == 0 {
            return Err(ConfigError::Invalid(
                "turn.max_speakers_per_turn must be greater than 0".to_string(),
            ));
        }

        if self.turn.min_speakers_per_turn > self.turn.max_speakers_per_turn {
            return Err(ConfigError::Invalid(format!(
                "turn.min_speakers_per_turn ({}) exceeds turn.max_speakers_per_turn ({})",
                self.turn.min_speakers_per_turn, self.turn.max_speakers_per_turn
            )));
        }

        if self.mood.decay_rate < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "mood.decay_rate has value {}, but must not be negative",
                self.mood.decay_rate
            )));
        }

        if !(0.0..=1.0).contains(&self.turn.roast_probability) {
            return Err(ConfigError::Invalid(format!(
                "turn.roast_probability has value {}, but must be between 0.0 and 1.0",
                self.turn.roast_probability
            )));
        }

        Ok(())
    }
}
