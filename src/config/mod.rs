pub mod session_config;

pub use session_config::{
    ConfigError, GenerationConfig, MemoryConfig, MoodConfig, SafetyConfig, SessionConfig, TurnConfig,
};
