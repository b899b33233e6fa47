use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::config::SafetyConfig;

pub const REFUSAL: &str = "Let's keep it classy, PG-13 roasts only.";

lazy_static! {
    static ref PROTECTED_PATTERN: Regex =
        Regex::new(r"(?i)\b(race|religion|gender|sexual|disab|ethnic|caste)\b").expect("protected pattern is valid");
    static ref SLUR_PATTERN: Regex = Regex::new(r"(?i)\b(\w*slur\w*)\b").expect("slur pattern is valid");
}

/// Final pass over a roast before it reaches the transcript.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, text: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct RoastFilter {
    max_length: usize,
}

impl RoastFilter {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn from_config(config: &SafetyConfig) -> Self {
        Self::new(config.max_length)
    }

    pub fn is_blocked(&self, text: &str) -> bool {
        PROTECTED_PATTERN.is_match(text) || SLUR_PATTERN.is_match(text)
    }
}

impl Default for RoastFilter {
    fn default() -> Self {
        Self::from_config(&SafetyConfig::default())
    }
}

impl Sanitizer for RoastFilter {
    fn sanitize(&self, text: &str) -> String {
        if self.is_blocked(text) {
            info!("roast replaced by safety filter");
            return REFUSAL.to_string();
        }
        text.trim().chars().take(self.max_length).collect()
    }
}
