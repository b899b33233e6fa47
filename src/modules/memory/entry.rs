use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const USER_SPEAKER: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub speaker: String,
    pub message: String,
    pub context_tags: Vec<String>,
    pub sentiment: f64,
    pub effectiveness_score: Option<f64>,
}

impl ConversationEntry {
    pub fn new(
        speaker: impl Into<String>,
        message: impl Into<String>,
        context_tags: Vec<String>,
        sentiment: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            speaker: speaker.into(),
            message: message.into(),
            context_tags,
            sentiment: sentiment.clamp(-1.0, 1.0),
            effectiveness_score: None,
        }
    }

    pub fn user(message: impl Into<String>, context_tags: Vec<String>, sentiment: f64) -> Self {
        Self::new(USER_SPEAKER, message, context_tags, sentiment)
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_effectiveness(mut self, score: f64) -> Self {
        self.effectiveness_score = Some(score.clamp(0.0, 1.0));
        self
    }

    pub fn is_user(&self) -> bool {
        self.speaker == USER_SPEAKER
    }

    pub fn effectiveness_or_zero(&self) -> f64 {
        self.effectiveness_score.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ConversationEntry;

    #[test]
    fn test_user_entry() {
        let entry = ConversationEntry::user("hello there", vec![], 0.2);
        assert!(entry.is_user());
        assert!(!entry.id.is_empty());
        assert_eq!(entry.effectiveness_score, None);
        assert_eq!(entry.effectiveness_or_zero(), 0.0);
    }

    #[test]
    fn test_scores_are_clamped() {
        let entry = ConversationEntry::new("SavageBurn", "burn", vec![], -3.0).with_effectiveness(1.7);
        assert_eq!(entry.sentiment, -1.0);
        assert_eq!(entry.effectiveness_score, Some(1.0));
        assert!(!entry.is_user());
    }
}
