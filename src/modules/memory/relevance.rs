use chrono::{DateTime, Utc};

use super::entry::ConversationEntry;

const RECENCY_WINDOW_DAYS: f64 = 7.0;
const RECENCY_WEIGHT: f64 = 0.3;
const TOPIC_MATCH_BONUS: f64 = 1.0;
const TAG_OVERLAP_BONUS: f64 = 0.5;
const EFFECTIVE_BONUS: f64 = 0.2;
const EFFECTIVE_THRESHOLD: f64 = 0.7;

/// Scores how useful `entry` is as context for a conversation about `topic`.
pub fn relevance_score(entry: &ConversationEntry, topic: &str, now: DateTime<Utc>) -> f64 {
    let topic = topic.to_lowercase();

    let days_since = (now - entry.timestamp).num_days() as f64;
    let recency = (1.0 - days_since / RECENCY_WINDOW_DAYS).max(0.0);
    let mut score = recency * RECENCY_WEIGHT;

    if topic.is_empty() {
        return score + effectiveness_bonus(entry);
    }

    if entry.message.to_lowercase().contains(&topic) {
        score += TOPIC_MATCH_BONUS;
    }

    for tag in &entry.context_tags {
        let tag = tag.to_lowercase();
        if topic.contains(&tag) || tag.contains(&topic) {
            score += TAG_OVERLAP_BONUS;
        }
    }

    score + effectiveness_bonus(entry)
}

fn effectiveness_bonus(entry: &ConversationEntry) -> f64 {
    if entry.effectiveness_or_zero() > EFFECTIVE_THRESHOLD {
        EFFECTIVE_BONUS
    } else {
        0.0
    }
}
