use crate::modules::memory::ConversationEntry;
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap()
}

/// A persona line stamped `minutes` after the base time.
pub fn entry_at(message: &str, minutes: i64) -> ConversationEntry {
    ConversationEntry::new("SavageBurn", message, vec![], 0.0).at(base_time() + Duration::minutes(minutes))
}

/// `low_count` entries scored `low` followed by `high_count` scored `high`,
/// one minute apart and named "entry N".
pub fn scored_entries(low_count: usize, low: f64, high_count: usize, high: f64) -> Vec<ConversationEntry> {
    (0..low_count + high_count)
        .map(|i| {
            let score = if i < low_count { low } else { high };
            entry_at(&format!("entry {i}"), i as i64).with_effectiveness(score)
        })
        .collect()
}
