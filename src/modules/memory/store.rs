use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::entry::ConversationEntry;
use super::relevance::relevance_score;
use crate::config::MemoryConfig;
use crate::modules::analysis::{MessageAnalyzer, UserPatterns};
use crate::modules::persona::Persona;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Record at index {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_entries: usize,
    pub user_entries: usize,
    pub persona_entries: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
    pub average_effectiveness: f64,
}

/// Bounded per-persona conversation log. The store holds only policy; the
/// entries themselves live on the persona.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    max_memory_size: usize,
    preserved_recent: usize,
    analyzer: MessageAnalyzer,
}

impl MemoryStore {
    pub fn new(max_memory_size: usize) -> Self {
        Self::from_config(&MemoryConfig::new(max_memory_size))
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self {
            max_memory_size: config.max_memory_size,
            preserved_recent: config.preserved_recent,
            analyzer: MessageAnalyzer::new(),
        }
    }

    pub fn max_memory_size(&self) -> usize {
        self.max_memory_size
    }

    pub fn append(&self, persona: &mut Persona, entry: ConversationEntry) {
        persona.memory.push(entry);
        if persona.memory.len() > self.max_memory_size {
            let before = persona.memory.len();
            self.evict(&mut persona.memory);
            debug!(
                persona = persona.name(),
                evicted = before - persona.memory.len(),
                "memory over capacity"
            );
        }
    }

    fn evict(&self, memory: &mut Vec<ConversationEntry>) {
        let excess = memory.len() - self.max_memory_size;
        let preserved = self.preserved_recent.min(self.max_memory_size);

        if memory.len() <= self.preserved_recent {
            memory.drain(..excess);
            return;
        }

        let older_len = memory.len() - preserved;
        let mut ranked: Vec<usize> = (0..older_len).collect();
        ranked.sort_by(|a, b| {
            memory[*a]
                .effectiveness_or_zero()
                .total_cmp(&memory[*b].effectiveness_or_zero())
                .then(a.cmp(b))
        });

        let mut dropped = vec![false; older_len];
        for index in ranked.into_iter().take(excess) {
            dropped[index] = true;
        }

        let mut position = 0;
        memory.retain(|_| {
            let keep = position >= older_len || !dropped[position];
            position += 1;
            keep
        });
    }

    /// Entries ranked by relevance to `topic`, highest first. Equal scores keep
    /// their chronological order.
    pub fn relevant_context(
        &self,
        persona: &Persona,
        topic: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<ConversationEntry> {
        let mut scored: Vec<(f64, &ConversationEntry)> = persona
            .memory
            .iter()
            .map(|entry| (relevance_score(entry, topic, now), entry))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        scored.into_iter().take(limit).map(|(_, entry)| entry.clone()).collect()
    }

    pub fn analyze_user_patterns(&self, persona: &mut Persona) -> UserPatterns {
        let patterns = self.analyzer.detect_user_patterns(&persona.memory);
        persona.user_patterns = Some(patterns.clone());
        patterns
    }

    pub fn conversation_thread(&self, persona: &Persona, turns: usize) -> Vec<ConversationEntry> {
        let start = persona.memory.len().saturating_sub(turns);
        persona.memory[start..].to_vec()
    }

    pub fn purge_older_than(&self, persona: &mut Persona, days: i64, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(days);
        let before = persona.memory.len();
        persona.memory.retain(|entry| entry.timestamp > cutoff);
        let removed = before - persona.memory.len();
        if removed > 0 {
            debug!(persona = persona.name(), removed, days, "purged old memories");
        }
        removed
    }

    pub fn stats(&self, persona: &Persona) -> MemoryStats {
        let user_entries = persona.memory.iter().filter(|entry| entry.is_user()).count();
        let scores: Vec<f64> = persona.memory.iter().filter_map(|entry| entry.effectiveness_score).collect();
        let average_effectiveness = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        MemoryStats {
            total_entries: persona.memory.len(),
            user_entries,
            persona_entries: persona.memory.len() - user_entries,
            oldest: persona.memory.iter().map(|entry| entry.timestamp).min(),
            newest: persona.memory.iter().map(|entry| entry.timestamp).max(),
            average_effectiveness,
        }
    }

    /// Attaches a score to a stored entry. Returns false when the id is unknown.
    pub fn record_effectiveness(&self, persona: &mut Persona, entry_id: &str, score: f64) -> bool {
        match persona.memory.iter_mut().find(|entry| entry.id == entry_id) {
            Some(entry) => {
                entry.effectiveness_score = Some(score.clamp(0.0, 1.0));
                true
            }
            None => false,
        }
    }

    pub fn export(&self, persona: &Persona) -> Result<String, MemoryError> {
        Ok(serde_json::to_string(&persona.memory)?)
    }

    /// Replaces the persona's memory with the entries in `json`. Nothing is
    /// changed when any record fails validation.
    pub fn import(&self, persona: &mut Persona, json: &str) -> Result<usize, MemoryError> {
        let mut records: Vec<ConversationEntry> = serde_json::from_str(json)?;

        for (index, record) in records.iter().enumerate() {
            if record.id.is_empty() {
                return Err(MemoryError::InvalidRecord {
                    index,
                    reason: String::from("empty id"),
                });
            }
            if !(-1.0..=1.0).contains(&record.sentiment) {
                return Err(MemoryError::InvalidRecord {
                    index,
                    reason: format!("invalid sentiment: {} (must be between -1.0 and 1.0)", record.sentiment),
                });
            }
            if let Some(score) = record.effectiveness_score {
                if !(0.0..=1.0).contains(&score) {
                    return Err(MemoryError::InvalidRecord {
                        index,
                        reason: format!("invalid effectiveness: {} (must be between 0.0 and 1.0)", score),
                    });
                }
            }
        }

        records.sort_by_key(|record| record.timestamp);
        persona.memory.clear();
        for record in records {
            self.append(persona, record);
        }
        Ok(persona.memory.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::from_config(&MemoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryError, MemoryStore};
    use crate::_test_mock::entries::{entry_at, scored_entries};
    use crate::modules::memory::ConversationEntry;
    use crate::modules::persona::{Persona, PersonaKind};
    use chrono::{Duration, Utc};

    fn persona() -> Persona {
        Persona::new(PersonaKind::SavageBurn)
    }

    #[test]
    fn test_memory_store_default() {
        let store = MemoryStore::default();
        assert_eq!(store.max_memory_size(), 50);
    }

    #[test]
    fn test_append_under_capacity_keeps_everything() {
        let store = MemoryStore::new(5);
        let mut persona = persona();
        for i in 0..5 {
            store.append(&mut persona, entry_at(&format!("line {i}"), i));
        }
        assert_eq!(persona.memory.len(), 5);
        assert_eq!(persona.memory[0].message, "line 0");
    }

    #[test]
    fn test_small_capacity_truncates_from_front() {
        let store = MemoryStore::new(3);
        let mut persona = persona();
        for i in 0..6 {
            store.append(&mut persona, entry_at(&format!("line {i}"), i).with_effectiveness(1.0));
        }
        let messages: Vec<&str> = persona.memory.iter().map(|entry| entry.message.as_str()).collect();
        assert_eq!(messages, vec!["line 3", "line 4", "line 5"]);
    }

    #[test]
    fn test_eviction_prefers_effective_older_entries() {
        let store = MemoryStore::new(50);
        let mut persona = persona();
        for entry in scored_entries(15, 0.1, 45, 0.9) {
            store.append(&mut persona, entry);
        }

        assert_eq!(persona.memory.len(), 50);
        let low = persona.memory.iter().filter(|entry| entry.effectiveness_score == Some(0.1)).count();
        assert_eq!(low, 5);
        assert_eq!(persona.memory.last().map(|entry| entry.message.as_str()), Some("entry 59"));

        let timestamps: Vec<_> = persona.memory.iter().map(|entry| entry.timestamp).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn test_recent_entries_survive_even_when_unscored() {
        let store = MemoryStore::new(12);
        let mut persona = persona();
        for i in 0..12 {
            store.append(&mut persona, entry_at(&format!("old {i}"), i).with_effectiveness(1.0));
        }
        for i in 12..22 {
            store.append(&mut persona, entry_at(&format!("new {i}"), i));
        }
        assert_eq!(persona.memory.len(), 12);
        assert!(persona.memory[2..].iter().all(|entry| entry.message.starts_with("new")));
    }

    #[test]
    fn test_relevant_context_orders_by_score() {
        let store = MemoryStore::default();
        let mut persona = persona();
        let now = Utc::now();
        store.append(&mut persona, ConversationEntry::user("nothing to see", vec![], 0.0).at(now - Duration::days(10)));
        store.append(
            &mut persona,
            ConversationEntry::user("my career is stuck", vec!["career".to_string()], 0.0).at(now),
        );
        store.append(&mut persona, ConversationEntry::user("lunch", vec![], 0.0).at(now - Duration::days(1)));

        let context = store.relevant_context(&persona, "career", 2, now);
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].message, "my career is stuck");
        assert_eq!(context[1].message, "lunch");
    }

    #[test]
    fn test_conversation_thread() {
        let store = MemoryStore::default();
        let mut persona = persona();
        for i in 0..4 {
            store.append(&mut persona, entry_at(&format!("line {i}"), i));
        }
        let thread = store.conversation_thread(&persona, 2);
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].message, "line 2");
        assert_eq!(store.conversation_thread(&persona, 10).len(), 4);
    }

    #[test]
    fn test_purge_older_than() {
        let store = MemoryStore::default();
        let mut persona = persona();
        let now = Utc::now();
        store.append(&mut persona, ConversationEntry::user("ancient", vec![], 0.0).at(now - Duration::days(40)));
        store.append(&mut persona, ConversationEntry::user("fresh", vec![], 0.0).at(now));

        assert_eq!(store.purge_older_than(&mut persona, 30, now), 1);
        assert_eq!(persona.memory.len(), 1);
        assert_eq!(store.purge_older_than(&mut persona, 30, now), 0);
    }

    #[test]
    fn test_stats() {
        let store = MemoryStore::default();
        let mut persona = persona();
        assert_eq!(store.stats(&persona).average_effectiveness, 0.0);
        assert!(store.stats(&persona).oldest.is_none());

        store.append(&mut persona, ConversationEntry::user("hi", vec![], 0.0));
        store.append(&mut persona, ConversationEntry::new("SavageBurn", "burn", vec![], 0.0).with_effectiveness(0.5));
        store.append(&mut persona, ConversationEntry::new("SavageBurn", "burn", vec![], 0.0));

        let stats = store.stats(&persona);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.user_entries, 1);
        assert_eq!(stats.persona_entries, 2);
        assert_eq!(stats.average_effectiveness, 0.5);
        assert!(stats.oldest <= stats.newest);
    }

    #[test]
    fn test_record_effectiveness() {
        let store = MemoryStore::default();
        let mut persona = persona();
        let entry = ConversationEntry::new("SavageBurn", "burn", vec![], 0.0);
        let id = entry.id.clone();
        store.append(&mut persona, entry);

        assert!(store.record_effectiveness(&mut persona, &id, 0.75));
        assert_eq!(persona.memory[0].effectiveness_score, Some(0.75));
        assert!(!store.record_effectiveness(&mut persona, "missing", 0.75));
    }

    #[test]
    fn test_analyze_user_patterns_caches_on_persona() {
        let store = MemoryStore::default();
        let mut persona = persona();
        store.append(&mut persona, ConversationEntry::user("my job is awful", vec![], -1.0));
        let patterns = store.analyze_user_patterns(&mut persona);
        assert_eq!(patterns.messages_analyzed, 1);
        assert_eq!(persona.user_patterns, Some(patterns));
    }

    #[test]
    fn test_export_import_roundtrip() {
        let store = MemoryStore::default();
        let mut source = persona();
        store.append(&mut source, ConversationEntry::user("first", vec!["food".to_string()], 0.4));
        store.append(&mut source, ConversationEntry::new("SavageBurn", "second", vec![], -0.2).with_effectiveness(0.8));

        let json = store.export(&source).unwrap();
        let mut target = Persona::new(PersonaKind::UncleJi);
        assert_eq!(store.import(&mut target, &json).unwrap(), 2);
        let ids: Vec<&str> = target.memory.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec![source.memory[0].id.as_str(), source.memory[1].id.as_str()]);
        assert_eq!(target.memory[1].message, "second");
        assert_eq!(target.memory[0].timestamp, source.memory[0].timestamp);
    }

    #[test]
    fn test_import_rejects_invalid_records() {
        let store = MemoryStore::default();
        let mut persona = persona();
        store.append(&mut persona, ConversationEntry::user("keep me", vec![], 0.0));

        let mut bad = ConversationEntry::user("bad", vec![], 0.0);
        bad.sentiment = 1.5;
        let json = serde_json::to_string(&vec![bad]).unwrap();

        let result = store.import(&mut persona, &json);
        assert!(matches!(result, Err(MemoryError::InvalidRecord { index: 0, .. })));
        assert_eq!(persona.memory.len(), 1);

        let mut unnamed = ConversationEntry::user("no id", vec![], 0.0);
        unnamed.id = String::new();
        let json = serde_json::to_string(&vec![unnamed]).unwrap();
        let err = store.import(&mut persona, &json).unwrap_err();
        assert!(err.to_string().contains("empty id"));

        assert!(matches!(store.import(&mut persona, "not json"), Err(MemoryError::Serialization(_))));
    }
}
