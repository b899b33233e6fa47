use std::collections::BTreeMap;

use super::interaction::InteractionKind;
use crate::modules::persona::{seed_affinity, PersonaKind};

pub const DEFAULT_SCORE: i32 = 50;
pub const SELF_SCORE: i32 = 100;
pub const DEFEND_THRESHOLD: i32 = 70;

const MIN_SCORE: i32 = 0;
const MAX_SCORE: i32 = 100;

pub fn relationship_status(score: i32) -> &'static str {
    match score {
        s if s >= 90 => "best friends",
        s if s >= 80 => "close friends",
        s if s >= 70 => "good friends",
        s if s >= 60 => "friendly",
        s if s >= 40 => "neutral",
        s if s >= 30 => "tense",
        s if s >= 20 => "hostile",
        s if s >= 10 => "enemies",
        _ => "bitter enemies",
    }
}

/// Roast intensity multiplier for a relationship score. Bands of twenty points
/// step down from 1.5 at score 0 to 0.5 at score 100 without ever rising.
pub fn intensity_for_score(score: i32) -> f64 {
    let score = score.clamp(MIN_SCORE, MAX_SCORE) as f64;
    let modifier = if score >= 80.0 {
        0.7 - (score - 80.0) * 0.01
    } else if score >= 60.0 {
        0.9 - (score - 60.0) * 0.01
    } else if score >= 40.0 {
        1.1 - (score - 40.0) * 0.01
    } else if score >= 20.0 {
        1.1 + (40.0 - score) * 0.01
    } else {
        1.3 + (20.0 - score) * 0.01
    };
    modifier.clamp(0.5, 1.5)
}

/// Symmetric affinity scores keyed by the sorted pair of persona names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipMatrix {
    scores: BTreeMap<(String, String), i32>,
}

impl RelationshipMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds every pair of `cast` with the mean of the two directed affinities.
    pub fn seeded(cast: &[PersonaKind]) -> Self {
        let mut matrix = Self::new();
        for (i, a) in cast.iter().enumerate() {
            for b in &cast[i + 1..] {
                if a == b {
                    continue;
                }
                let forward = DEFAULT_SCORE + seed_affinity(*a, *b);
                let backward = DEFAULT_SCORE + seed_affinity(*b, *a);
                let score = (forward + backward).div_euclid(2).clamp(MIN_SCORE, MAX_SCORE);
                matrix.scores.insert(pair_key(a.name(), b.name()), score);
            }
        }
        matrix
    }

    pub fn score(&self, a: &str, b: &str) -> i32 {
        if a == b {
            return SELF_SCORE;
        }
        self.scores.get(&pair_key(a, b)).copied().unwrap_or(DEFAULT_SCORE)
    }

    pub fn update(&mut self, a: &str, b: &str, delta: i32) {
        if a == b {
            return;
        }
        let score = self.scores.entry(pair_key(a, b)).or_insert(DEFAULT_SCORE);
        *score = (*score + delta).clamp(MIN_SCORE, MAX_SCORE);
    }

    pub fn should_defend(&self, defender: &str, target: &str) -> bool {
        defender != target && self.score(defender, target) > DEFEND_THRESHOLD
    }

    pub fn roast_intensity_modifier(&self, roaster: &str, target: &str) -> f64 {
        if roaster == target {
            return 1.0;
        }
        intensity_for_score(self.score(roaster, target))
    }

    /// Applies the fixed delta for an interaction and returns it.
    pub fn record_interaction(&mut self, a: &str, b: &str, kind: InteractionKind, success: bool) -> i32 {
        if a == b {
            return 0;
        }
        let delta = kind.delta(success);
        self.update(a, b, delta);
        delta
    }

    pub fn status(&self, a: &str, b: &str) -> &'static str {
        relationship_status(self.score(a, b))
    }

    /// Every stored relationship involving `persona`, by partner name.
    pub fn all_relationships(&self, persona: &str) -> BTreeMap<String, i32> {
        self.scores
            .iter()
            .filter_map(|((a, b), score)| {
                if a == persona {
                    Some((b.clone(), *score))
                } else if b == persona {
                    Some((a.clone(), *score))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn strongest(&self, persona: &str, limit: usize) -> Vec<(String, i32)> {
        let mut relationships: Vec<(String, i32)> = self.all_relationships(persona).into_iter().collect();
        relationships.sort_by(|a, b| b.1.cmp(&a.1));
        relationships.truncate(limit);
        relationships
    }

    pub fn weakest(&self, persona: &str, limit: usize) -> Vec<(String, i32)> {
        let mut relationships: Vec<(String, i32)> = self.all_relationships(persona).into_iter().collect();
        relationships.sort_by(|a, b| a.1.cmp(&b.1));
        relationships.truncate(limit);
        relationships
    }

    pub fn reset(&mut self, a: &str, b: &str) {
        if a != b {
            self.scores.insert(pair_key(a, b), DEFAULT_SCORE);
        }
    }

    /// Nested view where `summary[a][b] == summary[b][a]`.
    pub fn summary(&self) -> BTreeMap<String, BTreeMap<String, i32>> {
        let mut summary: BTreeMap<String, BTreeMap<String, i32>> = BTreeMap::new();
        for ((a, b), score) in &self.scores {
            summary.entry(a.clone()).or_default().insert(b.clone(), *score);
            summary.entry(b.clone()).or_default().insert(a.clone(), *score);
        }
        summary
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
