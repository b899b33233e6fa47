use serde::{Deserialize, Serialize};

use super::analyzer::MessageAnalyzer;
use crate::modules::memory::ConversationEntry;

const DEFENSIVE_PHRASES: &[&str] = &[
    "that's not true",
    "whatever",
    "shut up",
    "you're wrong",
    "i don't care",
    "so what",
    "and?",
    "your point?",
];

const COMEBACK_PHRASES: &[&str] = &[
    "at least",
    "well you",
    "says the",
    "look who's talking",
    "that's rich coming from",
    "you're one to talk",
];

const TREND_THRESHOLD: f64 = 0.05;
const MIN_TREND_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectivenessTrend {
    InsufficientData,
    Improving,
    Declining,
    Stable,
}

impl EffectivenessTrend {
    /// Classifies the least-squares slope of `scores` against their index.
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.len() < MIN_TREND_POINTS {
            return EffectivenessTrend::InsufficientData;
        }

        let n = scores.len() as f64;
        let sum_x: f64 = (0..scores.len()).map(|i| i as f64).sum();
        let sum_y: f64 = scores.iter().sum();
        let sum_xy: f64 = scores.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
        let sum_x2: f64 = (0..scores.len()).map(|i| (i * i) as f64).sum();

        let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);

        if slope > TREND_THRESHOLD {
            EffectivenessTrend::Improving
        } else if slope < -TREND_THRESHOLD {
            EffectivenessTrend::Declining
        } else {
            EffectivenessTrend::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoastFrequencyLevel {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoastFrequency {
    pub average_gap_minutes: f64,
    pub level: RoastFrequencyLevel,
    pub total_roasts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoastPatterns {
    pub average_effectiveness: f64,
    pub trend: EffectivenessTrend,
    pub topic_effectiveness: Vec<(String, f64)>,
    pub frequency: Option<RoastFrequency>,
}

impl MessageAnalyzer {
    /// Heuristic score in [0, 1] for how hard a roast landed, judged from the reply.
    pub fn score_effectiveness(&self, _roast: &str, response: &str, response_time_seconds: f64) -> f64 {
        let lower = response.to_lowercase();
        if lower.trim().is_empty() {
            return 0.1;
        }

        let mut score = if response_time_seconds < 10.0 {
            0.3
        } else if response_time_seconds < 30.0 {
            0.25
        } else if response_time_seconds < 60.0 {
            0.2
        } else if response_time_seconds < 300.0 {
            0.15
        } else {
            0.1
        };

        let length = response.chars().count();
        score += if length > 100 {
            0.25
        } else if length > 50 {
            0.2
        } else if length > 20 {
            0.15
        } else {
            0.1
        };

        score += self.sentiment(&lower).abs() * 0.2;

        if DEFENSIVE_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            score += 0.15;
        }
        if COMEBACK_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            score += 0.1;
        }
        if self.question_count(response, &lower) > 0 {
            score += 0.05;
        }

        score.clamp(0.0, 1.0)
    }

    /// Summarises scored persona lines. Returns `None` when none carries a score.
    pub fn roast_patterns(&self, roasts: &[ConversationEntry]) -> Option<RoastPatterns> {
        let scored: Vec<&ConversationEntry> = roasts
            .iter()
            .filter(|entry| !entry.is_user() && entry.effectiveness_score.is_some())
            .collect();
        if scored.is_empty() {
            return None;
        }

        let scores: Vec<f64> = scored.iter().map(|entry| entry.effectiveness_or_zero()).collect();
        let average_effectiveness = scores.iter().sum::<f64>() / scores.len() as f64;

        let mut per_topic: Vec<(String, f64, usize)> = Vec::new();
        for entry in &scored {
            for tag in &entry.context_tags {
                match per_topic.iter_mut().find(|(topic, _, _)| topic == tag) {
                    Some((_, total, count)) => {
                        *total += entry.effectiveness_or_zero();
                        *count += 1;
                    }
                    None => per_topic.push((tag.clone(), entry.effectiveness_or_zero(), 1)),
                }
            }
        }

        Some(RoastPatterns {
            average_effectiveness,
            trend: EffectivenessTrend::from_scores(&scores),
            topic_effectiveness: per_topic
                .into_iter()
                .map(|(topic, total, count)| (topic, total / count as f64))
                .collect(),
            frequency: roast_frequency(&scored),
        })
    }
}

fn roast_frequency(roasts: &[&ConversationEntry]) -> Option<RoastFrequency> {
    if roasts.len() < 2 {
        return None;
    }

    let gaps: Vec<f64> = roasts
        .windows(2)
        .map(|pair| (pair[1].timestamp - pair[0].timestamp).num_seconds() as f64 / 60.0)
        .collect();
    let average_gap_minutes = gaps.iter().sum::<f64>() / gaps.len() as f64;

    let level = if average_gap_minutes < 5.0 {
        RoastFrequencyLevel::High
    } else if average_gap_minutes < 15.0 {
        RoastFrequencyLevel::Moderate
    } else {
        RoastFrequencyLevel::Low
    };

    Some(RoastFrequency {
        average_gap_minutes,
        level,
        total_roasts: roasts.len(),
    })
}
