use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::analyzer::{most_common, MessageAnalyzer, PUNCTUATION_PATTERN};
use crate::modules::memory::ConversationEntry;

const MAX_DOMINANT_TOPICS: usize = 5;
const MAX_TENDENCIES: usize = 3;
const MAX_TOPIC_HISTORY: usize = 5;
const GENERAL_TOPIC: &str = "general";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStyle {
    #[default]
    Terse,
    Concise,
    Moderate,
    Verbose,
    ExtremelyVerbose,
}

impl CommunicationStyle {
    pub fn from_average_length(average_chars: f64) -> Self {
        if average_chars < 20.0 {
            CommunicationStyle::Terse
        } else if average_chars < 50.0 {
            CommunicationStyle::Concise
        } else if average_chars < 100.0 {
            CommunicationStyle::Moderate
        } else if average_chars < 200.0 {
            CommunicationStyle::Verbose
        } else {
            CommunicationStyle::ExtremelyVerbose
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationStyle::Terse => "terse",
            CommunicationStyle::Concise => "concise",
            CommunicationStyle::Moderate => "moderate",
            CommunicationStyle::Verbose => "verbose",
            CommunicationStyle::ExtremelyVerbose => "extremely verbose",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSpeed {
    Fast,
    Moderate,
    Slow,
}

impl ResponseSpeed {
    pub fn from_average_gap(seconds: f64) -> Self {
        if seconds <= 30.0 {
            ResponseSpeed::Fast
        } else if seconds <= 300.0 {
            ResponseSpeed::Moderate
        } else {
            ResponseSpeed::Slow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivePeriod {
    Morning,
    Afternoon,
    Evening,
}

impl ActivePeriod {
    /// Buckets a UTC hour: 6 to 12 is morning, 13 to 18 afternoon, the rest evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=12 => ActivePeriod::Morning,
            13..=18 => ActivePeriod::Afternoon,
            _ => ActivePeriod::Evening,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePatterns {
    pub average_response_time_seconds: f64,
    pub response_speed: ResponseSpeed,
    pub most_active_period: ActivePeriod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatterns {
    pub messages_analyzed: usize,
    pub dominant_topics: Vec<(String, usize)>,
    pub average_sentiment: f64,
    pub sentiment_volatility: f64,
    pub behavioral_tendencies: Vec<(String, usize)>,
    pub communication_style: CommunicationStyle,
    pub question_frequency: f64,
    pub response_patterns: Option<ResponsePatterns>,
    pub conversation_starters: Vec<String>,
}

impl UserPatterns {
    pub fn is_empty(&self) -> bool {
        self.messages_analyzed == 0
    }

    /// One-line digest used inside generation prompts.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return String::from("no history yet");
        }

        let mut parts = Vec::new();
        if !self.dominant_topics.is_empty() {
            let topics: Vec<&str> = self.dominant_topics.iter().map(|(topic, _)| topic.as_str()).collect();
            parts.push(format!("keeps talking about {}", topics.join(", ")));
        }
        if !self.behavioral_tendencies.is_empty() {
            let traits: Vec<&str> = self.behavioral_tendencies.iter().map(|(tag, _)| tag.as_str()).collect();
            parts.push(format!("comes across as {}", traits.join(", ")));
        }
        parts.push(format!("writes in a {} way", self.communication_style.as_str()));
        parts.join("; ")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalTone {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl EmotionalTone {
    pub fn from_sentiment(sentiment: f64) -> Self {
        if sentiment > 0.3 {
            EmotionalTone::Positive
        } else if sentiment < -0.3 {
            EmotionalTone::Negative
        } else {
            EmotionalTone::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub current_topic: String,
    pub participants: Vec<String>,
    pub topic_history: Vec<String>,
    pub emotional_tone: EmotionalTone,
    pub thread_length: usize,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self {
            current_topic: String::from(GENERAL_TOPIC),
            participants: Vec::new(),
            topic_history: Vec::new(),
            emotional_tone: EmotionalTone::Neutral,
            thread_length: 0,
        }
    }
}

impl MessageAnalyzer {
    /// Aggregates a user's message history. Non-user entries are ignored.
    pub fn detect_user_patterns(&self, history: &[ConversationEntry]) -> UserPatterns {
        let user_entries: Vec<&ConversationEntry> = history.iter().filter(|entry| entry.is_user()).collect();
        if user_entries.is_empty() {
            return UserPatterns::default();
        }

        let analyses: Vec<_> = user_entries.iter().map(|entry| self.analyze(&entry.message)).collect();
        let count = user_entries.len() as f64;

        let topics = analyses.iter().flat_map(|analysis| analysis.topics.iter().cloned());
        let flags = analyses.iter().flat_map(|analysis| analysis.behavioral_flags.iter().cloned());

        let sentiments: Vec<f64> = analyses.iter().map(|analysis| analysis.sentiment).collect();
        let average_sentiment = sentiments.iter().sum::<f64>() / count;

        let average_length = user_entries
            .iter()
            .map(|entry| entry.message.chars().count() as f64)
            .sum::<f64>()
            / count;
        let questions: usize = analyses.iter().map(|analysis| analysis.question_count).sum();

        UserPatterns {
            messages_analyzed: user_entries.len(),
            dominant_topics: most_common(topics).into_iter().take(MAX_DOMINANT_TOPICS).collect(),
            average_sentiment,
            sentiment_volatility: population_std_dev(&sentiments),
            behavioral_tendencies: most_common(flags).into_iter().take(MAX_TENDENCIES).collect(),
            communication_style: CommunicationStyle::from_average_length(average_length),
            question_frequency: questions as f64 / count,
            response_patterns: response_patterns(&user_entries),
            conversation_starters: conversation_starters(&user_entries),
        }
    }

    /// Describes where a conversation currently stands.
    pub fn conversation_context(&self, entries: &[ConversationEntry]) -> ConversationContext {
        if entries.is_empty() {
            return ConversationContext::default();
        }

        let analyses: Vec<_> = entries.iter().map(|entry| self.analyze(&entry.message)).collect();

        let current_topic = most_common(analyses.iter().flat_map(|analysis| analysis.topics.iter().cloned()))
            .into_iter()
            .next()
            .map(|(topic, _)| topic)
            .unwrap_or_else(|| GENERAL_TOPIC.to_string());

        let mut participants: Vec<String> = Vec::new();
        for entry in entries {
            if !participants.contains(&entry.speaker) {
                participants.push(entry.speaker.clone());
            }
        }

        let mut topic_history: Vec<String> = Vec::new();
        for topic in analyses.iter().filter_map(|analysis| analysis.primary_topic()) {
            if topic_history.last().map(String::as_str) != Some(topic) {
                topic_history.push(topic.to_string());
            }
        }
        let skip = topic_history.len().saturating_sub(MAX_TOPIC_HISTORY);
        topic_history.drain(..skip);

        let mood = analyses.iter().map(|analysis| analysis.sentiment).sum::<f64>() / entries.len() as f64;

        ConversationContext {
            current_topic,
            participants,
            topic_history,
            emotional_tone: EmotionalTone::from_sentiment(mood),
            thread_length: entries.len(),
        }
    }
}

pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn response_patterns(entries: &[&ConversationEntry]) -> Option<ResponsePatterns> {
    if entries.len() < 2 {
        return None;
    }

    let gaps: Vec<f64> = entries
        .windows(2)
        .map(|pair| seconds_between(pair[0].timestamp, pair[1].timestamp))
        .collect();
    let average = gaps.iter().sum::<f64>() / gaps.len() as f64;

    let periods = entries.iter().map(|entry| period_label(entry.timestamp));
    let most_active_period = most_common(periods)
        .into_iter()
        .next()
        .map(|(label, _)| period_from_label(&label))
        .unwrap_or(ActivePeriod::Evening);

    Some(ResponsePatterns {
        average_response_time_seconds: average,
        response_speed: ResponseSpeed::from_average_gap(average),
        most_active_period,
    })
}

fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}

fn period_label(timestamp: DateTime<Utc>) -> String {
    match ActivePeriod::from_hour(timestamp.hour()) {
        ActivePeriod::Morning => "morning",
        ActivePeriod::Afternoon => "afternoon",
        ActivePeriod::Evening => "evening",
    }
    .to_string()
}

fn period_from_label(label: &str) -> ActivePeriod {
    match label {
        "morning" => ActivePeriod::Morning,
        "afternoon" => ActivePeriod::Afternoon,
        _ => ActivePeriod::Evening,
    }
}

fn conversation_starters(entries: &[&ConversationEntry]) -> Vec<String> {
    let openers = entries.iter().filter_map(|entry| {
        let cleaned = PUNCTUATION_PATTERN.replace_all(&entry.message, "").to_lowercase();
        let words: Vec<&str> = cleaned.split_whitespace().take(2).collect();
        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    });

    let ranked = most_common(openers);
    let repeated: Vec<String> = ranked
        .iter()
        .take(5)
        .filter(|(_, count)| *count > 1)
        .map(|(opener, _)| opener.clone())
        .collect();

    if repeated.is_empty() {
        ranked.into_iter().take(3).map(|(opener, _)| opener).collect()
    } else {
        repeated
    }
}
