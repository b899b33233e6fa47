use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    pub(crate) static ref WORD_PATTERN: Regex = Regex::new(r"\w+").expect("word pattern is valid");
    pub(crate) static ref PUNCTUATION_PATTERN: Regex = Regex::new(r"[^\w\s]").expect("punctuation pattern is valid");
}

pub const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("career", &["job", "work", "career", "boss", "office", "salary", "promotion", "interview", "resume"]),
    ("relationships", &["girlfriend", "boyfriend", "dating", "love", "crush", "relationship", "marriage", "single"]),
    ("food", &["eat", "food", "cook", "recipe", "restaurant", "hungry", "dinner", "lunch", "breakfast"]),
    ("technology", &["computer", "phone", "app", "software", "coding", "programming", "tech", "internet"]),
    ("health", &["gym", "exercise", "diet", "sick", "doctor", "medicine", "fitness", "workout"]),
    ("money", &["money", "expensive", "cheap", "budget", "broke", "rich", "cost", "price", "financial"]),
    ("education", &["school", "study", "exam", "college", "university", "degree", "learning", "homework"]),
    ("entertainment", &["movie", "music", "game", "tv", "show", "book", "party", "fun", "weekend"]),
    ("family", &["family", "parents", "mom", "dad", "sister", "brother", "relatives", "home"]),
    ("travel", &["travel", "vacation", "trip", "flight", "hotel", "visit", "explore", "journey"]),
];

pub const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "awesome", "amazing", "love", "happy", "excited", "wonderful", "fantastic", "excellent",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "sad", "angry", "frustrated", "disappointed", "worried", "stressed",
];

pub const QUESTION_WORDS: &[&str] = &["what", "how", "why", "when", "where", "who", "which", "should i", "can you"];

pub const URGENCY_INDICATORS: &[&str] = &[
    "urgent", "asap", "immediately", "now", "quick", "fast", "hurry", "emergency", "!!!", "help!", "need", "must",
    "have to", "should", "important",
];

pub const BEHAVIOR_INDICATORS: &[(&str, &[&str])] = &[
    ("indecisive", &["i don't know", "not sure", "maybe", "what should i", "help me decide"]),
    ("complainer", &["always", "never", "everything", "nothing works", "so annoying", "hate when"]),
    ("perfectionist", &["perfect", "exactly", "precisely", "must be", "has to be", "should be"]),
    ("procrastinator", &["later", "tomorrow", "eventually", "when i have time", "putting off"]),
    ("overachiever", &["best", "top", "first", "win", "achieve", "goal", "success", "excel"]),
    ("social", &["friends", "people", "everyone", "party", "hang out", "meet up", "social"]),
    ("introvert", &["alone", "quiet", "by myself", "don't like crowds", "prefer", "stay in"]),
];

const SENTIMENT_AMPLIFICATION: f64 = 10.0;
const MAX_REPEATED_PHRASES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub topics: Vec<String>,
    pub sentiment: f64,
    pub urgency: f64,
    pub question_count: usize,
    pub repeated_phrases: Vec<String>,
    pub behavioral_flags: Vec<String>,
}

impl AnalysisResult {
    pub fn primary_topic(&self) -> Option<&str> {
        self.topics.first().map(String::as_str)
    }
}

/// Keyword and heuristic message analysis. Stateless; every method is a pure
/// function of its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageAnalyzer;

impl MessageAnalyzer {
    pub fn new() -> Self {
        MessageAnalyzer
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let lower = text.to_lowercase();
        if lower.trim().is_empty() {
            return AnalysisResult::default();
        }

        AnalysisResult {
            topics: self.detect_topics(&lower),
            sentiment: self.sentiment(&lower),
            urgency: self.urgency(text, &lower),
            question_count: self.question_count(text, &lower),
            repeated_phrases: self.repeated_phrases(&lower),
            behavioral_flags: self.behavioral_flags(&lower),
        }
    }

    pub fn analyze_optional(&self, text: Option<&str>) -> AnalysisResult {
        self.analyze(text.unwrap_or_default())
    }

    fn detect_topics(&self, lower: &str) -> Vec<String> {
        matching_labels(TOPIC_KEYWORDS, lower)
    }

    fn behavioral_flags(&self, lower: &str) -> Vec<String> {
        matching_labels(BEHAVIOR_INDICATORS, lower)
    }

    pub(crate) fn sentiment(&self, lower: &str) -> f64 {
        let word_count = lower.split_whitespace().count();
        if word_count == 0 {
            return 0.0;
        }

        let positive = count_present(POSITIVE_WORDS, lower) as f64 / word_count as f64;
        let negative = count_present(NEGATIVE_WORDS, lower) as f64 / word_count as f64;

        ((positive - negative) * SENTIMENT_AMPLIFICATION).clamp(-1.0, 1.0)
    }

    fn urgency(&self, original: &str, lower: &str) -> f64 {
        let mut score = count_present(URGENCY_INDICATORS, lower);

        if lower.contains("!!!") || original.matches('!').count() > 2 {
            score += 2;
        }

        score += original
            .split_whitespace()
            .filter(|word| word.chars().count() > 2 && is_shouted(word))
            .count();

        (score as f64 / 5.0).clamp(0.0, 1.0)
    }

    pub(crate) fn question_count(&self, original: &str, lower: &str) -> usize {
        original.matches('?').count() + count_present(QUESTION_WORDS, lower)
    }

    fn repeated_phrases(&self, lower: &str) -> Vec<String> {
        let words: Vec<&str> = WORD_PATTERN.find_iter(lower).map(|m| m.as_str()).collect();

        let mut phrases = Vec::new();
        for window in words.windows(2) {
            phrases.push(window.join(" "));
        }
        for window in words.windows(3) {
            phrases.push(window.join(" "));
        }

        most_common(phrases)
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(phrase, _)| phrase)
            .take(MAX_REPEATED_PHRASES)
            .collect()
    }
}

fn matching_labels(table: &[(&str, &[&str])], lower: &str) -> Vec<String> {
    table
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(label, _)| label.to_string())
        .collect()
}

fn count_present(words: &[&str], lower: &str) -> usize {
    words.iter().filter(|word| lower.contains(*word)).count()
}

fn is_shouted(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Counts items and orders them by descending count; ties keep first-seen order.
pub(crate) fn most_common<I>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for item in items {
        let count = counts.entry(item.clone()).or_insert(0);
        if *count == 0 {
            order.push(item);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|item| {
            let count = counts.get(&item).copied().unwrap_or(0);
            (item, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::{most_common, MessageAnalyzer};

    #[test]
    fn test_empty_text_is_neutral() {
        let analysis = MessageAnalyzer::new().analyze("");
        assert_eq!(analysis.sentiment, 0.0);
        assert_eq!(analysis.urgency, 0.0);
        assert!(analysis.topics.is_empty());
        assert!(analysis.behavioral_flags.is_empty());
        assert_eq!(analysis.question_count, 0);
    }

    #[test]
    fn test_whitespace_and_none_are_neutral() {
        let analyzer = MessageAnalyzer::new();
        assert_eq!(analyzer.analyze("   \n\t"), Default::default());
        assert_eq!(analyzer.analyze_optional(None), Default::default());
    }

    #[test]
    fn test_topics_follow_table_order() {
        let analysis = MessageAnalyzer::new().analyze("My boss wants me to cook dinner for the team");
        assert_eq!(analysis.topics, vec!["career".to_string(), "food".to_string()]);
        assert_eq!(analysis.primary_topic(), Some("career"));
    }

    #[test]
    fn test_sentiment_is_amplified_and_clamped() {
        let analyzer = MessageAnalyzer::new();
        assert_eq!(analyzer.analyze("great day").sentiment, 1.0);
        assert_eq!(analyzer.analyze("terrible awful day").sentiment, -1.0);

        let mild = analyzer.analyze("it was a good day but the traffic was slow and the bus was late today again");
        assert!(mild.sentiment > 0.0 && mild.sentiment < 1.0);
    }

    #[test]
    fn test_urgency_saturates() {
        let analysis = MessageAnalyzer::new().analyze("I am SO stressed!!! this is urgent, help now");
        assert_eq!(analysis.urgency, 1.0);
    }

    #[test]
    fn test_caps_words_raise_urgency() {
        let analysis = MessageAnalyzer::new().analyze("WHERE ARE my keys");
        assert!((analysis.urgency - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_question_count() {
        let analysis = MessageAnalyzer::new().analyze("Why is the sink full?");
        assert_eq!(analysis.question_count, 2);
    }

    #[test]
    fn test_repeated_phrases() {
        let analysis = MessageAnalyzer::new().analyze("you know what, you know what i mean, you know");
        assert_eq!(analysis.repeated_phrases[0], "you know");
        assert!(analysis.repeated_phrases.contains(&"you know what".to_string()));
        assert!(analysis.repeated_phrases.len() <= 5);
    }

    #[test]
    fn test_behavioral_flags() {
        let analysis = MessageAnalyzer::new().analyze("Not sure, maybe I'll do it tomorrow");
        assert_eq!(analysis.behavioral_flags, vec!["indecisive".to_string(), "procrastinator".to_string()]);
    }

    #[test]
    fn test_most_common_keeps_first_seen_order_on_ties() {
        let ranked = most_common(vec!["b".to_string(), "a".to_string(), "a".to_string(), "c".to_string()]);
        assert_eq!(ranked[0], ("a".to_string(), 2));
        assert_eq!(ranked[1], ("b".to_string(), 1));
        assert_eq!(ranked[2], ("c".to_string(), 1));
    }
}
