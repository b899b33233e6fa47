pub mod analyzer;
pub mod effectiveness;
pub mod patterns;

pub use analyzer::{AnalysisResult, MessageAnalyzer};
pub use effectiveness::{EffectivenessTrend, RoastFrequency, RoastFrequencyLevel, RoastPatterns};
pub use patterns::{
    ActivePeriod, CommunicationStyle, ConversationContext, EmotionalTone, ResponsePatterns, ResponseSpeed, UserPatterns,
};
