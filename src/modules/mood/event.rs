use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodEvent {
    RoastReceived,
    RoastSuccessful,
    Defended,
    Complimented,
    Ignored,
    Praised,
    Criticized,
    Supported,
}

impl MoodEvent {
    pub const ALL: [MoodEvent; 8] = [
        MoodEvent::RoastReceived,
        MoodEvent::RoastSuccessful,
        MoodEvent::Defended,
        MoodEvent::Complimented,
        MoodEvent::Ignored,
        MoodEvent::Praised,
        MoodEvent::Criticized,
        MoodEvent::Supported,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodEvent::RoastReceived => "roast_received",
            MoodEvent::RoastSuccessful => "roast_successful",
            MoodEvent::Defended => "defended",
            MoodEvent::Complimented => "complimented",
            MoodEvent::Ignored => "ignored",
            MoodEvent::Praised => "praised",
            MoodEvent::Criticized => "criticized",
            MoodEvent::Supported => "supported",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.iter().copied().find(|event| event.as_str().eq_ignore_ascii_case(name))
    }

    /// Mood delta for an event of the given intensity (clamped to 1..=10).
    /// Halving and thirding round toward negative infinity.
    pub fn delta(&self, intensity: i32) -> i32 {
        let intensity = intensity.clamp(1, 10);
        match self {
            MoodEvent::RoastReceived | MoodEvent::Criticized => -intensity,
            MoodEvent::RoastSuccessful | MoodEvent::Supported => intensity.div_euclid(2),
            MoodEvent::Defended | MoodEvent::Complimented | MoodEvent::Praised => intensity,
            MoodEvent::Ignored => (-intensity).div_euclid(3),
        }
    }
}

impl fmt::Display for MoodEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
