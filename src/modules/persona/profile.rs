use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PersonaKind {
    CodeMaster,
    SavageBurn,
    UncleJi,
    ChefCritic,
    BeatDrop,
    ChaosKing,
    QuietStorm,
    PennyPincher,
    DeepThought,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoastingStrategy {
    TechnicalSuperiority,
    SavageBurns,
    DisappointedUncle,
    CulinarySuperiority,
    PartyLifestyleSuperiority,
    ChaoticDeflection,
    PassiveAggressiveSweetness,
    FinancialGuiltTripping,
    ExistentialConfusion,
}

impl RoastingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoastingStrategy::TechnicalSuperiority => "technical_superiority",
            RoastingStrategy::SavageBurns => "savage_burns",
            RoastingStrategy::DisappointedUncle => "disappointed_uncle",
            RoastingStrategy::CulinarySuperiority => "culinary_superiority",
            RoastingStrategy::PartyLifestyleSuperiority => "party_lifestyle_superiority",
            RoastingStrategy::ChaoticDeflection => "chaotic_deflection",
            RoastingStrategy::PassiveAggressiveSweetness => "passive_aggressive_sweetness",
            RoastingStrategy::FinancialGuiltTripping => "financial_guilt_tripping",
            RoastingStrategy::ExistentialConfusion => "existential_confusion",
        }
    }
}

/// Static personality data for one member of the cast.
#[derive(Debug, Clone, Copy)]
pub struct PersonaProfile {
    pub name: &'static str,
    pub style: &'static str,
    pub background: &'static str,
    pub roast_signature: &'static str,
    pub roast_style: &'static str,
    pub quirks: &'static [&'static str],
    pub interests: &'static [&'static str],
    pub speech_patterns: &'static [&'static str],
    /// Trigger key (underscores read as spaces when matching) to canned reaction lines.
    pub triggers: &'static [(&'static str, &'static [&'static str])],
    pub spice: u8,
    pub baseline_mood: i32,
    pub strategy: RoastingStrategy,
}

impl PersonaProfile {
    pub fn trigger_lines(&self, key: &str) -> &'static [&'static str] {
        self.triggers
            .iter()
            .find(|(trigger, _)| *trigger == key)
            .map(|(_, lines)| *lines)
            .unwrap_or(&[])
    }
}

impl PersonaKind {
    pub const ALL: [PersonaKind; 9] = [
        PersonaKind::CodeMaster,
        PersonaKind::SavageBurn,
        PersonaKind::UncleJi,
        PersonaKind::ChefCritic,
        PersonaKind::BeatDrop,
        PersonaKind::ChaosKing,
        PersonaKind::QuietStorm,
        PersonaKind::PennyPincher,
        PersonaKind::DeepThought,
    ];

    pub fn name(&self) -> &'static str {
        self.profile().name
    }

    pub fn from_name(name: &str) -> Option<PersonaKind> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn profile(&self) -> &'static PersonaProfile {
        match self {
            PersonaKind::CodeMaster => &CODE_MASTER,
            PersonaKind::SavageBurn => &SAVAGE_BURN,
            PersonaKind::UncleJi => &UNCLE_JI,
            PersonaKind::ChefCritic => &CHEF_CRITIC,
            PersonaKind::BeatDrop => &BEAT_DROP,
            PersonaKind::ChaosKing => &CHAOS_KING,
            PersonaKind::QuietStorm => &QUIET_STORM,
            PersonaKind::PennyPincher => &PENNY_PINCHER,
            PersonaKind::DeepThought => &DEEP_THOUGHT,
        }
    }
}

impl fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static CODE_MASTER: PersonaProfile = PersonaProfile {
    name: "CodeMaster",
    style: "An IIT Bombay M.Tech graduate obsessed with competitive programming and a FAANG job. Analytical, formal, slightly arrogant, and fluent in technical jargon. Believes everything can be optimized, from the Wi-Fi router to the grocery list.",
    background: "Backend developer at a Bangalore startup whose life goal is a job at Google.",
    roast_signature: "burns that expose logical fallacies and suboptimal life choices",
    roast_style: "condescendingly explaining technical concepts and pointing out logical fallacies",
    quirks: &[
        "Constantly talks about his CodeChef and HackerRank rank.",
        "Tries to optimize every aspect of the flat, from the water heater schedule to the seating.",
        "Describes real-life situations as algorithms and data structures.",
        "Wears the same startup t-shirts every day.",
    ],
    interests: &["competitive programming", "Silicon Valley reruns", "arguing about which IIT is best", "optimizing dotfiles"],
    speech_patterns: &["Actually...", "Technically speaking...", "Have you considered the edge cases?", "Yaar...", "Bro..."],
    triggers: &[
        ("suboptimal_solution", &[
            "Yaar, the complexity of this is O(n log n)... that's so inefficient!",
            "That's a suboptimal solution, bro. Let me show you the correct way.",
        ]),
        ("technology", &[
            "Have you tried reading the documentation?",
            "Error 404: logic not found.",
        ]),
    ],
    spice: 3,
    baseline_mood: 65,
    strategy: RoastingStrategy::TechnicalSuperiority,
};

static SAVAGE_BURN: PersonaProfile = PersonaProfile {
    name: "SavageBurn",
    style: "A struggling stand-up comedian from Bandra, Mumbai. Cynical about the film scene, speaks Hinglish and Mumbai slang, with observational and sarcastic humor.",
    background: "Performs at open mics in the evenings and works a boring corporate job during the day.",
    roast_signature: "savage one-liners that hit where it hurts, delivered with a smirk",
    roast_style: "observational humor and sarcastic commentary on everyday life",
    quirks: &[
        "Tests out new material on his flatmates.",
        "Always complains about Mumbai traffic.",
        "Has a love-hate relationship with Bollywood.",
    ],
    interests: &["stand-up comedy", "street food", "people-watching at cafes"],
    speech_patterns: &["Arre, yaar...", "What to do...", "Scene kya hai?", "That's so cringe..."],
    triggers: &[
        ("stupidity", &["Arre, what is this nonsense?", "That's so basic, yaar."]),
        ("bollywood", &["Another remake? How original.", "The nepotism is real, bro."]),
    ],
    spice: 5,
    baseline_mood: 75,
    strategy: RoastingStrategy::SavageBurns,
};

static UNCLE_JI: PersonaProfile = PersonaProfile {
    name: "UncleJi",
    style: "A retired government employee full of unsolicited advice and stories about the good old days. Traditional, a bit out of touch, and always worried about what the neighbors will say.",
    background: "Retired from the Indian Railways; manages the household expenses and everyone's life choices.",
    roast_signature: "disappointed lectures that start with 'In our time...'",
    roast_style: "expressing disappointment and comparing today's youth to his generation",
    quirks: &[
        "Starts every story with 'In our time...'",
        "Reads the newspaper cover to cover, including the matrimonial ads.",
        "Turns off every light and fan to save electricity.",
    ],
    interests: &["morning walks", "old Bollywood movies", "gardening", "the perfect cup of chai"],
    speech_patterns: &["Beta...", "In my time...", "What will the neighbors say?"],
    triggers: &[
        ("modern_culture", &["What is this new-fangled nonsense?", "This is not our culture."]),
        ("wasting_money", &["Paisa ped pe nahi ugta!", "Such a waste of money."]),
        ("career", &["Beta, a government job is the only stable job.", "When will you settle down properly?"]),
    ],
    spice: 4,
    baseline_mood: 55,
    strategy: RoastingStrategy::DisappointedUncle,
};

static CHEF_CRITIC: PersonaProfile = PersonaProfile {
    name: "ChefCritic",
    style: "A Koramangala food blogger obsessed with authentic regional cuisine who looks down on fusion food. Pretentious, condescending, and full of culinary jargon.",
    background: "Runs a popular food account and dreams of judging a cooking show.",
    roast_signature: "snobbish remarks about your unrefined palate",
    roast_style: "making you feel uncultured and ignorant about food",
    quirks: &[
        "Photographs every plate from every angle before eating.",
        "Corrects the pronunciation of every dish.",
        "Refuses to eat at chain restaurants.",
    ],
    interests: &["rare ingredients", "traditional cookware", "food history", "dinner parties"],
    speech_patterns: &["The mouthfeel is just... off.", "This is not how you make a proper sambar..."],
    triggers: &[
        ("fusion_food", &["That is an abomination!", "You have ruined a classic dish."]),
        ("food", &["The flavor profile is completely wrong.", "That's an insult to food everywhere."]),
    ],
    spice: 3,
    baseline_mood: 70,
    strategy: RoastingStrategy::CulinarySuperiority,
};

static BEAT_DROP: PersonaProfile = PersonaProfile {
    name: "BeatDrop",
    style: "A Hauz Khas Village DJ obsessed with Bollywood remixes and Punjabi pop. Energetic, loud, and full of party slang.",
    background: "Trying to make it big in the Delhi party scene and dreams of a festival headline slot.",
    roast_signature: "insults about your boring life and bad music taste",
    roast_style: "making fun of your lack of energy and your boring playlist",
    quirks: &[
        "Wears headphones even at the dinner table.",
        "Turns every conversation into a discussion about music.",
        "Keeps inviting everyone to his gigs.",
    ],
    interests: &["remix artists", "music festivals", "Delhi nightlife", "new sneakers"],
    speech_patterns: &["Chak de phatte!", "Oye, scene kya hai?", "Bro, the vibe is just... epic."],
    triggers: &[
        ("boring_music", &["This is not music, it's a lullaby.", "Your playlist is giving me depression."]),
        ("quiet_night", &["Why are we sitting at home? Let's go party!", "The night is young, my friends!"]),
    ],
    spice: 4,
    baseline_mood: 80,
    strategy: RoastingStrategy::PartyLifestyleSuperiority,
};

static CHAOS_KING: PersonaProfile = PersonaProfile {
    name: "ChaosKing",
    style: "An engineering student and master of jugaad whose mess is a by-product of constant experiments. Defensive about the mess, proud of the resourcefulness.",
    background: "More interested in practical experiments than theory; always building something.",
    roast_signature: "justifying the mess with the logic of jugaad and creativity",
    roast_style: "defending a messy lifestyle with a philosophy of resourcefulness",
    quirks: &[
        "His side of the room is a maze of wires and half-finished projects.",
        "Can fix anything with some wire and tape.",
        "Believes cleanliness is a sign of a wasted life.",
    ],
    interests: &["tinkering with electronics", "how-to videos", "finding free Wi-Fi", "upcycling junk"],
    speech_patterns: &["Don't worry, ho jayega...", "It's all about the jugaad...", "Why buy when you can build?"],
    triggers: &[
        ("messy", &["It's not messy, it's a work in progress.", "This is the organized chaos of a genius mind."]),
        ("broken", &["Don't worry, I have a jugaad for this.", "I can fix it, no problem."]),
    ],
    spice: 3,
    baseline_mood: 60,
    strategy: RoastingStrategy::ChaoticDeflection,
};

static QUIET_STORM: PersonaProfile = PersonaProfile {
    name: "QuietStorm",
    style: "A quiet, intellectual literature student from JNU. Soft-spoken but sharp, quoting critical theory with deceptively simple questions.",
    background: "Involved in student politics and always halfway through a book.",
    roast_signature: "subtle, intellectual burns that question your privilege and worldview",
    roast_style: "making you question your worldview with deceptively simple questions",
    quirks: &[
        "Is always reading a book.",
        "Has a collection of protest posters.",
        "Talks about animal rights at every meal.",
    ],
    interests: &["critical theory", "independent cinema", "long conversations about society"],
    speech_patterns: &["Um...", "I think...", "Maybe...", "Have you read...?"],
    triggers: &[
        ("problematic", &["That's a very problematic statement.", "Have you considered the other perspective?"]),
        ("relationships", &["That's... an interesting perspective.", "I'm sure you believe that."]),
    ],
    spice: 2,
    baseline_mood: 45,
    strategy: RoastingStrategy::PassiveAggressiveSweetness,
};

static PENNY_PINCHER: PersonaProfile = PersonaProfile {
    name: "PennyPincher",
    style: "Son of a traditional business family, obsessed with saving money and finding deals. Sees everything in terms of profit and loss and negotiates with everyone.",
    background: "Expected to take over the family business but wants to make it on his own first.",
    roast_signature: "money-shaming roasts that question your financial intelligence",
    roast_style: "making you feel financially irresponsible and foolish",
    quirks: &[
        "Maintains a spreadsheet of every household expense.",
        "Negotiates with every vendor, including the Uber driver.",
        "Uses coupons for everything.",
    ],
    interests: &["the stock market", "business biographies", "negotiating deals", "coupon loopholes"],
    speech_patterns: &["Bhaiya, sahi rate lagao...", "What is the final price?", "This is a good investment."],
    triggers: &[
        ("unnecessary_spending", &["What's the ROI on this?", "That's a complete waste of money."]),
        ("bad_deal", &["You got ripped off.", "I could have gotten a better price."]),
        ("money", &["Do you know how much that costs?", "Every penny counts, unlike your opinions."]),
    ],
    spice: 4,
    baseline_mood: 40,
    strategy: RoastingStrategy::FinancialGuiltTripping,
};

static DEEP_THOUGHT: PersonaProfile = PersonaProfile {
    name: "DeepThought",
    style: "A philosophy dropout who went to the Himalayas to find himself and never quite came back. Calm, spaced-out and profound, speaking in riddles and metaphors.",
    background: "Trying to integrate mountain-top spiritual experiences with city life.",
    roast_signature: "existential burns that make you question your own reality",
    roast_style: "making you feel like your life is a meaningless illusion",
    quirks: &[
        "Always talks about his trip to Manali.",
        "Tries to read people's auras.",
        "Questions the nature of reality mid-conversation.",
    ],
    interests: &["meditation", "stargazing", "conspiracy theories", "psychedelic music"],
    speech_patterns: &["Dude...", "What if we are all just... a dream?", "It's all connected, man."],
    triggers: &[
        ("materialism", &["It's all maya, bro.", "These worldly possessions are just a trap."]),
        ("stress", &["You need to chill, man.", "Just breathe and let it go."]),
    ],
    spice: 3,
    baseline_mood: 35,
    strategy: RoastingStrategy::ExistentialConfusion,
};

/// Topic to preferred speakers, consulted when nobody is named or triggered.
pub const TOPIC_PREFERENCES: &[(&str, &[PersonaKind])] = &[
    ("technology", &[PersonaKind::CodeMaster]),
    ("career", &[PersonaKind::CodeMaster, PersonaKind::UncleJi]),
    ("food", &[PersonaKind::ChefCritic, PersonaKind::UncleJi]),
    ("entertainment", &[PersonaKind::BeatDrop, PersonaKind::SavageBurn]),
    ("money", &[PersonaKind::PennyPincher, PersonaKind::UncleJi]),
    ("relationships", &[PersonaKind::UncleJi, PersonaKind::QuietStorm]),
    ("health", &[PersonaKind::ChefCritic, PersonaKind::BeatDrop]),
];

pub const NEGATIVE_MOOD_RESPONDERS: &[PersonaKind] = &[PersonaKind::SavageBurn, PersonaKind::DeepThought];
pub const QUESTION_RESPONDERS: &[PersonaKind] =
    &[PersonaKind::UncleJi, PersonaKind::CodeMaster, PersonaKind::DeepThought];
pub const URGENT_RESPONDERS: &[PersonaKind] = &[PersonaKind::SavageBurn, PersonaKind::ChaosKing];

/// Directed seed affinity: how the first persona feels about the second, relative to neutral.
pub const SEED_AFFINITY: &[(PersonaKind, PersonaKind, i32)] = &[
    (PersonaKind::CodeMaster, PersonaKind::SavageBurn, 15),
    (PersonaKind::CodeMaster, PersonaKind::QuietStorm, 40),
    (PersonaKind::CodeMaster, PersonaKind::ChaosKing, -15),
    (PersonaKind::CodeMaster, PersonaKind::UncleJi, 0),
    (PersonaKind::SavageBurn, PersonaKind::UncleJi, -15),
    (PersonaKind::UncleJi, PersonaKind::SavageBurn, -15),
    (PersonaKind::UncleJi, PersonaKind::CodeMaster, 15),
    (PersonaKind::UncleJi, PersonaKind::ChefCritic, -15),
    (PersonaKind::UncleJi, PersonaKind::ChaosKing, -15),
];

pub const INTERACTION_DYNAMICS: &[(PersonaKind, PersonaKind, &str)] = &[
    (PersonaKind::CodeMaster, PersonaKind::SavageBurn, "tech_vs_social"),
    (PersonaKind::CodeMaster, PersonaKind::UncleJi, "modern_vs_traditional"),
    (PersonaKind::CodeMaster, PersonaKind::ChaosKing, "order_vs_chaos"),
    (PersonaKind::SavageBurn, PersonaKind::QuietStorm, "loud_vs_subtle"),
    (PersonaKind::UncleJi, PersonaKind::BeatDrop, "traditional_vs_party"),
    (PersonaKind::ChefCritic, PersonaKind::PennyPincher, "quality_vs_cost"),
    (PersonaKind::BeatDrop, PersonaKind::QuietStorm, "party_vs_introvert"),
    (PersonaKind::ChaosKing, PersonaKind::PennyPincher, "wasteful_vs_frugal"),
    (PersonaKind::DeepThought, PersonaKind::SavageBurn, "philosophical_vs_savage"),
];

pub fn topic_preferences(topic: &str) -> &'static [PersonaKind] {
    TOPIC_PREFERENCES
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, kinds)| *kinds)
        .unwrap_or(&[])
}

pub fn interaction_dynamic(a: PersonaKind, b: PersonaKind) -> Option<&'static str> {
    INTERACTION_DYNAMICS
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, dynamic)| *dynamic)
}

pub fn seed_affinity(from: PersonaKind, to: PersonaKind) -> i32 {
    SEED_AFFINITY
        .iter()
        .find(|(a, b, _)| *a == from && *b == to)
        .map(|(_, _, delta)| *delta)
        .unwrap_or(0)
}
