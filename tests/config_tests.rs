use flatshare_chaos::config::{ConfigError, GenerationConfig, MemoryConfig, MoodConfig, SessionConfig};
use std::io::Write;

#[test]
fn test_section_defaults() {
    let memory = MemoryConfig::default();
    assert_eq!(memory.max_memory_size, 50);
    assert_eq!(memory.relevant_context_limit, 5);
    assert_eq!(memory.purge_after_days, 30);

    let mood = MoodConfig::default();
    assert_eq!(mood.decay_rate, 0.1);

    let generation = GenerationConfig::default();
    assert_eq!(generation.roast_max_tokens, 50);
    assert_eq!(generation.roast_temperature, 0.9);
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[mood]
decay_rate = 0.25

[turn]
min_speakers_per_turn = 1
max_speakers_per_turn = 2
roast_probability = 0.9

[safety]
max_length = 120
"#
    )
    .unwrap();

    let config = SessionConfig::from_file(file.path()).unwrap();
    assert_eq!(config.mood.decay_rate, 0.25);
    assert_eq!(config.turn.max_speakers_per_turn, 2);
    assert_eq!(config.turn.roast_probability, 0.9);
    assert_eq!(config.safety.max_length, 120);
    assert_eq!(config.memory.max_memory_size, 50);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SessionConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_validation_rules() {
    let cases = [
        "[turn]\nmax_speakers_per_turn = 0\nmin_speakers_per_turn = 0\n",
        "[turn]\nmin_speakers_per_turn = 5\n",
        "[mood]\ndecay_rate = -1.0\n",
        "[turn]\nroast_probability = -0.1\n",
    ];
    for case in cases {
        let result = SessionConfig::from_toml_str(case);
        assert!(matches!(result, Err(ConfigError::Invalid(_))), "accepted: {case}");
    }
}

#[test]
fn test_round_trip_through_toml() {
    let mut config = SessionConfig::default();
    config.memory.max_memory_size = 30;
    config.generation.temperature = 0.5;

    let text = toml::to_string(&config).unwrap();
    let parsed = SessionConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed.memory.max_memory_size, 30);
    assert_eq!(parsed.generation.temperature, 0.5);
}
