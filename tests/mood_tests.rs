use chrono::{Duration, TimeZone, Utc};
use flatshare_chaos::config::MoodConfig;
use flatshare_chaos::modules::mood::{MoodModifiers, ResponseStyle, TargetSelection, MAX_MOOD, MIN_MOOD};
use flatshare_chaos::{MoodEvent, MoodModel, Persona, PersonaKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[test]
fn test_moods_stay_in_range_under_any_events() {
    let model = MoodModel::default();
    let mut rng = StdRng::seed_from_u64(3);
    let mut cast = Persona::cast();

    for _ in 0..2000 {
        let persona = cast.choose_mut(&mut rng).unwrap();
        let event = *MoodEvent::ALL.choose(&mut rng).unwrap();
        let intensity = rng.gen_range(-5..20);
        let mood = model.apply_event(persona, event, intensity);
        assert!((MIN_MOOD..=MAX_MOOD).contains(&mood));
    }
}

#[test]
fn test_decay_approaches_baseline_without_crossing() {
    let model = MoodModel::new(&MoodConfig::new(0.7));
    let mut personas = vec![
        Persona::new(PersonaKind::BeatDrop).with_mood(100),
        Persona::new(PersonaKind::BeatDrop).with_mood(1),
        Persona::new(PersonaKind::BeatDrop),
    ];
    let baseline = personas[0].baseline_mood;

    let mut previous: Vec<i32> = personas.iter().map(|persona| persona.mood).collect();
    for minutes in [0.5, 3.0, 10.0, 45.0, 500.0] {
        model.decay(&mut personas, minutes);
        for (persona, before) in personas.iter().zip(&previous) {
            let was_above = *before >= baseline;
            if was_above {
                assert!(persona.mood >= baseline && persona.mood <= *before);
            } else {
                assert!(persona.mood <= baseline && persona.mood >= *before);
            }
        }
        previous = personas.iter().map(|persona| persona.mood).collect();
    }
    assert!(personas.iter().all(|persona| persona.mood == baseline));
}

#[test]
fn test_auto_decay_waits_a_minute() {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut model = MoodModel::starting_at(&MoodConfig::new(1.0), start);
    let mut personas = vec![Persona::new(PersonaKind::ChefCritic).with_mood(90)];

    assert!(!model.auto_decay_tick_at(&mut personas, start + Duration::seconds(30)));
    assert_eq!(personas[0].mood, 90);

    assert!(model.auto_decay_tick_at(&mut personas, start + Duration::minutes(5)));
    assert_eq!(personas[0].mood, 85);
    assert_eq!(model.last_decay(), start + Duration::minutes(5));
}

#[test]
fn test_low_mood_modifiers() {
    let modifiers = MoodModifiers::for_mood(25);
    assert_eq!(modifiers.aggression, 1.5);
    assert_eq!(modifiers.roast_likelihood, 1.4);
    assert_eq!(modifiers.humor, 0.7);
    assert_eq!(MoodModifiers::for_mood(55), MoodModifiers::default());
}

#[test]
fn test_influence_and_initiation() {
    let model = MoodModel::default();
    let grumpy = Persona::new(PersonaKind::SavageBurn).with_mood(10);
    let influence = model.roast_influence(&grumpy);
    assert!(influence.should_roast_more);
    assert_eq!(influence.target_selection, TargetSelection::Enemies);
    assert_eq!(influence.response_style, ResponseStyle::Aggressive);
    assert!(model.initiate_chance(&grumpy) > 0.0);

    let elated = Persona::new(PersonaKind::SavageBurn).with_mood(95);
    assert_eq!(model.roast_influence(&elated).response_style, ResponseStyle::Playful);
    assert_eq!(model.initiate_chance(&elated), 0.0);

    let mut rng = StdRng::seed_from_u64(5);
    assert!((0..100).all(|_| !model.should_initiate_roast(&elated, &mut rng)));
}

#[test]
fn test_named_events_and_simulation() {
    let model = MoodModel::default();
    let mut persona = Persona::new(PersonaKind::UncleJi).with_mood(50);

    assert_eq!(model.apply_named_event(&mut persona, "praised", 4), 54);
    assert_eq!(model.apply_named_event(&mut persona, "unheard_of", 4), 54);

    let outcome = model.simulate_event(&mut persona, "lost the remote", -20);
    assert_eq!(outcome.old_mood, 54);
    assert_eq!(outcome.new_mood, 34);
    assert_eq!(outcome.mood_change, -20);
    assert!(outcome.behavioral_change);
    assert_eq!(outcome.new_description, "irritated");
}
