use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::TurnConfig;
use crate::modules::analysis::AnalysisResult;
use crate::modules::persona::profile::{NEGATIVE_MOOD_RESPONDERS, QUESTION_RESPONDERS, URGENT_RESPONDERS};
use crate::modules::persona::{topic_preferences, Persona, PersonaKind};

/// Picks this turn's speakers as indices into `personas`, in speaking order.
///
/// Priority: personas named in the message, then personas whose trigger
/// phrases appear, then one persona chosen by topic or mood heuristics, then a
/// random persona. Remaining slots are filled by random sampling.
pub fn select_speakers<R: Rng + ?Sized>(
    personas: &[Persona],
    message: &str,
    analysis: &AnalysisResult,
    turn: &TurnConfig,
    rng: &mut R,
) -> Vec<usize> {
    if personas.is_empty() {
        return Vec::new();
    }

    let lower = message.to_lowercase();
    let max = turn.max_speakers_per_turn.clamp(1, personas.len());
    let min = turn.min_speakers_per_turn.min(max);

    let mut selected = named_speakers(personas, &lower);
    if selected.is_empty() {
        selected = triggered_speakers(personas, &lower);
    }
    if selected.is_empty() {
        let candidates = heuristic_candidates(personas, analysis);
        if let Some(index) = candidates.choose(rng) {
            selected.push(*index);
        }
    }
    if selected.is_empty() {
        selected.push(rng.gen_range(0..personas.len()));
    }
    selected.truncate(max);

    let target = rng.gen_range(min..=max).max(selected.len());
    let mut remaining: Vec<usize> = (0..personas.len()).filter(|index| !selected.contains(index)).collect();
    remaining.shuffle(rng);
    selected.extend(remaining.into_iter().take(target - selected.len()));

    selected
}

pub fn named_speakers(personas: &[Persona], lower_message: &str) -> Vec<usize> {
    personas
        .iter()
        .enumerate()
        .filter(|(_, persona)| lower_message.contains(&persona.name().to_lowercase()))
        .map(|(index, _)| index)
        .collect()
}

pub fn triggered_speakers(personas: &[Persona], lower_message: &str) -> Vec<usize> {
    personas
        .iter()
        .enumerate()
        .filter(|(_, persona)| {
            persona
                .profile()
                .triggers
                .iter()
                .any(|(key, _)| lower_message.contains(&key.replace('_', " ")))
        })
        .map(|(index, _)| index)
        .collect()
}

fn heuristic_candidates(personas: &[Persona], analysis: &AnalysisResult) -> Vec<usize> {
    let mut kinds: Vec<PersonaKind> = Vec::new();
    for topic in &analysis.topics {
        for kind in topic_preferences(topic) {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
    }

    let mut candidates = indices_of(personas, &kinds);
    if candidates.is_empty() {
        let fallback: &[PersonaKind] = if analysis.sentiment < -0.5 {
            NEGATIVE_MOOD_RESPONDERS
        } else if analysis.question_count > 0 {
            QUESTION_RESPONDERS
        } else if analysis.urgency > 0.5 {
            URGENT_RESPONDERS
        } else {
            &[]
        };
        candidates = indices_of(personas, fallback);
    }
    candidates
}

fn indices_of(personas: &[Persona], kinds: &[PersonaKind]) -> Vec<usize> {
    kinds
        .iter()
        .filter_map(|kind| personas.iter().position(|persona| persona.kind == *kind))
        .collect()
}
