use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::prompts::{self, PromptContext, RoastTarget};
use super::selection::select_speakers;
use super::{Orchestrator, PendingUserRoast, TurnEvent, USER_LABEL};
use crate::generation::{GenerationError, GenerationRequest};
use crate::modules::analysis::AnalysisResult;
use crate::modules::memory::ConversationEntry;
use crate::modules::mood::{MoodEvent, TargetSelection};
use crate::modules::persona::PersonaKind;
use crate::modules::relationship::InteractionKind;

const ROAST_SENTIMENT: f64 = -0.3;
const JOKE_SENTIMENT_THRESHOLD: f64 = 0.3;
const DEFENDED_INTENSITY: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LinePlan {
    Respond,
    Roast { target: RoastTarget, intensity: i32 },
    Defend { target: PersonaKind, attacker: PersonaKind },
}

impl LinePlan {
    fn is_roast(&self) -> bool {
        matches!(self, LinePlan::Roast { .. })
    }
}

impl Orchestrator {
    pub(super) async fn run_turn(
        &mut self,
        message: &str,
        cancel: Option<&CancellationToken>,
        events: Option<&mpsc::Sender<TurnEvent>>,
    ) -> Vec<String> {
        let now = Utc::now();
        self.mood.auto_decay_tick_at(&mut self.personas, now);
        self.purge_stale(now);

        let analysis = self.analyzer.analyze(message);
        self.score_pending_roasts(message, now);

        let user_line = format!("{}: {}", USER_LABEL, message);
        self.push_history(user_line.clone());
        let mut transcript = vec![user_line];
        emit(events, TurnEvent::Speaker(USER_LABEL.to_string())).await;
        emit(events, TurnEvent::Fragment(message.to_string())).await;
        emit(events, TurnEvent::EndOfLine).await;

        let user_entry = ConversationEntry::user(message, analysis.topics.clone(), analysis.sentiment).at(now);
        self.session_log.push(user_entry.clone());

        let speakers = select_speakers(&self.personas, message, &analysis, &self.config.turn, &mut self.rng);
        info!(
            speakers = ?speakers.iter().map(|index| self.personas[*index].name()).collect::<Vec<_>>(),
            "selected speakers"
        );

        let mut roasted: Vec<(PersonaKind, PersonaKind)> = Vec::new();
        let mut spoke: Vec<usize> = Vec::new();

        for index in speakers {
            if matches!(cancel, Some(token) if token.is_cancelled()) {
                info!("turn cancelled before {}", self.personas[index].name());
                break;
            }

            // A selected speaker has heard the message even if its own line never lands.
            self.memory.append(&mut self.personas[index], user_entry.clone());
            self.memory.analyze_user_patterns(&mut self.personas[index]);

            let plan = self.plan_line(index, &roasted);
            let request = self.build_request(index, plan, message, &analysis, now);
            let name = self.personas[index].name();
            let live = events.is_some() && !plan.is_roast();

            let mut announced = false;
            let result = match cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(GenerationError::Cancelled),
                    result = self.realize(&request, name, live, events, &mut announced) => result,
                },
                None => self.realize(&request, name, live, events, &mut announced).await,
            };

            let raw = match result {
                Ok(raw) => raw,
                Err(GenerationError::Cancelled) => {
                    info!(persona = name, "line abandoned by cancellation");
                    if announced {
                        emit(events, TurnEvent::Abandoned).await;
                    }
                    break;
                }
                Err(e) => {
                    warn!(persona = name, error = %e, "generation failed, skipping line");
                    if announced {
                        emit(events, TurnEvent::Abandoned).await;
                    }
                    continue;
                }
            };

            let text = if plan.is_roast() {
                self.sanitizer.sanitize(&raw)
            } else {
                raw.trim().to_string()
            };
            if text.is_empty() {
                debug!(persona = name, "empty generation, no line recorded");
                if announced {
                    emit(events, TurnEvent::Abandoned).await;
                }
                continue;
            }

            if plan.is_roast() {
                emit(events, TurnEvent::Speaker(name.to_string())).await;
                emit(events, TurnEvent::Fragment(text.clone())).await;
            }
            emit(events, TurnEvent::EndOfLine).await;

            let line = format!("{}: {}", name, text);
            self.push_history(line.clone());
            transcript.push(line);
            self.record_line(index, plan, &text, &analysis, now);

            if let LinePlan::Roast { target: RoastTarget::Persona(target), .. } = plan {
                roasted.push((self.personas[index].kind, target));
            }
            spoke.push(index);
        }

        self.record_jokes(&spoke, analysis.sentiment);
        transcript
    }

    fn purge_stale(&mut self, now: DateTime<Utc>) {
        let days = self.config.memory.purge_after_days;
        let purged: usize = self
            .personas
            .iter_mut()
            .map(|persona| self.memory.purge_older_than(persona, days, now))
            .sum();
        if purged > 0 {
            debug!(purged, days, "purged stale memories");
        }
    }

    /// Scores last turn's roasts at the user against the reply that followed.
    fn score_pending_roasts(&mut self, response: &str, now: DateTime<Utc>) {
        for roast in std::mem::take(&mut self.pending_user_roasts) {
            let seconds = (now - roast.at).num_milliseconds().max(0) as f64 / 1000.0;
            let score = self.analyzer.score_effectiveness(&roast.text, response, seconds);

            if let Some(persona) = self.personas.get_mut(roast.persona) {
                self.memory.record_effectiveness(persona, &roast.entry_id, score);
            }
            if let Some(entry) = self.session_log.iter_mut().find(|entry| entry.id == roast.entry_id) {
                entry.effectiveness_score = Some(score.clamp(0.0, 1.0));
            }
            debug!(entry = %roast.entry_id, score, "scored roast at user");
        }
    }

    pub(super) fn plan_line(&mut self, index: usize, roasted: &[(PersonaKind, PersonaKind)]) -> LinePlan {
        let speaker = &self.personas[index];

        for (attacker, target) in roasted.iter().rev() {
            if *target != speaker.kind
                && *attacker != speaker.kind
                && self.relationships.should_defend(speaker.name(), target.name())
            {
                return LinePlan::Defend {
                    target: *target,
                    attacker: *attacker,
                };
            }
        }

        let influence = self.mood.roast_influence(speaker);
        let likelihood = self.mood.modifiers(speaker).roast_likelihood;
        let chance = (self.config.turn.roast_probability * likelihood).clamp(0.0, 1.0);
        let initiate = self.mood.should_initiate_roast(speaker, &mut self.rng);
        if !initiate && self.rng.gen::<f64>() >= chance {
            return LinePlan::Respond;
        }

        let target = self.pick_target(index, influence.target_selection);
        let modifier = match target {
            RoastTarget::Persona(kind) => self
                .relationships
                .roast_intensity_modifier(self.personas[index].name(), kind.name()),
            RoastTarget::User => 1.0,
        };
        let intensity = ((self.personas[index].spice as f64) * 2.0 * modifier).round() as i32;

        LinePlan::Roast {
            target,
            intensity: intensity.clamp(1, 10),
        }
    }

    fn pick_target(&mut self, index: usize, selection: TargetSelection) -> RoastTarget {
        let speaker = self.personas[index].kind;
        let others: Vec<PersonaKind> = self
            .personas
            .iter()
            .map(|persona| persona.kind)
            .filter(|kind| *kind != speaker)
            .collect();

        match selection {
            TargetSelection::Enemies => others
                .iter()
                .min_by_key(|kind| self.relationships.score(speaker.name(), kind.name()))
                .map_or(RoastTarget::User, |kind| RoastTarget::Persona(*kind)),
            TargetSelection::Random => {
                if others.is_empty() || self.rng.gen_bool(0.5) {
                    RoastTarget::User
                } else {
                    others
                        .choose(&mut self.rng)
                        .map_or(RoastTarget::User, |kind| RoastTarget::Persona(*kind))
                }
            }
        }
    }

    fn build_request(
        &self,
        index: usize,
        plan: LinePlan,
        message: &str,
        analysis: &AnalysisResult,
        now: DateTime<Utc>,
    ) -> GenerationRequest {
        let persona = &self.personas[index];
        let topic = analysis.primary_topic().unwrap_or("");
        let relevant = self
            .memory
            .relevant_context(persona, topic, self.config.memory.relevant_context_limit, now);
        let history = self.history();

        let context = PromptContext {
            user_message: message,
            analysis,
            history: &history,
            relevant: &relevant,
            modifiers: self.mood.modifiers(persona),
            mood_label: self.mood.describe(persona),
        };
        let generation = &self.config.generation;

        match plan {
            LinePlan::Respond => prompts::response_request(persona, &context, generation),
            LinePlan::Roast { target, intensity } => {
                prompts::roast_request(persona, target, intensity, &context, generation)
            }
            LinePlan::Defend { target, attacker } => {
                prompts::defense_request(persona, target, attacker, &context, generation)
            }
        }
    }

    /// Produces the full text of one line. When streaming, live lines announce
    /// their speaker on the first fragment and forward fragments as they arrive.
    /// Forwarded text matches the trimmed line: leading whitespace is dropped and
    /// trailing whitespace is held back until more text follows it.
    async fn realize(
        &self,
        request: &GenerationRequest,
        name: &str,
        live: bool,
        events: Option<&mpsc::Sender<TurnEvent>>,
        announced: &mut bool,
    ) -> Result<String, GenerationError> {
        if events.is_none() {
            return self.generator.generate(request).await;
        }

        let mut fragments = self.generator.generate_stream(request).await?;
        let mut text = String::new();
        let mut held = String::new();
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            text.push_str(&fragment);
            if !live {
                continue;
            }

            let mut pending = std::mem::take(&mut held);
            pending.push_str(if *announced { fragment.as_str() } else { fragment.trim_start() });
            let end = pending.trim_end().len();
            if end == 0 {
                if *announced {
                    held = pending;
                }
                continue;
            }

            held = pending[end..].to_string();
            pending.truncate(end);
            if !*announced {
                emit(events, TurnEvent::Speaker(name.to_string())).await;
                *announced = true;
            }
            emit(events, TurnEvent::Fragment(pending)).await;
        }
        Ok(text)
    }

    pub(super) fn record_line(
        &mut self,
        index: usize,
        plan: LinePlan,
        text: &str,
        analysis: &AnalysisResult,
        now: DateTime<Utc>,
    ) {
        let kind = self.personas[index].kind;
        let name = kind.name();
        let sentiment = if plan.is_roast() { ROAST_SENTIMENT } else { analysis.sentiment };

        let entry = ConversationEntry::new(name, text, analysis.topics.clone(), sentiment).at(now);
        let entry_id = entry.id.clone();
        self.session_log.push(entry.clone());
        self.memory.append(&mut self.personas[index], entry);

        match plan {
            LinePlan::Respond => {}
            LinePlan::Roast { target, intensity } => {
                self.personas[index].roast_count += 1;
                self.mood
                    .apply_event(&mut self.personas[index], MoodEvent::RoastSuccessful, intensity);

                match target {
                    RoastTarget::Persona(target) => {
                        if let Some(target_index) = self.index_of(target) {
                            self.mood
                                .apply_event(&mut self.personas[target_index], MoodEvent::RoastReceived, intensity);
                        }
                        self.relationships
                            .record_interaction(name, target.name(), InteractionKind::Roast, true);
                    }
                    RoastTarget::User => self.pending_user_roasts.push(PendingUserRoast {
                        persona: index,
                        entry_id,
                        text: text.to_string(),
                        at: now,
                    }),
                }
            }
            LinePlan::Defend { target, attacker } => {
                if let Some(target_index) = self.index_of(target) {
                    self.mood
                        .apply_event(&mut self.personas[target_index], MoodEvent::Defended, DEFENDED_INTENSITY);
                }
                self.relationships
                    .record_interaction(name, target.name(), InteractionKind::Defend, true);
                self.relationships
                    .record_interaction(name, attacker.name(), InteractionKind::Conflict, false);
            }
        }
    }

    /// The lead speaker's joke landed with everyone else if the user was upbeat
    /// and fell flat if the user was down.
    fn record_jokes(&mut self, spoke: &[usize], user_sentiment: f64) {
        let success = if user_sentiment > JOKE_SENTIMENT_THRESHOLD {
            true
        } else if user_sentiment < -JOKE_SENTIMENT_THRESHOLD {
            false
        } else {
            return;
        };

        let Some((lead, rest)) = spoke.split_first() else {
            return;
        };
        let lead = self.personas[*lead].name();
        for other in rest {
            let other = self.personas[*other].name();
            self.relationships
                .record_interaction(lead, other, InteractionKind::Joke, success);
        }
    }

    fn index_of(&self, kind: PersonaKind) -> Option<usize> {
        self.personas.iter().position(|persona| persona.kind == kind)
    }
}

async fn emit(events: Option<&mpsc::Sender<TurnEvent>>, event: TurnEvent) {
    if let Some(sender) = events {
        if sender.send(event).await.is_err() {
            debug!("turn event receiver dropped");
        }
    }
}
