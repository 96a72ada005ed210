//! SceneRunner - the per-session scene state machine
//!
//! The runner holds exactly one current scene. The player acts through
//! [`SceneRunner::perform`], which takes the [`Ticket`] of the render the
//! control came from, checks that the action is offered and enabled on the
//! current scene, applies stat changes through the caller's `StatEngine`
//! and moves to the next scene.
//!
//! # Invariants
//!
//! - the current scene id always resolves in the chapter
//! - a refused action (stale, unavailable, disabled) mutates nothing
//! - a transition whose target is absent or unknown halts *before* any stat
//!   change, so authoring mistakes never cost the player anything
//! - quizzes make exactly one pass over their questions

mod action;
mod log;
mod view;

use std::sync::Arc;

pub use action::{
    quiz_rating, Action, Feedback, HaltReason, SceneVisit, StepOutcome, Ticket, Transition,
    TransitionError,
};
pub use log::{LogEntry, TransitionLog};
pub use view::{
    Control, EduNote, NpcView, QuizPrompt, SceneView, SummaryStats, SummaryView,
};

use crate::aggregates::{Chapter, StatEngine};
use crate::entities::{Glossary, Player, Scene, SceneKind};
use crate::error::DomainError;
use crate::ids::{JobId, SceneId};
use crate::text::render_placeholders;
use crate::value_objects::StatDelta;

/// Reward for a correct chapter-quiz answer.
pub const QUIZ_CORRECT_REWARD: StatDelta = StatDelta {
    health: Some(5),
    money: Some(2),
    item: None,
};

/// Penalty for a wrong chapter-quiz answer.
pub const QUIZ_WRONG_PENALTY: StatDelta = StatDelta {
    health: Some(-5),
    money: None,
    item: None,
};

/// Saved position to resume from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePoint {
    pub current_scene_id: SceneId,
    pub history: Vec<SceneId>,
    pub jobs_done: Vec<JobId>,
    pub player: Player,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SummaryQuiz {
    answered: usize,
    score: usize,
}

#[derive(Debug, Clone)]
pub struct SceneRunner {
    chapter: Arc<Chapter>,
    player: Player,
    current: SceneId,
    generation: u64,
    log: TransitionLog,
    retry_marker: Option<SceneId>,
    quiz_index: usize,
    summary_quiz: SummaryQuiz,
    /// Completed jobs in completion order, no duplicates.
    jobs_done: Vec<JobId>,
}

impl SceneRunner {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Start at the chapter's entry scene.
    pub fn new(chapter: Arc<Chapter>, player: Player) -> Self {
        let entry = chapter.scenes.entry_scene().id.clone();
        let mut log = TransitionLog::new();
        log.record_entry(entry.clone());
        Self {
            chapter,
            player,
            current: entry,
            generation: 1,
            log,
            retry_marker: None,
            quiz_index: 0,
            summary_quiz: SummaryQuiz::default(),
            jobs_done: Vec::new(),
        }
    }

    /// Continue from a saved position. Fails if the saved scene no longer
    /// exists in the chapter.
    pub fn resume(chapter: Arc<Chapter>, point: ResumePoint) -> Result<Self, DomainError> {
        chapter.scenes.resolve(&point.current_scene_id)?;

        let mut log = TransitionLog::from_history(point.history.iter().cloned());
        if point.history.last() != Some(&point.current_scene_id) {
            log.record_entry(point.current_scene_id.clone());
        }

        // The marker is the most recent choice scene before the current one.
        let history = log.history();
        let retry_marker = history
            .iter()
            .rev()
            .skip(1)
            .find(|id| chapter.scenes.get(id).is_some_and(Scene::is_choice))
            .cloned();

        let mut jobs_done: Vec<JobId> = Vec::with_capacity(point.jobs_done.len());
        for job in point.jobs_done {
            if !jobs_done.contains(&job) {
                jobs_done.push(job);
            }
        }

        Ok(Self {
            chapter,
            player: point.player,
            current: point.current_scene_id,
            generation: 1,
            log,
            retry_marker,
            quiz_index: 0,
            summary_quiz: SummaryQuiz::default(),
            jobs_done,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn chapter(&self) -> &Arc<Chapter> {
        &self.chapter
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn current_scene_id(&self) -> &SceneId {
        &self.current
    }

    pub fn current_scene(&self) -> &Scene {
        scene_in(&self.chapter, &self.current)
    }

    pub fn ticket(&self) -> Ticket {
        Ticket::new(self.current.clone(), self.generation)
    }

    pub fn visit(&self) -> SceneVisit {
        SceneVisit::new(self.current.clone(), self.log.entry_count())
    }

    pub fn history(&self) -> Vec<SceneId> {
        self.log.history()
    }

    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    pub fn retry_marker(&self) -> Option<&SceneId> {
        self.retry_marker.as_ref()
    }

    pub fn jobs_done(&self) -> &[JobId] {
        &self.jobs_done
    }

    pub fn is_job_done(&self, job_id: &JobId) -> bool {
        self.jobs_done.contains(job_id)
    }

    pub fn quiz_index(&self) -> usize {
        self.quiz_index
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Perform `action` using a control rendered under `ticket`.
    pub fn perform(
        &mut self,
        ticket: &Ticket,
        action: Action,
        stats: &mut StatEngine,
    ) -> Result<StepOutcome, TransitionError> {
        if *ticket != self.ticket() {
            return Err(TransitionError::Stale {
                scene_id: ticket.scene_id().clone(),
            });
        }

        // Re-working a finished job is a quiet no-op, not an error.
        if let Action::Work(job_id) = &action {
            if self.is_job_done(job_id) {
                let title = self
                    .find_job(job_id)
                    .map(|j| j.title.clone())
                    .unwrap_or_else(|| job_id.to_string());
                return Ok(StepOutcome::new(Transition::Unchanged)
                    .with(Feedback::JobAlreadyDone { title }));
            }
        }

        let controls = self.controls(stats);
        let control = controls.iter().find(|c| c.action == action).ok_or_else(|| {
            TransitionError::NotAvailable {
                scene_id: self.current.clone(),
                action: action.clone(),
            }
        })?;
        if !control.enabled {
            return Err(TransitionError::Disabled {
                reason: control
                    .reason
                    .clone()
                    .unwrap_or_else(|| format!("{} is not available", control.label)),
            });
        }

        self.execute(action, stats)
    }

    fn execute(
        &mut self,
        action: Action,
        stats: &mut StatEngine,
    ) -> Result<StepOutcome, TransitionError> {
        let chapter = Arc::clone(&self.chapter);
        let scene = scene_in(&chapter, &self.current);

        let outcome = match (&scene.kind, action) {
            (SceneKind::CharacterSelect(select), Action::SelectCharacter(i)) => {
                let target = select
                    .next
                    .as_ref()
                    .or_else(|| chapter.scenes.second_scene().map(|s| &s.id));
                let to = match self.check_target(target) {
                    Ok(to) => to,
                    Err(reason) => return Ok(StepOutcome::halted(reason)),
                };
                let Some(character) = chapter.characters.get(i) else {
                    return Ok(StepOutcome::halted(HaltReason::DeadEnd));
                };
                if let Some(bonus) = &character.starting_bonus {
                    stats.apply_delta(bonus);
                }
                self.player.character = Some(character.clone());
                StepOutcome::new(self.enter(to)).with(Feedback::CharacterChosen {
                    name: character.name.clone(),
                })
            }
            (SceneKind::CharacterSelect(select), Action::Continue) => {
                let target = select
                    .next
                    .as_ref()
                    .or_else(|| chapter.scenes.second_scene().map(|s| &s.id));
                self.go(target)
            }
            (SceneKind::Narrative(narrative), Action::Continue) => self.go(narrative.next.as_ref()),
            (SceneKind::Choice(choice_scene), Action::Choose(i)) => {
                let Some(choice) = choice_scene.choices.get(i) else {
                    return Ok(StepOutcome::halted(HaltReason::DeadEnd));
                };
                let to = match self.check_target(choice.target()) {
                    Ok(to) => to,
                    Err(reason) => return Ok(StepOutcome::halted(reason)),
                };
                self.retry_marker = Some(scene.id.clone());
                if let Some(change) = &choice.stat_change {
                    stats.apply_delta(change);
                }
                if choice.cost > 0 {
                    stats.apply_delta(&StatDelta::spend(choice.cost));
                }
                StepOutcome::new(self.enter(to))
            }
            (SceneKind::Setback(_), Action::Retry) => {
                let Some(marker) = self.retry_marker.clone() else {
                    return Ok(StepOutcome::halted(HaltReason::DeadEnd));
                };
                let to = match self.check_target(Some(&marker)) {
                    Ok(to) => to,
                    Err(reason) => return Ok(StepOutcome::halted(reason)),
                };
                self.log.rewind_to(marker);
                StepOutcome::new(self.enter(to))
            }
            (SceneKind::Setback(setback), Action::Continue) => self.go(setback.next.as_ref()),
            (SceneKind::Rest(rest), Action::Rest(i)) => {
                let options = rest.options();
                let Some(option) = options.get(i) else {
                    return Ok(StepOutcome::halted(HaltReason::DeadEnd));
                };
                let to = match self.check_target(rest.next.as_ref()) {
                    Ok(to) => to,
                    Err(reason) => return Ok(StepOutcome::halted(reason)),
                };
                if option.cost > 0 {
                    stats.apply_delta(&StatDelta::spend(option.cost));
                }
                stats.apply_delta(&StatDelta::health(saturating_i32(option.health)));
                StepOutcome::new(self.enter(to)).with(Feedback::Rested {
                    label: option.display_label().to_string(),
                })
            }
            (SceneKind::Minigame(minigame), Action::Work(job_id)) => {
                let Some(job) = chapter
                    .jobs_for(&minigame.jobs)
                    .iter()
                    .find(|j| j.id == job_id)
                else {
                    return Ok(StepOutcome::halted(HaltReason::DeadEnd));
                };
                self.jobs_done.push(job.id.clone());
                stats.apply_delta(&StatDelta::money(saturating_i32(job.pay)));
                if let Some(cost) = job.health_cost.filter(|c| *c > 0) {
                    stats.apply_delta(&StatDelta::health(-saturating_i32(cost)));
                }
                StepOutcome::new(self.rerender()).with(Feedback::JobCompleted {
                    title: job.title.clone(),
                    pay: job.pay,
                })
            }
            (SceneKind::Minigame(minigame), Action::Continue) => self.go(minigame.next.as_ref()),
            (SceneKind::Travel(travel), Action::Travel(i)) => {
                let Some(route) = travel.routes.get(i) else {
                    return Ok(StepOutcome::halted(HaltReason::DeadEnd));
                };
                let to = match self.check_target(route.target()) {
                    Ok(to) => to,
                    Err(reason) => return Ok(StepOutcome::halted(reason)),
                };
                if route.cost > 0 {
                    stats.apply_delta(&StatDelta::spend(route.cost));
                }
                if route.health_cost > 0 {
                    stats.apply_delta(&StatDelta::health(-saturating_i32(route.health_cost)));
                }
                if let Some(change) = &route.stat_change {
                    stats.apply_delta(change);
                }
                StepOutcome::new(self.enter(to)).with(Feedback::Travelling {
                    destination: route.destination.clone(),
                })
            }
            (SceneKind::Quiz(quiz), Action::Answer(answer)) => {
                let Some(question) = quiz.questions.get(self.quiz_index) else {
                    return Ok(StepOutcome::halted(HaltReason::DeadEnd));
                };
                let correct = question.is_correct(answer);
                stats.apply_delta(if correct {
                    &QUIZ_CORRECT_REWARD
                } else {
                    &QUIZ_WRONG_PENALTY
                });
                let feedback = Feedback::Answered {
                    correct,
                    explanation: if correct {
                        None
                    } else {
                        question.explanation.clone()
                    },
                    correct_option: question.correct_option().map(str::to_string),
                };
                self.quiz_index += 1;

                if self.quiz_index < quiz.questions.len() {
                    StepOutcome::new(self.rerender()).with(feedback)
                } else {
                    match self.check_target(quiz.next.as_ref()) {
                        Ok(to) => StepOutcome::new(self.enter(to)).with(feedback),
                        Err(reason) => {
                            // One pass only: the finished quiz offers nothing more.
                            self.generation += 1;
                            StepOutcome::halted(reason).with(feedback)
                        }
                    }
                }
            }
            (SceneKind::Quiz(quiz), Action::Continue) => self.go(quiz.next.as_ref()),
            (SceneKind::Summary(summary), Action::Answer(answer)) => {
                let Some(question) = summary.quiz.get(self.summary_quiz.answered) else {
                    return Ok(StepOutcome::halted(HaltReason::DeadEnd));
                };
                let correct = question.is_correct(answer);
                if correct {
                    self.summary_quiz.score += 1;
                }
                self.summary_quiz.answered += 1;
                let mut outcome = StepOutcome::new(self.rerender()).with(Feedback::Answered {
                    correct,
                    explanation: None,
                    correct_option: question.correct_option().map(str::to_string),
                });
                if self.summary_quiz.answered == summary.quiz.len() {
                    let score = self.summary_quiz.score;
                    stats.apply_delta(
                        &StatDelta::money(saturating_i32_usize(score * 2))
                            .with_health(saturating_i32_usize(score)),
                    );
                    outcome = outcome.with(Feedback::SummaryQuizFinished {
                        score,
                        total: summary.quiz.len(),
                    });
                }
                outcome
            }
            (SceneKind::Summary(summary), Action::OpenQuiz) => self.go(summary.quiz_scene.as_ref()),
            (SceneKind::Summary(_), Action::Restart) => {
                stats.reset(chapter.starting_player_stats());
                self.jobs_done.clear();
                self.player.character = None;
                self.retry_marker = None;
                self.log.restart();
                let entry = chapter.scenes.entry_scene().id.clone();
                StepOutcome::new(self.enter(entry))
            }
            (_, action) => {
                return Err(TransitionError::NotAvailable {
                    scene_id: self.current.clone(),
                    action,
                })
            }
        };
        Ok(outcome)
    }

    /// Leave for `target` without touching stats.
    fn go(&mut self, target: Option<&SceneId>) -> StepOutcome {
        match self.check_target(target) {
            Ok(to) => StepOutcome::new(self.enter(to)),
            Err(reason) => StepOutcome::halted(reason),
        }
    }

    fn check_target(&self, target: Option<&SceneId>) -> Result<SceneId, HaltReason> {
        match target {
            None => Err(HaltReason::DeadEnd),
            Some(id) if !self.chapter.scenes.contains(id) => {
                Err(HaltReason::MissingScene(id.clone()))
            }
            Some(id) => Ok(id.clone()),
        }
    }

    fn enter(&mut self, to: SceneId) -> Transition {
        let from = std::mem::replace(&mut self.current, to.clone());
        self.log.record_entry(to.clone());
        self.generation += 1;
        self.quiz_index = 0;
        self.summary_quiz = SummaryQuiz::default();
        Transition::Entered { from, to }
    }

    fn rerender(&mut self) -> Transition {
        self.generation += 1;
        Transition::Rerendered
    }

    fn find_job(&self, job_id: &JobId) -> Option<&crate::entities::Job> {
        self.chapter
            .scenes
            .iter()
            .filter_map(|s| match &s.kind {
                SceneKind::Minigame(m) => Some(m.jobs.iter()),
                _ => None,
            })
            .flatten()
            .chain(self.chapter.jobs.iter())
            .find(|j| &j.id == job_id)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Controls offered on the current scene, enabled or not.
    pub fn controls(&self, stats: &StatEngine) -> Vec<Control> {
        let scene = self.current_scene();
        let currency = &stats.stats().currency;
        let need = |cost: u32| move || format!("Need {} {}", cost, currency);

        match &scene.kind {
            SceneKind::CharacterSelect(select) => {
                if self.player.character.is_none() && !self.chapter.characters.is_empty() {
                    self.chapter
                        .characters
                        .iter()
                        .enumerate()
                        .map(|(i, c)| {
                            let detail = match &c.bonus {
                                Some(bonus) => format!("{} ({})", c.description, bonus),
                                None => c.description.clone(),
                            };
                            Control::enabled(Action::SelectCharacter(i), &c.name)
                                .with_detail(detail)
                        })
                        .collect()
                } else if select.next.is_some() || self.chapter.scenes.second_scene().is_some() {
                    vec![Control::enabled(Action::Continue, "Continue")]
                } else {
                    Vec::new()
                }
            }
            SceneKind::Narrative(narrative) => narrative
                .next
                .as_ref()
                .map(|_| {
                    Control::enabled(
                        Action::Continue,
                        narrative.continue_text.as_deref().unwrap_or("Continue"),
                    )
                })
                .into_iter()
                .collect(),
            SceneKind::Choice(choice_scene) => choice_scene
                .choices
                .iter()
                .enumerate()
                .map(|(i, choice)| {
                    let mut detail = choice.hint.clone().unwrap_or_default();
                    if choice.cost > 0 {
                        if !detail.is_empty() {
                            detail.push_str(" | ");
                        }
                        detail.push_str(&format!("Costs {} {}", choice.cost, currency));
                    }
                    Control::enabled(Action::Choose(i), &choice.text)
                        .with_detail(detail)
                        .disabled_unless(stats.can_afford(choice.cost), need(choice.cost))
                })
                .collect(),
            SceneKind::Setback(setback) => {
                let action = if setback.retry && self.retry_marker.is_some() {
                    Some(Action::Retry)
                } else if setback.next.is_some() {
                    Some(Action::Continue)
                } else if self.retry_marker.is_some() {
                    Some(Action::Retry)
                } else {
                    None
                };
                action
                    .map(|action| {
                        let default_label = if action == Action::Retry {
                            "Try Again"
                        } else {
                            "Continue"
                        };
                        Control::enabled(
                            action,
                            setback.retry_text.as_deref().unwrap_or(default_label),
                        )
                    })
                    .into_iter()
                    .collect()
            }
            SceneKind::Rest(rest) => rest
                .options()
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    let price = if option.cost > 0 {
                        format!("{} {}", option.cost, currency)
                    } else {
                        "Free".to_string()
                    };
                    Control::enabled(Action::Rest(i), option.display_label())
                        .with_detail(format!(
                            "{} (+{} health, {})",
                            option.description, option.health, price
                        ))
                        .disabled_unless(stats.can_afford(option.cost), need(option.cost))
                })
                .collect(),
            SceneKind::Minigame(minigame) => {
                let mut controls: Vec<Control> = self
                    .chapter
                    .jobs_for(&minigame.jobs)
                    .iter()
                    .map(|job| {
                        Control::enabled(Action::Work(job.id.clone()), &job.title)
                            .with_detail(format!(
                                "+{} {} | {} | {}",
                                job.pay,
                                currency,
                                job.time,
                                job.difficulty.label()
                            ))
                            .disabled_unless(!self.is_job_done(&job.id), || {
                                "Completed".to_string()
                            })
                    })
                    .collect();
                if minigame.next.is_some() {
                    controls.push(Control::enabled(Action::Continue, "Continue Journey"));
                }
                controls
            }
            SceneKind::Travel(travel) => travel
                .routes
                .iter()
                .enumerate()
                .map(|(i, route)| {
                    let affordable = stats.can_afford(route.cost);
                    let transport = route.requires_transport.as_deref();
                    let has_transport = transport.map_or(true, |t| stats.has_item(t));
                    let mut parts = Vec::new();
                    if let Some(description) = &route.description {
                        parts.push(description.clone());
                    }
                    if route.cost > 0 {
                        parts.push(format!("{} {}", route.cost, currency));
                    }
                    if let Some(t) = transport {
                        parts.push(format!("requires {}", t));
                    }
                    if route.health_cost > 0 {
                        parts.push(format!("-{} health", route.health_cost));
                    }
                    if let Some(duration) = &route.duration {
                        parts.push(duration.clone());
                    }
                    parts.push(if route.is_long { "Long Journey" } else { "Short Trip" }.into());

                    Control::enabled(Action::Travel(i), &route.text)
                        .with_detail(parts.join(" | "))
                        .disabled_unless(affordable && has_transport, || {
                            if has_transport {
                                format!("Need {} {}", route.cost, currency)
                            } else {
                                format!("Need: {}", transport.unwrap_or_default())
                            }
                        })
                })
                .collect(),
            SceneKind::Quiz(quiz) => {
                if quiz.questions.is_empty() {
                    quiz.next
                        .as_ref()
                        .map(|_| Control::enabled(Action::Continue, "Continue"))
                        .into_iter()
                        .collect()
                } else {
                    quiz.questions
                        .get(self.quiz_index)
                        .map(|q| answer_controls(&q.options))
                        .unwrap_or_default()
                }
            }
            SceneKind::Summary(summary) => {
                let mut controls = summary
                    .quiz
                    .get(self.summary_quiz.answered)
                    .map(|q| answer_controls(&q.options))
                    .unwrap_or_default();
                if summary.quiz_scene.is_some() {
                    controls.push(Control::enabled(Action::OpenQuiz, "Full Quiz"));
                }
                controls.push(Control::enabled(Action::Restart, "Play Again"));
                controls
            }
        }
    }

    /// Build the render model for the current scene.
    pub fn view(&self, stats: &StatEngine, glossary: &Glossary) -> SceneView {
        let scene = self.current_scene();
        let player_stats = stats.stats();

        let npc = scene.npc.as_ref().map(|npc| NpcView {
            name: npc.name.clone(),
            avatar: npc.avatar.clone(),
            description: npc.description.clone(),
            line: scene
                .npc_dialogue
                .as_deref()
                .map(|line| render_placeholders(line, player_stats, &self.player)),
        });

        let edu = scene.educational_term.as_ref().and_then(|term| {
            scene
                .educational_note
                .clone()
                .or_else(|| glossary.definition(term).map(str::to_string))
                .map(|note| EduNote {
                    term: term.clone(),
                    note,
                })
        });

        let aside = match &scene.kind {
            SceneKind::CharacterSelect(select) => Some(
                select
                    .choice_prompt
                    .clone()
                    .unwrap_or_else(|| "Choose your character:".to_string()),
            ),
            SceneKind::Setback(setback) => setback.lesson.clone(),
            _ => None,
        };

        let quiz = match &scene.kind {
            SceneKind::Quiz(quiz) => quiz.questions.get(self.quiz_index).map(|q| QuizPrompt {
                number: self.quiz_index + 1,
                total: quiz.questions.len(),
                question: q.question.clone(),
            }),
            _ => None,
        };

        let summary = match &scene.kind {
            SceneKind::Summary(summary) => Some(self.summary_view(summary, stats)),
            _ => None,
        };

        SceneView {
            ticket: self.ticket(),
            visit: self.visit(),
            scene_id: scene.id.clone(),
            kind: scene.kind_name(),
            title: scene.title.clone(),
            era: self.chapter.era.clone(),
            text: render_placeholders(&scene.text, player_stats, &self.player),
            background: scene.background.clone(),
            npc,
            edu,
            aside,
            controls: self.controls(stats),
            quiz,
            summary,
        }
    }

    pub fn summary_stats(&self, stats: &StatEngine) -> SummaryStats {
        let s = stats.stats();
        SummaryStats {
            scenes_visited: self.history().len(),
            money_earned: i64::from(s.money) - i64::from(self.chapter.starting_stats.money),
            final_health: s.health,
            final_money: s.money,
            items_collected: s.inventory.len(),
        }
    }

    fn summary_view(&self, summary: &crate::entities::SummaryScene, stats: &StatEngine) -> SummaryView {
        let total = summary.quiz.len();
        let answered = self.summary_quiz.answered;
        SummaryView {
            stats: self.summary_stats(stats),
            message: summary.summary.clone().unwrap_or_else(|| {
                format!(
                    "You have completed {}! Your journey through {} showed the complexity of this historical period.",
                    self.chapter.title, self.chapter.era
                )
            }),
            guiding_question: self.chapter.guiding_question.clone(),
            guiding_answer: summary.guiding_question_answer.clone(),
            lessons: summary.lessons.clone(),
            key_terms: summary.key_terms.clone(),
            analysis_questions: summary.analysis_questions.clone(),
            historical_note: summary.historical_note.clone(),
            quiz: summary.quiz.get(answered).map(|q| QuizPrompt {
                number: answered + 1,
                total,
                question: q.question.clone(),
            }),
            quiz_result: (total > 0 && answered == total).then_some((self.summary_quiz.score, total)),
        }
    }
}

fn scene_in<'a>(chapter: &'a Chapter, id: &SceneId) -> &'a Scene {
    chapter
        .scenes
        .get(id)
        .unwrap_or_else(|| chapter.scenes.entry_scene())
}

fn answer_controls(options: &[String]) -> Vec<Control> {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| Control::enabled(Action::Answer(i), option))
        .collect()
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn saturating_i32_usize(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests;
