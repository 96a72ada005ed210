use std::sync::Arc;

use super::*;
use crate::entities::{Glossary, GlossaryEntry};
use crate::value_objects::PlayerStats;

fn chapter(json: &str) -> Arc<Chapter> {
    Arc::new(Chapter::from_json(json).expect("test chapter should parse"))
}

fn engine(health: u32, money: u32) -> StatEngine {
    StatEngine::new(PlayerStats {
        health,
        max_health: 100,
        money,
        currency: "coins".into(),
        inventory: Vec::new(),
    })
}

fn act(runner: &mut SceneRunner, action: Action, stats: &mut StatEngine) -> StepOutcome {
    let ticket = runner.ticket();
    runner
        .perform(&ticket, action, stats)
        .expect("action should be accepted")
}

const SHOP: &str = r#"{
    "id": 1, "title": "Market Day", "era": "Edo Japan",
    "startingStats": {"health": 100, "money": 3},
    "scenes": [
        {"id": "A", "type": "narrative", "text": "Morning.", "next": "B"},
        {"id": "B", "type": "choice", "choices": [
            {"text": "Buy the horse", "cost": 5, "outcome": "C"},
            {"text": "Walk", "next": "D"}
        ]},
        {"id": "C", "type": "summary"},
        {"id": "D", "type": "summary"}
    ]
}"#;

#[test]
fn narrative_continue_moves_to_next() {
    let mut runner = SceneRunner::new(chapter(SHOP), Player::default());
    let mut stats = engine(100, 3);
    let outcome = act(&mut runner, Action::Continue, &mut stats);
    assert_eq!(outcome.entered(), Some(&SceneId::new("B")));
    assert_eq!(runner.history(), vec![SceneId::new("A"), SceneId::new("B")]);
}

#[test]
fn second_activation_of_same_control_is_stale() {
    let mut runner = SceneRunner::new(chapter(SHOP), Player::default());
    let mut stats = engine(100, 3);
    let ticket = runner.ticket();
    runner
        .perform(&ticket, Action::Continue, &mut stats)
        .expect("first click");
    let err = runner
        .perform(&ticket, Action::Continue, &mut stats)
        .expect_err("second click");
    assert!(matches!(err, TransitionError::Stale { .. }));
    assert_eq!(runner.current_scene_id().as_str(), "B");
}

#[test]
fn unaffordable_choice_is_disabled_and_refused() {
    let mut runner = SceneRunner::new(chapter(SHOP), Player::default());
    let mut stats = engine(100, 3);
    act(&mut runner, Action::Continue, &mut stats);

    let view = runner.view(&stats, &Glossary::default());
    let buy = view.control(&Action::Choose(0)).expect("buy control");
    assert!(!buy.enabled);
    assert_eq!(buy.reason.as_deref(), Some("Need 5 coins"));

    let err = runner
        .perform(&runner.ticket(), Action::Choose(0), &mut stats)
        .expect_err("cannot afford");
    assert!(matches!(err, TransitionError::Disabled { .. }));
    assert_eq!(stats.stats().money, 3);

    let outcome = act(&mut runner, Action::Choose(1), &mut stats);
    assert_eq!(outcome.entered(), Some(&SceneId::new("D")));
    assert_eq!(stats.stats().money, 3);
}

#[test]
fn affordable_choice_charges_cost_and_sets_retry_marker() {
    let mut runner = SceneRunner::new(chapter(SHOP), Player::default());
    let mut stats = engine(100, 9);
    act(&mut runner, Action::Continue, &mut stats);
    act(&mut runner, Action::Choose(0), &mut stats);
    assert_eq!(runner.current_scene_id().as_str(), "C");
    assert_eq!(stats.stats().money, 4);
    assert_eq!(runner.retry_marker(), Some(&SceneId::new("B")));
}

#[test]
fn rest_offers_only_affordable_options() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Rest", "scenes": [
            {"id": "camp", "type": "rest", "next": "end",
             "restOptions": [{"label": "Camp", "cost": 0, "health": 10}, {"label": "Inn", "cost": 8, "health": 30}]},
            {"id": "end", "type": "summary"}
        ]}"#,
    );
    let mut runner = SceneRunner::new(chapter, Player::default());
    let mut stats = engine(50, 3);

    let view = runner.view(&stats, &Glossary::default());
    let enabled: Vec<_> = view.enabled_controls().map(|c| c.action.clone()).collect();
    assert_eq!(enabled, vec![Action::Rest(0)]);

    let outcome = act(&mut runner, Action::Rest(0), &mut stats);
    assert_eq!(stats.stats().health, 60);
    assert_eq!(stats.stats().money, 3);
    assert_eq!(outcome.entered(), Some(&SceneId::new("end")));
}

const SETBACK: &str = r#"{
    "id": 1, "title": "Crossroads",
    "scenes": [
        {"id": "intro", "type": "narrative", "next": "S"},
        {"id": "S", "type": "choice", "choices": [
            {"text": "Cross the river", "outcome": "drowned", "statChange": {"health": -30}},
            {"text": "Take the bridge", "next": "end"}
        ]},
        {"id": "drowned", "type": "setback", "retry": true, "lesson": "Rivers are dangerous."},
        {"id": "end", "type": "summary"}
    ]
}"#;

#[test]
fn setback_retry_returns_to_the_choice_scene() {
    let mut runner = SceneRunner::new(chapter(SETBACK), Player::default());
    let mut stats = engine(100, 0);
    act(&mut runner, Action::Continue, &mut stats);
    let choice_ticket = runner.ticket();
    act(&mut runner, Action::Choose(0), &mut stats);
    assert_eq!(runner.current_scene_id().as_str(), "drowned");
    assert_eq!(stats.stats().health, 70);

    let view = runner.view(&stats, &Glossary::default());
    assert_eq!(view.controls.len(), 1);
    assert_eq!(view.controls[0].action, Action::Retry);
    assert_eq!(view.controls[0].label, "Try Again");
    assert_eq!(view.aside.as_deref(), Some("Rivers are dangerous."));

    let outcome = act(&mut runner, Action::Retry, &mut stats);
    assert_eq!(outcome.entered(), Some(&SceneId::new("S")));
    assert_eq!(runner.history(), vec![SceneId::new("intro"), SceneId::new("S")]);

    // Fresh controls: the pre-failure ticket no longer works, the new one does.
    assert_ne!(runner.ticket(), choice_ticket);
    let view = runner.view(&stats, &Glossary::default());
    assert!(view.controls.iter().all(|c| c.enabled));
    act(&mut runner, Action::Choose(1), &mut stats);
    assert_eq!(runner.current_scene_id().as_str(), "end");
}

#[test]
fn setback_without_marker_or_next_is_a_dead_end() {
    let chapter = chapter(
        r#"{"id": 1, "title": "x", "scenes": [{"id": "fail", "type": "setback", "retry": true}]}"#,
    );
    let runner = SceneRunner::new(chapter, Player::default());
    let view = runner.view(&engine(100, 0), &Glossary::default());
    assert!(view.controls.is_empty());
}

const WORK: &str = r#"{
    "id": 1, "title": "Jobs",
    "scenes": [
        {"id": "work", "type": "minigame", "next": "end", "jobs": [
            {"id": "porter", "title": "Porter", "pay": 4, "difficulty": "hard", "healthCost": 5},
            {"id": "scribe", "title": "Scribe", "pay": 6}
        ]},
        {"id": "end", "type": "summary"}
    ]
}"#;

#[test]
fn completing_a_job_twice_pays_once() {
    let mut runner = SceneRunner::new(chapter(WORK), Player::default());
    let mut stats = engine(100, 0);

    let outcome = act(&mut runner, Action::Work(JobId::new("porter")), &mut stats);
    assert_eq!(outcome.transition, Transition::Rerendered);
    assert_eq!(stats.stats().money, 4);
    assert_eq!(stats.stats().health, 95);
    assert_eq!(runner.current_scene_id().as_str(), "work");

    let again = act(&mut runner, Action::Work(JobId::new("porter")), &mut stats);
    assert_eq!(again.transition, Transition::Unchanged);
    assert!(matches!(again.feedback[0], Feedback::JobAlreadyDone { .. }));
    assert_eq!(stats.stats().money, 4);
    assert_eq!(runner.jobs_done(), &[JobId::new("porter")]);

    act(&mut runner, Action::Continue, &mut stats);
    assert_eq!(runner.current_scene_id().as_str(), "end");
}

#[test]
fn minigame_without_jobs_uses_the_chapter_board() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Jobs",
            "jobs": [{"id": "fisher", "title": "Fisher", "pay": 3}],
            "scenes": [{"id": "work", "type": "minigame"}]}"#,
    );
    let mut runner = SceneRunner::new(chapter, Player::default());
    let mut stats = engine(100, 0);
    act(&mut runner, Action::Work(JobId::new("fisher")), &mut stats);
    assert_eq!(stats.stats().money, 3);
}

#[test]
fn travel_requires_transport_in_inventory() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Road", "scenes": [
            {"id": "road", "type": "travel", "routes": [
                {"text": "Ride", "cost": 2, "healthCost": 5, "requiresTransport": "Horse", "destination": "Kyoto", "next": "end"},
                {"text": "Walk", "healthCost": 20, "next": "end"}
            ]},
            {"id": "end", "type": "summary"}
        ]}"#,
    );
    let mut runner = SceneRunner::new(chapter, Player::default());
    let mut stats = engine(100, 10);

    let view = runner.view(&stats, &Glossary::default());
    let ride = view.control(&Action::Travel(0)).expect("ride");
    assert!(!ride.enabled);
    assert_eq!(ride.reason.as_deref(), Some("Need: Horse"));

    stats.apply_delta(&StatDelta::item("Horse"));
    let outcome = act(&mut runner, Action::Travel(0), &mut stats);
    assert_eq!(stats.stats().money, 8);
    assert_eq!(stats.stats().health, 95);
    assert_eq!(
        outcome.feedback,
        vec![Feedback::Travelling {
            destination: Some("Kyoto".into())
        }]
    );
}

const QUIZ: &str = r#"{
    "id": 1, "title": "Quiz",
    "scenes": [
        {"id": "quiz", "type": "quiz", "next": "end", "questions": [
            {"question": "Capital?", "options": ["Edo", "Osaka"], "correct": 0},
            {"question": "Ruler?", "options": ["Emperor", "Shogun"], "correct": 1, "explanation": "The shogun held power."}
        ]},
        {"id": "end", "type": "summary"}
    ]
}"#;

#[test]
fn quiz_makes_one_pass_then_exits() {
    let mut runner = SceneRunner::new(chapter(QUIZ), Player::default());
    let mut stats = engine(50, 0);

    let view = runner.view(&stats, &Glossary::default());
    let prompt = view.quiz.expect("quiz prompt");
    assert_eq!((prompt.number, prompt.total), (1, 2));

    let first = act(&mut runner, Action::Answer(0), &mut stats);
    assert_eq!(first.transition, Transition::Rerendered);
    assert_eq!((stats.stats().health, stats.stats().money), (55, 2));
    assert_eq!(runner.quiz_index(), 1);

    let second = act(&mut runner, Action::Answer(0), &mut stats);
    assert_eq!(stats.stats().health, 50);
    assert_eq!(second.entered(), Some(&SceneId::new("end")));
    assert_eq!(
        second.feedback[0].message("coins"),
        "The shogun held power."
    );
    assert_eq!(runner.quiz_index(), 0);
}

#[test]
fn quiz_without_next_stops_after_last_question() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Quiz", "scenes": [
            {"id": "quiz", "type": "quiz", "questions": [{"question": "?", "options": ["a", "b"], "correct": 1}]}
        ]}"#,
    );
    let mut runner = SceneRunner::new(chapter, Player::default());
    let mut stats = engine(50, 0);
    let outcome = act(&mut runner, Action::Answer(1), &mut stats);
    assert_eq!(outcome.transition, Transition::Halted(HaltReason::DeadEnd));
    let view = runner.view(&stats, &Glossary::default());
    assert!(view.controls.is_empty());
    assert!(view.quiz.is_none());
}

#[test]
fn empty_quiz_offers_continue() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Quiz", "scenes": [
            {"id": "quiz", "type": "quiz", "next": "end"}, {"id": "end", "type": "summary"}
        ]}"#,
    );
    let mut runner = SceneRunner::new(chapter, Player::default());
    let mut stats = engine(50, 0);
    act(&mut runner, Action::Continue, &mut stats);
    assert_eq!(runner.current_scene_id().as_str(), "end");
}

#[test]
fn summary_reports_stats_and_rewards_inline_quiz() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Finale", "era": "Rome",
            "startingStats": {"health": 100, "money": 10},
            "scenes": [
                {"id": "start", "type": "narrative", "next": "end"},
                {"id": "end", "type": "summary", "lessons": ["Roads matter"],
                 "quiz": [{"q": "Roads built for?", "options": ["Legions", "Tourists"], "answer": 0},
                          {"q": "Capital?", "options": ["Rome", "Carthage"], "answer": 0}]}
            ]}"#,
    );
    let mut runner = SceneRunner::new(chapter, Player::default());
    let mut stats = engine(80, 15);
    act(&mut runner, Action::Continue, &mut stats);

    let view = runner.view(&stats, &Glossary::default());
    let summary = view.summary.expect("summary view");
    assert_eq!(summary.stats.scenes_visited, 2);
    assert_eq!(summary.stats.money_earned, 5);
    assert_eq!(summary.lessons, vec!["Roads matter"]);
    assert!(summary.message.contains("Finale"));

    act(&mut runner, Action::Answer(0), &mut stats);
    let last = act(&mut runner, Action::Answer(1), &mut stats);
    assert!(last
        .feedback
        .contains(&Feedback::SummaryQuizFinished { score: 1, total: 2 }));
    assert_eq!(stats.stats().money, 17);
    assert_eq!(stats.stats().health, 81);

    let view = runner.view(&stats, &Glossary::default());
    let summary = view.summary.as_ref().expect("summary view");
    assert_eq!(summary.quiz_result, Some((1, 2)));
    assert!(view.control(&Action::Answer(0)).is_none());
}

#[test]
fn restart_resets_stats_jobs_and_history() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Loop", "startingStats": {"health": 100, "money": 5},
            "scenes": [
                {"id": "work", "type": "minigame", "next": "end", "jobs": [{"id": "j", "title": "J", "pay": 4}]},
                {"id": "end", "type": "summary"}
            ]}"#,
    );
    let mut runner = SceneRunner::new(chapter, Player::default());
    let mut stats = StatEngine::new(runner.chapter().starting_player_stats());
    act(&mut runner, Action::Work(JobId::new("j")), &mut stats);
    act(&mut runner, Action::Continue, &mut stats);
    act(&mut runner, Action::Restart, &mut stats);

    assert_eq!(runner.current_scene_id().as_str(), "work");
    assert_eq!(stats.stats().money, 5);
    assert!(runner.jobs_done().is_empty());
    assert_eq!(runner.history(), vec![SceneId::new("work")]);
}

#[test]
fn dangling_target_halts_without_charging() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Broken", "scenes": [
            {"id": "B", "type": "choice", "choices": [{"text": "Pay", "cost": 2, "outcome": "nowhere"}]}
        ]}"#,
    );
    let mut runner = SceneRunner::new(chapter, Player::default());
    let mut stats = engine(100, 10);
    let ticket = runner.ticket();
    let outcome = act(&mut runner, Action::Choose(0), &mut stats);
    assert_eq!(
        outcome.transition,
        Transition::Halted(HaltReason::MissingScene(SceneId::new("nowhere")))
    );
    assert_eq!(stats.stats().money, 10);
    assert_eq!(runner.ticket(), ticket);
}

#[test]
fn narrative_dead_end_offers_no_controls() {
    let chapter =
        chapter(r#"{"id": 1, "title": "End", "scenes": [{"id": "last", "type": "narrative"}]}"#);
    let mut runner = SceneRunner::new(chapter, Player::default());
    let mut stats = engine(100, 0);
    assert!(runner.controls(&stats).is_empty());
    let err = runner
        .perform(&runner.ticket(), Action::Continue, &mut stats)
        .expect_err("no continue");
    assert!(matches!(err, TransitionError::NotAvailable { .. }));
}

#[test]
fn character_select_applies_bonus_and_moves_to_second_scene() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Who", "characters": [
                {"name": "Merchant", "description": "Trader", "bonus": "+10 coins", "startingBonus": {"money": 10}},
                {"name": "Monk", "description": "Pilgrim"}
            ],
            "scenes": [
                {"id": "pick", "type": "character-select"},
                {"id": "intro", "type": "narrative", "text": "Welcome, {{character}}. You carry {{money}}."}
            ]}"#,
    );
    let mut runner = SceneRunner::new(chapter, Player::new("Ana"));
    let mut stats = engine(100, 2);
    let outcome = act(&mut runner, Action::SelectCharacter(0), &mut stats);
    assert_eq!(outcome.entered(), Some(&SceneId::new("intro")));
    assert_eq!(stats.stats().money, 12);
    assert_eq!(runner.player().display_name(), "Merchant");

    let view = runner.view(&stats, &Glossary::default());
    assert_eq!(view.text, "Welcome, Merchant. You carry 12 coins.");
}

#[test]
fn educational_note_falls_back_to_glossary() {
    let chapter = chapter(
        r#"{"id": 1, "title": "Edo", "scenes": [
            {"id": "a", "type": "narrative", "educationalTerm": "Koku"}
        ]}"#,
    );
    let runner = SceneRunner::new(chapter, Player::default());
    let mut glossary = Glossary::default();
    glossary.insert(
        "Koku",
        GlossaryEntry {
            definition: "Rice for one person for a year".into(),
            ..GlossaryEntry::default()
        },
    );
    let view = runner.view(&engine(100, 0), &glossary);
    let edu = view.edu.expect("edu note");
    assert_eq!(edu.note, "Rice for one person for a year");

    let bare = runner.view(&engine(100, 0), &Glossary::default());
    assert!(bare.edu.is_none());
}

#[test]
fn resume_restores_position_and_retry_marker() {
    let point = ResumePoint {
        current_scene_id: SceneId::new("drowned"),
        history: vec![SceneId::new("intro"), SceneId::new("S"), SceneId::new("drowned")],
        jobs_done: vec![JobId::new("x"), JobId::new("x")],
        player: Player::new("Ana"),
    };
    let mut runner = SceneRunner::resume(chapter(SETBACK), point).expect("resume");
    assert_eq!(runner.retry_marker(), Some(&SceneId::new("S")));
    assert_eq!(runner.jobs_done().len(), 1);

    let mut stats = engine(70, 0);
    act(&mut runner, Action::Retry, &mut stats);
    assert_eq!(runner.current_scene_id().as_str(), "S");
}

#[test]
fn resume_into_unknown_scene_fails() {
    let point = ResumePoint {
        current_scene_id: SceneId::new("gone"),
        history: Vec::new(),
        jobs_done: Vec::new(),
        player: Player::default(),
    };
    let err = SceneRunner::resume(chapter(SETBACK), point).expect_err("unknown scene");
    assert!(err.is_not_found());
}

#[test]
fn visit_survives_rerender_but_not_navigation() {
    let mut runner = SceneRunner::new(chapter(WORK), Player::default());
    let mut stats = engine(100, 0);
    let visit = runner.visit();
    act(&mut runner, Action::Work(JobId::new("scribe")), &mut stats);
    assert_eq!(runner.visit(), visit);
    act(&mut runner, Action::Continue, &mut stats);
    assert_ne!(runner.visit(), visit);
}
