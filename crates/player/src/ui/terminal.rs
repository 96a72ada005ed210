//! Plain-text rendering of the session for a line-oriented terminal.
//!
//! Everything here is a pure function of session state so it can be tested
//! without a terminal; the binary only prints the strings and reads lines.

use std::fmt::Write;

use chronoquest_domain::{PlayerStats, SceneView, SceneVisit, Ticket};

use crate::application::{GlossaryTerm, MapEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based control number as printed.
    Control(usize),
    Talk(String),
    Inventory,
    Glossary,
    Map,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    if let Ok(n) = word.parse::<usize>() {
        if n > 0 && rest.is_empty() {
            return Command::Control(n);
        }
    }

    match word.to_ascii_lowercase().as_str() {
        "talk" | "say" => Command::Talk(rest.to_string()),
        "inv" | "inventory" => Command::Inventory,
        "glossary" | "terms" => Command::Glossary,
        "map" => Command::Map,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

pub const HELP: &str = "Commands: <number> to act, talk <message>, inv, glossary, map, quit";

pub fn render_hud(player: &str, stats: &PlayerStats, ai_online: bool) -> String {
    format!(
        "{} | Health {}/{} | {} {} | AI {}",
        player,
        stats.health,
        stats.max_health,
        stats.money,
        stats.currency,
        if ai_online { "online" } else { "offline" }
    )
}

pub fn render_view(view: &SceneView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.title);
    if !view.era.is_empty() {
        let _ = writeln!(out, "({})", view.era);
    }
    if !view.text.is_empty() {
        let _ = writeln!(out, "\n{}", view.text);
    }

    if let Some(npc) = &view.npc {
        let _ = writeln!(out, "\n{}: {}", npc.name, npc.line.as_deref().unwrap_or("..."));
    }
    if let Some(edu) = &view.edu {
        let _ = writeln!(out, "\n[{}] {}", edu.term, edu.note);
    }
    if let Some(aside) = &view.aside {
        let _ = writeln!(out, "\n{}", aside);
    }

    if let Some(summary) = &view.summary {
        let stats = &summary.stats;
        let _ = writeln!(out, "\n{}", summary.message);
        let _ = writeln!(
            out,
            "Scenes visited: {} | Money earned: {} | Final health: {} | Items: {}",
            stats.scenes_visited, stats.money_earned, stats.final_health, stats.items_collected
        );
        if let Some(note) = &summary.historical_note {
            let _ = writeln!(out, "{}", note);
        }
        if let Some(question) = &summary.guiding_question {
            let _ = writeln!(out, "Guiding question: {}", question);
        }
        for lesson in &summary.lessons {
            let _ = writeln!(out, "  * {}", lesson);
        }
        if let Some((score, total)) = summary.quiz_result {
            let _ = writeln!(out, "Quiz score: {} / {}", score, total);
        }
    }

    if let Some(quiz) = view.quiz.as_ref().or_else(|| view.summary.as_ref().and_then(|s| s.quiz.as_ref())) {
        let _ = writeln!(out, "\nQuestion {} of {}: {}", quiz.number, quiz.total, quiz.question);
    }

    if !view.controls.is_empty() {
        out.push('\n');
    }
    for (i, control) in view.controls.iter().enumerate() {
        let _ = write!(out, "  {}. {}", i + 1, control.label);
        if let Some(detail) = &control.detail {
            let _ = write!(out, " ({})", detail);
        }
        if let Some(reason) = control.reason.as_ref().filter(|_| !control.enabled) {
            let _ = write!(out, " [unavailable: {}]", reason);
        }
        out.push('\n');
    }
    out
}

pub fn resume_question(scene_title: &str) -> String {
    format!("Saved progress found at \"{}\". Resume? [y/N] ", scene_title)
}

/// Anything but "y" or "yes" declines.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// How the scene on screen relates to the last one drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Unchanged,
    /// Same visit, new controls (next quiz question, updated job board).
    Refresh,
    /// A scene was entered; its image is worth fetching.
    NewScene,
}

/// Remembers what was last drawn so the loop reprints only on change.
#[derive(Debug, Default)]
pub struct Screen {
    ticket: Option<Ticket>,
    visit: Option<SceneVisit>,
}

impl Screen {
    pub fn observe(&mut self, view: &SceneView) -> Redraw {
        if self.ticket.as_ref() == Some(&view.ticket) {
            return Redraw::Unchanged;
        }
        self.ticket = Some(view.ticket.clone());
        if self.visit.as_ref() == Some(&view.visit) {
            Redraw::Refresh
        } else {
            self.visit = Some(view.visit.clone());
            Redraw::NewScene
        }
    }
}

pub fn render_map(entries: &[MapEntry]) -> String {
    let mut out = String::from("Journey:\n");
    for entry in entries {
        let marker = if entry.current {
            '>'
        } else if entry.visited {
            '*'
        } else {
            ' '
        };
        let title = if entry.title.is_empty() {
            entry.scene_id.as_str()
        } else {
            entry.title.as_str()
        };
        let _ = writeln!(out, " {} {} ({})", marker, title, entry.kind);
    }
    out
}

pub fn render_glossary(terms: &[GlossaryTerm]) -> String {
    if terms.is_empty() {
        return "No glossary terms for this chapter.\n".to_string();
    }
    let mut out = String::new();
    for term in terms {
        let _ = writeln!(
            out,
            "{}: {}",
            term.term,
            term.definition.as_deref().unwrap_or("(no definition yet)")
        );
    }
    out
}

pub fn render_inventory(items: &[String]) -> String {
    if items.is_empty() {
        "Your pack is empty.".to_string()
    } else {
        format!("You carry: {}", items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use chronoquest_domain::{
        Action, Chapter, Glossary, Player, SceneId, SceneRunner, StatEngine,
    };

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command(" 2 "), Command::Control(2));
        assert_eq!(
            parse_command("talk What do you sell?"),
            Command::Talk("What do you sell?".into())
        );
        assert_eq!(parse_command("INV"), Command::Inventory);
        assert_eq!(parse_command("map"), Command::Map);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("0"), Command::Unknown("0".into()));
        assert_eq!(parse_command("dance"), Command::Unknown("dance".into()));
    }

    #[test]
    fn hud_shows_stats_and_ai_state() {
        let stats = PlayerStats {
            health: 80,
            max_health: 100,
            money: 12,
            currency: "mon".into(),
            inventory: vec![],
        };
        assert_eq!(
            render_hud("Ana", &stats, false),
            "Ana | Health 80/100 | 12 mon | AI offline"
        );
    }

    #[test]
    fn map_marks_current_and_visited() {
        let entries = vec![
            MapEntry {
                scene_id: SceneId::new("a"),
                title: "Arrival".into(),
                kind: "narrative",
                visited: true,
                current: false,
            },
            MapEntry {
                scene_id: SceneId::new("b"),
                title: String::new(),
                kind: "choice",
                visited: true,
                current: true,
            },
        ];
        let map = render_map(&entries);
        assert!(map.contains(" * Arrival (narrative)"));
        assert!(map.contains(" > b (choice)"));
    }

    #[test]
    fn only_explicit_yes_resumes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn quiz_answers_redraw_within_the_same_scene() {
        let chapter = Arc::new(
            Chapter::from_json(
                r#"{"id": 1, "title": "Quiz", "scenes": [
                    {"id": "q", "type": "quiz", "next": "end", "questions": [
                        {"question": "One?", "options": ["a", "b"], "correct": 0},
                        {"question": "Two?", "options": ["c", "d"], "correct": 1}
                    ]},
                    {"id": "end", "type": "summary"}
                ]}"#,
            )
            .expect("chapter"),
        );
        let mut stats = StatEngine::new(chapter.starting_player_stats());
        let mut runner = SceneRunner::new(chapter, Player::default());
        let mut screen = Screen::default();
        let glossary = Glossary::default();

        let first = runner.view(&stats, &glossary);
        assert_eq!(screen.observe(&first), Redraw::NewScene);
        assert_eq!(screen.observe(&runner.view(&stats, &glossary)), Redraw::Unchanged);

        runner
            .perform(&first.ticket, Action::Answer(0), &mut stats)
            .expect("answer");
        let second = runner.view(&stats, &glossary);
        assert_eq!(second.quiz.as_ref().map(|q| q.question.as_str()), Some("Two?"));
        assert_eq!(screen.observe(&second), Redraw::Refresh);

        runner
            .perform(&second.ticket, Action::Answer(1), &mut stats)
            .expect("answer");
        assert_eq!(screen.observe(&runner.view(&stats, &glossary)), Redraw::NewScene);
    }

    #[test]
    fn inventory_lists_items() {
        assert_eq!(render_inventory(&[]), "Your pack is empty.");
        assert_eq!(
            render_inventory(&["Rice".into(), "Sandals".into()]),
            "You carry: Rice, Sandals"
        );
    }
}
