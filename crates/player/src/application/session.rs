//! GameSession - one player's run through one chapter.
//!
//! The session owns everything mutable about the run: stats, the scene
//! runner, the conversation log and whatever AI content has arrived. It is
//! driven from a single task. AI calls are spawned onto the runtime and
//! report back over a channel, each result tagged with the scene visit it
//! was requested for; results for a visit that is no longer current are
//! dropped when polled.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use chronoquest_domain::{
    Action, Chapter, Feedback, HaltReason, Player, PlayerStats, ProgressSnapshot, ResumePlan,
    ResumePoint, SceneId, SceneKind, SceneRunner, SceneView, SceneVisit, StatEngine, StatEvent, Ticket,
    Transition, TransitionError,
};
use chronoquest_shared::{ImageRequest, PortraitRequest};

use super::ai_content::{
    AiContentClient, DialogueContext, DialogueLine, DialogueReply, SceneImage, Speaker,
};
use super::chapter_store::ChapterStore;
use super::progress_store::ProgressStore;
use crate::ports::outbound::ResumeConsent;

/// Who answers when the scene has no NPC of its own.
pub const DEFAULT_NPC_NAME: &str = "Local Guide";

/// How the session began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Nothing usable was saved.
    Fresh,
    /// Saved stats and jobs were restored at the entry scene.
    Restored,
    /// The player chose to continue from a saved scene.
    Resumed { scene_id: SceneId },
    /// The player declined to continue; the chapter starts over.
    Declined,
}

/// Something to tell the player after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Feedback(Feedback),
    Stat(StatEvent),
    /// The authored target of a control does not exist.
    ContentError { target: SceneId },
}

impl Notice {
    pub fn message(&self, currency: &str) -> String {
        match self {
            Self::Feedback(feedback) => feedback.message(currency),
            Self::Stat(event) => event.message(),
            Self::ContentError { target } => {
                format!("This path is not finished yet (missing scene '{}').", target)
            }
        }
    }

    pub fn is_loss(&self) -> bool {
        match self {
            Self::Stat(event) => event.is_loss(),
            Self::Feedback(Feedback::Answered { correct, .. }) => !correct,
            Self::Feedback(_) => false,
            Self::ContentError { .. } => true,
        }
    }
}

/// AI content that arrived for the current scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentUpdate {
    Dialogue { npc: String, reply: DialogueReply },
    SceneImage(SceneImage),
    Portrait { npc: String, image: SceneImage },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub scene_id: SceneId,
    pub title: String,
    pub kind: &'static str,
    pub visited: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: Option<String>,
}

struct Tagged {
    visit: SceneVisit,
    update: ContentUpdate,
}

pub struct GameSession {
    store: ChapterStore,
    stats: StatEngine,
    runner: SceneRunner,
    progress: ProgressStore,
    ai: Arc<AiContentClient>,
    results_tx: mpsc::UnboundedSender<Tagged>,
    results_rx: mpsc::UnboundedReceiver<Tagged>,
    conversations: HashMap<String, Vec<DialogueLine>>,
    scene_image: Option<SceneImage>,
    portraits: HashMap<String, SceneImage>,
}

impl GameSession {
    /// A session at the chapter's entry scene with starting stats.
    pub fn new(
        store: ChapterStore,
        player: Player,
        progress: ProgressStore,
        ai: Arc<AiContentClient>,
    ) -> Self {
        let chapter = Arc::clone(store.chapter());
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            stats: StatEngine::new(chapter.starting_player_stats()),
            runner: SceneRunner::new(chapter, player),
            store,
            progress,
            ai,
            results_tx,
            results_rx,
            conversations: HashMap::new(),
            scene_image: None,
            portraits: HashMap::new(),
        }
    }

    /// Apply saved progress, asking `consent` before jumping to a saved
    /// scene other than the entry scene.
    pub fn start(&mut self, consent: &dyn ResumeConsent) -> StartOutcome {
        let chapter = Arc::clone(self.store.chapter());
        let outcome = match self.progress.load(&chapter.id) {
            None => StartOutcome::Fresh,
            Some(snapshot) => match snapshot.plan(&chapter) {
                ResumePlan::Fresh => StartOutcome::Fresh,
                ResumePlan::RestoreAtEntry => self.restore(&chapter, &snapshot, false),
                ResumePlan::Ask { scene_id } => {
                    if consent.confirm_resume(&scene_title(&chapter, &scene_id)) {
                        self.restore(&chapter, &snapshot, true)
                    } else {
                        self.reset();
                        StartOutcome::Declined
                    }
                }
            },
        };

        tracing::info!(
            chapter_id = %chapter.id,
            scene_id = %self.runner.current_scene_id(),
            outcome = ?outcome,
            "Session started"
        );
        self.persist();
        outcome
    }

    /// The title [`Self::start`] will ask about, if saved progress sits
    /// somewhere other than the entry scene.
    pub fn resume_prompt(&self) -> Option<String> {
        let chapter = self.store.chapter();
        match self.progress.load(&chapter.id)?.plan(chapter) {
            ResumePlan::Ask { scene_id } => Some(scene_title(chapter, &scene_id)),
            ResumePlan::Fresh | ResumePlan::RestoreAtEntry => None,
        }
    }

    /// Rebuild the runner from `snapshot`. Without `at_saved_scene` only
    /// stats, jobs and player carry over and play restarts at the entry.
    fn restore(
        &mut self,
        chapter: &Arc<Chapter>,
        snapshot: &ProgressSnapshot,
        at_saved_scene: bool,
    ) -> StartOutcome {
        let entry = chapter.scenes.entry_scene().id.clone();
        let mut point = match snapshot.resume_point() {
            Some(point) => point,
            None => ResumePoint {
                current_scene_id: entry.clone(),
                history: Vec::new(),
                jobs_done: snapshot.jobs_done.clone(),
                player: snapshot.player.clone(),
            },
        };
        if !at_saved_scene {
            point.current_scene_id = entry.clone();
            point.history.clear();
        }

        let scene_id = point.current_scene_id.clone();
        match SceneRunner::resume(Arc::clone(chapter), point) {
            Ok(runner) => {
                self.runner = runner;
                self.stats = StatEngine::new(snapshot.stats.clone());
                if scene_id != entry {
                    StartOutcome::Resumed { scene_id }
                } else {
                    StartOutcome::Restored
                }
            }
            Err(e) => {
                tracing::warn!(chapter_id = %chapter.id, error = %e, "Saved progress no longer fits the chapter");
                StartOutcome::Fresh
            }
        }
    }

    fn reset(&mut self) {
        let chapter = Arc::clone(self.store.chapter());
        let player = Player::new(self.runner.player().name.clone());
        self.stats = StatEngine::new(chapter.starting_player_stats());
        self.runner = SceneRunner::new(chapter, player);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn view(&self) -> SceneView {
        self.runner.view(&self.stats, self.store.glossary())
    }

    pub fn chapter(&self) -> &Arc<Chapter> {
        self.store.chapter()
    }

    pub fn player(&self) -> &Player {
        self.runner.player()
    }

    pub fn stats(&self) -> &PlayerStats {
        self.stats.stats()
    }

    pub fn inventory(&self) -> &[String] {
        &self.stats.stats().inventory
    }

    pub fn scene_image(&self) -> Option<&SceneImage> {
        self.scene_image.as_ref()
    }

    pub fn portrait(&self, npc: &str) -> Option<&SceneImage> {
        self.portraits.get(npc)
    }

    pub fn conversation(&self, npc: &str) -> &[DialogueLine] {
        self.conversations.get(npc).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ai_online(&self) -> bool {
        self.ai.is_online()
    }

    /// The chapter's key terms with their definitions, or the whole
    /// glossary when the chapter names none.
    pub fn glossary_terms(&self) -> Vec<GlossaryTerm> {
        let glossary = self.store.glossary();
        let chapter_terms = &self.store.chapter().glossary;
        if chapter_terms.is_empty() {
            return glossary
                .iter()
                .map(|(term, _)| GlossaryTerm {
                    term: term.clone(),
                    definition: glossary.definition(term).map(str::to_string),
                })
                .collect();
        }
        chapter_terms
            .iter()
            .map(|term| GlossaryTerm {
                term: term.clone(),
                definition: glossary.definition(term).map(str::to_string),
            })
            .collect()
    }

    /// Every scene in authored order, flagged visited and current.
    pub fn journey_map(&self) -> Vec<MapEntry> {
        let history = self.runner.history();
        let current = self.runner.current_scene_id();
        self.store
            .chapter()
            .scenes
            .iter()
            .map(|scene| MapEntry {
                scene_id: scene.id.clone(),
                title: scene.title.clone(),
                kind: scene.kind_name(),
                visited: history.contains(&scene.id),
                current: &scene.id == current,
            })
            .collect()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// How long working `action`'s job takes before it pays out. `None` for
    /// anything that is not an unfinished job on the current scene.
    pub fn work_duration(&self, action: &Action) -> Option<Duration> {
        let Action::Work(job_id) = action else {
            return None;
        };
        if self.runner.is_job_done(job_id) {
            return None;
        }
        let SceneKind::Minigame(minigame) = &self.runner.current_scene().kind else {
            return None;
        };
        self.store
            .chapter()
            .jobs_for(&minigame.jobs)
            .iter()
            .find(|job| &job.id == job_id)
            .map(|job| job.difficulty.work_duration())
    }

    /// Apply `action` from a control rendered under `ticket`.
    ///
    /// Refusals mutate nothing. Anything else is persisted before returning.
    pub fn perform(&mut self, ticket: &Ticket, action: Action) -> Result<Vec<Notice>, TransitionError> {
        let outcome = self.runner.perform(ticket, action, &mut self.stats)?;
        let changed = outcome.changed_state();

        let mut notices: Vec<Notice> = outcome
            .feedback
            .into_iter()
            .map(Notice::Feedback)
            .collect();
        notices.extend(self.stats.drain_events().into_iter().map(Notice::Stat));

        match outcome.transition {
            Transition::Entered { from, to } => {
                tracing::debug!(from = %from, to = %to, "Scene transition");
                self.scene_image = None;
            }
            Transition::Halted(HaltReason::MissingScene(target)) => {
                tracing::error!(
                    chapter_id = %self.store.chapter().id,
                    scene_id = %self.runner.current_scene_id(),
                    target = %target,
                    "Scene references a missing scene"
                );
                notices.push(Notice::ContentError { target });
            }
            Transition::Halted(HaltReason::DeadEnd) => {
                tracing::debug!(scene_id = %self.runner.current_scene_id(), "Dead end");
            }
            Transition::Rerendered | Transition::Unchanged => {}
        }

        if changed || !notices.is_empty() {
            self.persist();
        }
        Ok(notices)
    }

    fn persist(&self) {
        let snapshot =
            ProgressSnapshot::capture(&self.runner, &self.stats, self.progress.now_millis());
        self.progress.save(&snapshot);
    }

    // =========================================================================
    // AI content
    // =========================================================================

    /// Send `message` to the scene's NPC. The reply arrives through
    /// [`Self::poll_content`]. Returns the NPC addressed, or `None` for an
    /// empty message.
    pub fn talk(&mut self, message: &str) -> Option<String> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        let npc = self
            .runner
            .current_scene()
            .npc
            .as_ref()
            .map(|n| n.name.clone())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NPC_NAME.to_string());

        let lines = self.conversations.entry(npc.clone()).or_default();
        let history = lines.clone();
        lines.push(DialogueLine {
            speaker: Speaker::Player,
            text: message.to_string(),
        });

        let chapter = self.store.chapter();
        let context = DialogueContext {
            npc_name: npc.clone(),
            era: chapter.era.clone(),
            chapter_id: chapter.id.clone(),
            chapter_title: chapter.title.clone(),
        };
        let message = message.to_string();
        let ai = Arc::clone(&self.ai);
        self.spawn_content(async move {
            let reply = ai.get_dialogue(&context, &message, &history).await;
            Some(ContentUpdate::Dialogue {
                npc: context.npc_name,
                reply,
            })
        });
        Some(npc)
    }

    /// Ask for the current scene's image and its NPC portrait. Returns
    /// whether anything was requested.
    pub fn request_scene_image(&mut self) -> bool {
        let scene = self.runner.current_scene();
        let chapter = self.store.chapter();
        let mut requested = false;

        if let Some(prompt) = scene.image_prompt() {
            let request = ImageRequest {
                prompt,
                era: Some(chapter.era.clone()),
                region: Some(chapter.region.clone()),
                chapter_id: Some(chapter.id.clone()),
                scene_id: Some(scene.id.to_string()),
                ..ImageRequest::default()
            };
            let ai = Arc::clone(&self.ai);
            self.spawn_content(async move {
                ai.get_scene_image(request)
                    .await
                    .map(ContentUpdate::SceneImage)
            });
            requested = true;
        }

        let scene = self.runner.current_scene();
        if let Some(npc) = scene.npc.as_ref().filter(|n| !n.name.trim().is_empty()) {
            let request = PortraitRequest {
                npc_name: npc.name.clone(),
                era: Some(chapter.era.clone()),
                region: Some(chapter.region.clone()),
                description: Some(npc.description.clone()).filter(|d| !d.is_empty()),
                chapter_id: Some(chapter.id.clone()),
            };
            let ai = Arc::clone(&self.ai);
            self.spawn_content(async move {
                let npc = request.npc_name.clone();
                ai.get_portrait(request)
                    .await
                    .map(|image| ContentUpdate::Portrait { npc, image })
            });
            requested = true;
        }

        requested
    }

    fn spawn_content<F>(&self, task: F)
    where
        F: std::future::Future<Output = Option<ContentUpdate>> + Send + 'static,
    {
        let visit = self.runner.visit();
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            if let Some(update) = task.await {
                // The receiver only goes away with the session.
                let _ = tx.send(Tagged { visit, update });
            }
        });
    }

    /// Apply whatever AI content has arrived, dropping results for scenes
    /// the player has left.
    pub fn poll_content(&mut self) -> Vec<ContentUpdate> {
        let mut updates = Vec::new();
        while let Ok(tagged) = self.results_rx.try_recv() {
            if let Some(update) = self.accept(tagged) {
                updates.push(update);
            }
        }
        updates
    }

    /// Wait up to `wait` for the next current-scene result.
    pub async fn next_content(&mut self, wait: Duration) -> Option<ContentUpdate> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let tagged = tokio::time::timeout_at(deadline, self.results_rx.recv())
                .await
                .ok()??;
            if let Some(update) = self.accept(tagged) {
                return Some(update);
            }
        }
    }

    /// Wait up to `wait` for an NPC reply. Other content that lands first
    /// is applied and returned ahead of it.
    pub async fn next_dialogue(&mut self, wait: Duration) -> Vec<ContentUpdate> {
        let deadline = tokio::time::Instant::now() + wait;
        let mut updates = Vec::new();
        while let Some(update) = self
            .next_content(deadline.saturating_duration_since(tokio::time::Instant::now()))
            .await
        {
            let is_reply = matches!(update, ContentUpdate::Dialogue { .. });
            updates.push(update);
            if is_reply {
                break;
            }
        }
        updates
    }

    fn accept(&mut self, tagged: Tagged) -> Option<ContentUpdate> {
        if tagged.visit != self.runner.visit() {
            tracing::debug!(
                scene_id = %tagged.visit.scene_id(),
                "Dropping content for a scene no longer shown"
            );
            return None;
        }

        match &tagged.update {
            ContentUpdate::Dialogue { npc, reply } => {
                self.conversations
                    .entry(npc.clone())
                    .or_default()
                    .push(DialogueLine {
                        speaker: Speaker::Npc,
                        text: reply.reply.clone(),
                    });
            }
            ContentUpdate::SceneImage(image) => self.scene_image = Some(image.clone()),
            ContentUpdate::Portrait { npc, image } => {
                self.portraits.insert(npc.clone(), image.clone());
            }
        }
        Some(tagged.update)
    }
}

fn scene_title(chapter: &Chapter, scene_id: &SceneId) -> String {
    chapter
        .scenes
        .get(scene_id)
        .map(|s| s.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(scene_id.as_str())
        .to_string()
}
