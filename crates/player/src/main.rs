//! ChronoQuest terminal player
//!
//! Plays one chapter against a running engine, or fully offline from a local
//! content directory with `--content-dir`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chronoquest_domain::entities::DEFAULT_PLAYER_NAME;
use chronoquest_domain::{ChapterId, Player};
use chronoquest_player::application::{
    AiContentClient, ChapterStore, ContentUpdate, GameSession, ProgressStore, StartOutcome,
};
use chronoquest_player::infrastructure::clock::SystemTimeProvider;
use chronoquest_player::infrastructure::http_client::{ApiClient, DEFAULT_SERVER_URL};
use chronoquest_player::infrastructure::local_content::LocalContentSource;
use chronoquest_player::infrastructure::storage::FileStorageProvider;
use chronoquest_player::ports::outbound::{
    storage_keys, ContentSource, ProgressSyncPort, StorageProvider,
};
use chronoquest_player::ui::{self, Command, Redraw, Screen};

/// How long to wait for an NPC reply before returning to the prompt.
const DIALOGUE_WAIT: Duration = Duration::from_secs(35);

#[derive(Parser)]
#[command(name = "chronoquest-player", about = "ChronoQuest terminal player", version)]
struct Args {
    /// Engine base URL
    #[arg(long, env = "CHRONOQUEST_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Chapter to play
    #[arg(long, default_value = "1")]
    chapter: String,

    /// Player name (remembered between runs)
    #[arg(long)]
    player: Option<String>,

    /// Play offline from a directory of chapter JSON files
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Reuse an existing server session id
    #[arg(long)]
    session_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with the story on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chronoquest_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let storage: Arc<dyn StorageProvider> = Arc::new(FileStorageProvider::new());

    let session_id = args
        .session_id
        .clone()
        .or_else(|| storage.load(storage_keys::SESSION_ID))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    storage.save(storage_keys::SESSION_ID, &session_id);

    let player_name = args
        .player
        .clone()
        .or_else(|| storage.load(storage_keys::PLAYER_NAME))
        .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
    storage.save(storage_keys::PLAYER_NAME, &player_name);

    let (content, ai, remote): (
        Arc<dyn ContentSource>,
        AiContentClient,
        Option<Arc<dyn ProgressSyncPort>>,
    ) = match &args.content_dir {
        Some(dir) => {
            tracing::info!(dir = ?dir, "Playing offline from local content");
            (Arc::new(LocalContentSource::new(dir)), AiContentClient::offline(), None)
        }
        None => {
            tracing::info!(server = %args.server, "Playing against engine");
            let api = Arc::new(ApiClient::new(&args.server, session_id));
            (api.clone(), AiContentClient::new(api.clone()), Some(api))
        }
    };

    let chapter_id = ChapterId::new(args.chapter.as_str());
    let store = ChapterStore::load(content.as_ref(), &chapter_id)
        .await
        .with_context(|| format!("loading chapter {}", chapter_id))?;
    let progress = ProgressStore::new(storage, remote, Arc::new(SystemTimeProvider));

    let mut session = GameSession::new(
        store,
        Player::new(player_name),
        progress,
        Arc::new(ai),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Ask up front so the answer comes through the same reader as the game
    let resume = match session.resume_prompt() {
        Some(title) => {
            print!("{}", ui::resume_question(&title));
            flush()?;
            let answer = lines.next_line().await.context("reading input")?;
            answer.as_deref().is_some_and(ui::is_yes)
        }
        None => false,
    };

    match session.start(&move |_: &str| resume) {
        StartOutcome::Resumed { .. } => println!("Welcome back."),
        StartOutcome::Restored => println!("Your purse and deeds are as you left them."),
        StartOutcome::Fresh | StartOutcome::Declined => {}
    }
    println!("{}\n", ui::HELP);

    play(&mut session, &mut lines).await
}

async fn play(
    session: &mut GameSession,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    let mut screen = Screen::default();

    loop {
        let view = session.view();
        match screen.observe(&view) {
            Redraw::NewScene => {
                session.request_scene_image();
                println!("\n{}", ui::render_view(&view));
            }
            Redraw::Refresh => println!("\n{}", ui::render_view(&view)),
            Redraw::Unchanged => {}
        }
        for update in session.poll_content() {
            print_update(&update);
        }

        println!(
            "{}",
            ui::render_hud(&session.player().name, session.stats(), session.ai_online())
        );
        print!("> ");
        flush()?;

        let Some(line) = lines.next_line().await.context("reading input")? else {
            return Ok(());
        };

        match ui::parse_command(&line) {
            Command::Control(n) => {
                let Some(control) = view.controls.get(n - 1) else {
                    println!("No option {}.", n);
                    continue;
                };
                if let Some(duration) = session
                    .work_duration(&control.action)
                    .filter(|_| control.enabled)
                {
                    println!("Working...");
                    tokio::time::sleep(duration).await;
                }
                match session.perform(&view.ticket, control.action.clone()) {
                    Ok(notices) => {
                        let currency = session.stats().currency.clone();
                        for notice in notices {
                            let mark = if notice.is_loss() { '-' } else { '+' };
                            println!(" {} {}", mark, notice.message(&currency));
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
            Command::Talk(message) => match session.talk(&message) {
                Some(npc) => {
                    println!("{} is thinking...", npc);
                    let updates = session.next_dialogue(DIALOGUE_WAIT).await;
                    for update in &updates {
                        print_update(update);
                    }
                    if !matches!(updates.last(), Some(ContentUpdate::Dialogue { .. })) {
                        println!("{} does not answer.", npc);
                    }
                }
                None => println!("Say something: talk <message>"),
            },
            Command::Inventory => println!("{}", ui::render_inventory(session.inventory())),
            Command::Glossary => print!("{}", ui::render_glossary(&session.glossary_terms())),
            Command::Map => print!("{}", ui::render_map(&session.journey_map())),
            Command::Help => println!("{}", ui::HELP),
            Command::Quit => return Ok(()),
            Command::Unknown(input) if input.is_empty() => {}
            Command::Unknown(input) => println!("Unknown command '{}'. {}", input, ui::HELP),
        }
    }
}

fn flush() -> anyhow::Result<()> {
    std::io::Write::flush(&mut std::io::stdout()).context("flushing stdout")
}

fn print_update(update: &ContentUpdate) {
    match update {
        ContentUpdate::Dialogue { npc, reply } => {
            let suffix = if reply.offline { " (offline)" } else { "" };
            println!("{}{}: {}", npc, suffix, reply.reply);
        }
        ContentUpdate::SceneImage(image) => println!("[scene image] {}", image.url),
        ContentUpdate::Portrait { npc, image } => println!("[portrait of {}] {}", npc, image.url),
    }
}
