//! Terminal multiplication quiz (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from the term crate.
//! Scores are written by a background runtime; logs go to a file.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{error, info};

use tui_times::adapter::{JsonFileStore, ScoreBook, ScoreWriter};
use tui_times::app::App;
use tui_times::config::QuizConfig;
use tui_times::core::table_from_u8;
use tui_times::engine::{AudioController, Services};
use tui_times::input::{handle_key_event, should_quit};
use tui_times::logging;
use tui_times::term::{BellAudio, FrameBuffer, TerminalRenderer, Viewport};
use tui_times::types::Table;

#[derive(Parser)]
#[command(name = "tui-times")]
#[command(about = "Timed multiplication-table quiz for the terminal")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./tui-times.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Table to preselect in the menu (2-10)
    #[arg(short, long)]
    table: Option<u8>,

    /// Player name for the high score board; empty plays as guest
    #[arg(short, long)]
    player: Option<String>,

    /// Seed for question order (defaults to the clock)
    #[arg(long)]
    seed: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = QuizConfig::load(cli.config.as_deref())?;
    if let Some(name) = &cli.player {
        config.set_player(name);
    }
    config.validate()?;
    logging::init(&config.logging)?;

    let table = match cli.table {
        Some(n) => table_from_u8(n)?,
        None => Table::default(),
    };
    let seed = cli.seed.unwrap_or_else(clock_seed);
    info!(
        table = table.get(),
        seed,
        player = config.player.name.as_deref().unwrap_or("guest"),
        data_dir = %config.storage.data_dir.display(),
        "starting"
    );

    let preferences = JsonFileStore::open(config.preferences_path())
        .context("failed to open preferences")?;
    let book = ScoreBook::open(config.scores_path()).context("failed to open score book")?;
    let writer = ScoreWriter::start(book)?;
    let scores = writer.handle();

    let audio = AudioController::new(Box::new(BellAudio::new()), Box::new(preferences));
    let mut services = Services::new(audio, Box::new(scores.clone()));
    if let Some(name) = &config.player.name {
        services = services.with_player(name.clone());
    }
    let mut app = App::new(services, Box::new(scores), table, seed)
        .with_round_config(config.round_config());

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app, config.round.tick_ms);
    if let Err(e) = &result {
        error!(error = %e, "game loop failed");
    }

    // Always try to restore terminal state.
    app.abandon();
    let _ = term.exit();
    drop(app);
    writer.shutdown();
    result
}

fn run(term: &mut TerminalRenderer, app: &mut App, tick_ms: u32) -> Result<()> {
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(tick_ms as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        app.render_into(Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        info!("quit requested");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        app.handle(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick with the real elapsed time so the countdown tracks the wall clock.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            app.tick(u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX));
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
