//! Background score writer.
//!
//! Bridges the sync game loop with a small tokio runtime so saving a score
//! never blocks a frame. The book itself is shared behind a mutex; the game
//! loop reads it directly for the high score screen.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::core::BoardFilter;
use crate::engine::{ScoreSink, ScoreSubmission};
use crate::scores::{validate, Profile, ScoreBook, ScoreRecord};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Work item for the writer task.
#[derive(Debug)]
enum WriterCommand {
    Save(ScoreSubmission),
    Delete(String),
    /// Reply once everything queued before it has been handled.
    Flush(oneshot::Sender<()>),
}

/// Running writer instance. Owns the runtime; hand out [`ScoreHandle`]s to
/// whoever saves or reads scores.
pub struct ScoreWriter {
    rt: Runtime,
    handle: ScoreHandle,
}

/// Cheap clone of the writer's channel and book.
#[derive(Clone)]
pub struct ScoreHandle {
    tx: mpsc::UnboundedSender<WriterCommand>,
    book: Arc<Mutex<ScoreBook>>,
}

impl ScoreWriter {
    pub fn start(book: ScoreBook) -> Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("score-writer")
            .enable_all()
            .build()
            .context("failed to create tokio runtime")?;

        let book = Arc::new(Mutex::new(book));
        let (tx, rx) = mpsc::unbounded_channel::<WriterCommand>();
        rt.spawn(run_writer(book.clone(), rx));

        Ok(Self {
            rt,
            handle: ScoreHandle { tx, book },
        })
    }

    pub fn handle(&self) -> ScoreHandle {
        self.handle.clone()
    }

    /// Block until every queued command has been handled.
    pub fn flush(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.handle.send(WriterCommand::Flush(done_tx))?;
        self.rt
            .block_on(done_rx)
            .map_err(|_| anyhow!("score writer stopped before flushing"))
    }

    /// Flush pending writes and stop the runtime.
    pub fn shutdown(self) {
        if let Err(e) = self.flush() {
            warn!(error = %e, "pending scores may be lost");
        }
        self.rt.shutdown_timeout(SHUTDOWN_GRACE);
        info!("score writer stopped");
    }
}

impl ScoreHandle {
    /// Ranked rounds for the high score screen.
    pub fn top_scores(&self, filter: BoardFilter) -> Vec<ScoreRecord> {
        lock(&self.book).top_scores(filter)
    }

    pub fn profile(&self, player: &str) -> Option<Profile> {
        lock(&self.book).profile(player)
    }

    /// Queue removal of a player and their rounds.
    pub fn delete_player(&self, player: &str) -> Result<()> {
        self.send(WriterCommand::Delete(player.to_string()))
    }

    fn send(&self, cmd: WriterCommand) -> Result<()> {
        self.tx
            .send(cmd)
            .map_err(|_| anyhow!("score writer is not running"))
    }
}

impl ScoreSink for ScoreHandle {
    /// Accepts the score for writing. Invalid submissions are declined at
    /// once; disk failures surface later in the log.
    fn save_score(&mut self, submission: &ScoreSubmission) -> Result<bool> {
        if let Err(e) = validate(submission) {
            warn!(error = %e, "score rejected");
            return Ok(false);
        }
        self.send(WriterCommand::Save(submission.clone()))?;
        Ok(true)
    }
}

fn lock(book: &Mutex<ScoreBook>) -> MutexGuard<'_, ScoreBook> {
    book.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn run_writer(book: Arc<Mutex<ScoreBook>>, mut rx: mpsc::UnboundedReceiver<WriterCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WriterCommand::Save(submission) => {
                let book = book.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    let mut guard = lock(&book);
                    guard.record(&submission)
                })
                .await;
                match outcome {
                    Ok(Ok(record)) => debug!(id = %record.id, "score written"),
                    Ok(Err(e)) => warn!(error = %e, "failed to write score"),
                    Err(e) => warn!(error = %e, "score write task failed"),
                }
            }
            WriterCommand::Delete(player) => {
                let book = book.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    let mut guard = lock(&book);
                    guard.delete_player(&player)
                })
                .await;
                match outcome {
                    Ok(Ok(deleted)) => debug!(deleted, "player delete handled"),
                    Ok(Err(e)) => warn!(error = %e, "failed to delete player"),
                    Err(e) => warn!(error = %e, "delete task failed"),
                }
            }
            WriterCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("score writer channel closed");
}
