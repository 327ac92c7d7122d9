//! Runtime wiring for the PageVox binary
//!
//! Builds the content source, the speech engine, and the channels between
//! them, then runs the playback controller on the current task until the
//! session ends.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::{mpsc, watch};
use tracing::info;

use pagevox_content::{ContentSource, TextFileBook};
use pagevox_tts::{EngineEvent, SpeechEngine};
use pagevox_tts_espeak::EspeakEngine;

use crate::config::Cli;
use crate::controller::{ControlState, ControllerEvent, PlaybackController};
use crate::interruption::{InterruptSignal, InterruptionMonitor};
use crate::ui;

pub struct RuntimeOptions {
    pub book: PathBuf,
    pub book_language: String,
    pub fallback_language: String,
    pub espeak_command: Option<String>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            book: cli.book,
            book_language: cli.language,
            fallback_language: cli.fallback_language,
            espeak_command: cli.espeak_command,
        }
    }
}

pub async fn run(options: RuntimeOptions) -> anyhow::Result<()> {
    let book = TextFileBook::load(&options.book, options.book_language)
        .with_context(|| format!("failed to load book {}", options.book.display()))?;
    anyhow::ensure!(!book.is_empty(), "book has no paragraphs");
    info!("Loaded book with {} paragraphs", book.len());
    let content: Arc<dyn ContentSource> = Arc::new(book);

    let (engine_events_tx, mut engine_events_rx) = mpsc::channel::<EngineEvent>(16);
    let (events_tx, events_rx) = mpsc::channel::<ControllerEvent>(64);
    let (control_tx, control_rx) = watch::channel(ControlState::Paused);

    // Engine initialization emits Ready on the event channel; the channel
    // buffers it until the forwarder below starts draining.
    let mut engine = EspeakEngine::new(engine_events_tx);
    if let Some(command) = &options.espeak_command {
        engine = engine.with_command(command);
    }
    engine
        .initialize()
        .await
        .context("speech engine failed to start")?;

    // Engine callbacks become controller events on the single queue.
    let forward_tx = events_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(event) = engine_events_rx.recv().await {
            let event = match event {
                EngineEvent::Ready => ControllerEvent::EngineReady,
                EngineEvent::UtteranceFinished { tag } => {
                    ControllerEvent::UtteranceFinished { tag }
                }
            };
            if forward_tx.send(event).await.is_err() {
                break;
            }
        }
    });

    let (interrupt_tx, interrupt_rx) = mpsc::channel::<InterruptSignal>(4);
    let monitor = InterruptionMonitor::spawn(interrupt_rx, events_tx.clone());

    // SIGINT from outside the raw-mode terminal still interrupts.
    let signal_tx = interrupt_tx.clone();
    let signals = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_tx.send(InterruptSignal).await;
        }
    });

    let keys = ui::spawn_transport_keys(events_tx.clone(), interrupt_tx);
    let display = ui::spawn_control_display(control_rx);
    drop(events_tx);

    let controller = PlaybackController::new(
        content,
        Box::new(engine),
        events_rx,
        control_tx,
        options.fallback_language,
    );
    controller.run().await;

    keys.abort();
    display.abort();
    monitor.abort();
    forwarder.abort();
    signals.abort();
    let _ = crossterm::terminal::disable_raw_mode();
    println!();
    Ok(())
}
